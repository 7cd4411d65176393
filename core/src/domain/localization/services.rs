use std::collections::HashMap;

use serde_json::Value;
use tracing::{error, warn};

use crate::domain::localization::value_objects::Language;

const BUNDLED_EN: &str = include_str!("../../../locales/en.json");
const BUNDLED_KU: &str = include_str!("../../../locales/ku.json");

/// Flat `dotted.key -> text` catalogs, one per language, built once at load time.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    catalogs: HashMap<Language, HashMap<String, String>>,
}

impl Translator {
    pub fn from_documents(documents: impl IntoIterator<Item = (Language, Value)>) -> Self {
        let catalogs = documents
            .into_iter()
            .map(|(language, document)| (language, flatten_document(&document)))
            .collect();

        Self { catalogs }
    }

    /// Catalogs compiled into the binary from `core/locales`.
    pub fn bundled() -> Self {
        let documents = [(Language::En, BUNDLED_EN), (Language::Ku, BUNDLED_KU)]
            .into_iter()
            .filter_map(|(language, source)| match serde_json::from_str(source) {
                Ok(document) => Some((language, document)),
                Err(e) => {
                    error!(language = %language, "Failed to parse bundled translations: {}", e);
                    None
                }
            });

        Self::from_documents(documents)
    }

    pub fn catalog(&self, language: Language) -> Option<&HashMap<String, String>> {
        self.catalogs.get(&language)
    }

    pub fn translate(&self, language: Language, key: &str) -> String {
        self.translate_with(language, key, &[])
    }

    /// Resolves `key` and substitutes every `{placeholder}` listed in
    /// `replacements`. Unknown keys resolve to the key itself.
    pub fn translate_with(
        &self,
        language: Language,
        key: &str,
        replacements: &[(&str, &str)],
    ) -> String {
        let Some(catalog) = self.catalogs.get(&language).filter(|c| !c.is_empty()) else {
            return key.to_string();
        };

        let Some(template) = catalog.get(key) else {
            warn!(key, language = %language, "Translation key not found");
            return key.to_string();
        };

        replacements
            .iter()
            .fold(template.clone(), |text, (placeholder, value)| {
                text.replace(&format!("{{{placeholder}}}"), value)
            })
    }
}

/// Flattens a nested translation document into dotted keys. Arrays are
/// indexed (`steps.0`), scalars are stringified and nulls are dropped.
pub fn flatten_document(document: &Value) -> HashMap<String, String> {
    let mut flat = HashMap::new();
    flatten_into(&mut flat, String::new(), document);
    flat
}

fn flatten_into(flat: &mut HashMap<String, String>, prefix: String, value: &Value) {
    let child_key = |segment: &str| {
        if prefix.is_empty() {
            segment.to_string()
        } else {
            format!("{prefix}.{segment}")
        }
    };

    match value {
        Value::Object(map) => {
            for (segment, child) in map {
                flatten_into(flat, child_key(segment), child);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten_into(flat, child_key(&index.to_string()), child);
            }
        }
        Value::String(text) => {
            flat.insert(prefix, text.clone());
        }
        Value::Bool(_) | Value::Number(_) => {
            flat.insert(prefix, value.to_string());
        }
        Value::Null => {}
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn translator() -> Translator {
        Translator::from_documents([
            (
                Language::En,
                json!({
                    "nameSearch": {
                        "prompt": "Tell me about {name}. Is {name} safe?",
                        "error": { "enterName": "Please enter a name." }
                    },
                    "tour": { "steps": ["one", "two"] },
                    "version": 2
                }),
            ),
            (Language::Ku, json!({})),
        ])
    }

    #[test]
    fn test_flatten_nested_document() {
        let flat = flatten_document(&json!({
            "a": { "b": { "c": "deep" } },
            "list": ["x", null],
            "flag": true
        }));

        assert_eq!(flat.get("a.b.c").map(String::as_str), Some("deep"));
        assert_eq!(flat.get("list.0").map(String::as_str), Some("x"));
        assert_eq!(flat.get("flag").map(String::as_str), Some("true"));
        assert!(!flat.contains_key("list.1"));
    }

    #[test]
    fn test_translate_resolves_dotted_key() {
        let t = translator();
        assert_eq!(
            t.translate(Language::En, "nameSearch.error.enterName"),
            "Please enter a name."
        );
        assert_eq!(t.translate(Language::En, "tour.steps.1"), "two");
        assert_eq!(t.translate(Language::En, "version"), "2");
    }

    #[test]
    fn test_translate_substitutes_every_placeholder() {
        let t = translator();
        assert_eq!(
            t.translate_with(Language::En, "nameSearch.prompt", &[("name", "Aspirin")]),
            "Tell me about Aspirin. Is Aspirin safe?"
        );
    }

    #[test]
    fn test_missing_key_resolves_to_key() {
        let t = translator();
        assert_eq!(t.translate(Language::En, "does.not.exist"), "does.not.exist");
        // empty catalog behaves like one that is not loaded yet
        assert_eq!(
            t.translate(Language::Ku, "nameSearch.prompt"),
            "nameSearch.prompt"
        );
    }

    #[test]
    fn test_bundled_catalogs_cover_both_languages() {
        let t = Translator::bundled();
        for language in Language::ALL {
            let catalog = t.catalog(language).expect("bundled catalog");
            assert!(catalog.contains_key("aiChatbot.initialMessage"));
            assert!(catalog.contains_key("aiChatbot.errorMessage"));
            assert!(catalog.contains_key("packagingScanner.prompt"));
            assert!(catalog.contains_key("nameSearch.prompt"));
            assert!(catalog.contains_key("auth.error.popupClosed"));
        }
        assert!(
            t.translate_with(Language::En, "nameSearch.prompt", &[("name", "Ibuprofen")])
                .contains("Ibuprofen")
        );
    }
}
