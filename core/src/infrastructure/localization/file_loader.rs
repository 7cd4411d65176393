use std::path::Path;

use serde_json::Value;
use tracing::{info, instrument};

use crate::domain::{
    common::entities::app_errors::CoreError,
    localization::{Translator, value_objects::Language},
};

/// Loads `<dir>/en.json` and `<dir>/ku.json` into a [`Translator`].
#[instrument]
pub async fn load_translations(dir: &Path) -> Result<Translator, CoreError> {
    let mut documents = Vec::with_capacity(Language::ALL.len());

    for language in Language::ALL {
        let path = dir.join(format!("{}.json", language.code()));
        let source = tokio::fs::read_to_string(&path).await.map_err(|e| {
            CoreError::LocalizationError(format!("failed to read {}: {}", path.display(), e))
        })?;
        let document: Value = serde_json::from_str(&source).map_err(|e| {
            CoreError::LocalizationError(format!("failed to parse {}: {}", path.display(), e))
        })?;
        documents.push((language, document));
    }

    info!(dir = %dir.display(), "Translations loaded");

    Ok(Translator::from_documents(documents))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_translations_from_bundled_dir() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("locales");
        let translator = load_translations(&dir).await.expect("locales load");

        assert_eq!(translator.translate(Language::En, "app.title"), "Kurd Med");
        assert_eq!(translator.translate(Language::Ku, "app.title"), "کورد مێد");
    }

    #[tokio::test]
    async fn test_load_translations_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_translations(&dir.path().join("missing"))
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::LocalizationError(_)));
    }

    #[tokio::test]
    async fn test_load_translations_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("en.json"), r#"{"app":{"title":"Kurd Med"}}"#).unwrap();
        std::fs::write(dir.path().join("ku.json"), "{ not json").unwrap();

        let err = load_translations(dir.path()).await.unwrap_err();

        assert!(matches!(err, CoreError::LocalizationError(message) if message.contains("ku.json")));
    }
}
