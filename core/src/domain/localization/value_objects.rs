use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::common::entities::app_errors::CoreError;

/// The two locales the application ships with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ku,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Ku];

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ku => "ku",
        }
    }

    /// Human-readable name used inside model instructions.
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Ku => "Kurdish (Sorani)",
        }
    }

    pub fn is_right_to_left(&self) -> bool {
        matches!(self, Language::Ku)
    }

    /// Picks a language from an `Accept-Language` header value. Only the primary
    /// subtag of the first entry is considered; anything other than `ku` is English.
    pub fn from_accept_language(header: &str) -> Language {
        let primary = header
            .split(',')
            .next()
            .and_then(|entry| entry.split(';').next())
            .and_then(|tag| tag.trim().split('-').next())
            .unwrap_or_default();

        if primary.eq_ignore_ascii_case("ku") {
            Language::Ku
        } else {
            Language::En
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "ku" => Ok(Language::Ku),
            _ => Err(CoreError::Invalid),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_language_codes() {
        assert_eq!("en".parse::<Language>(), Ok(Language::En));
        assert_eq!(" KU ".parse::<Language>(), Ok(Language::Ku));
        assert_eq!("fr".parse::<Language>(), Err(CoreError::Invalid));
    }

    #[test]
    fn test_from_accept_language() {
        assert_eq!(Language::from_accept_language("ku-IQ,en;q=0.8"), Language::Ku);
        assert_eq!(Language::from_accept_language("en-US,ku;q=0.9"), Language::En);
        assert_eq!(Language::from_accept_language("de"), Language::En);
        assert_eq!(Language::from_accept_language(""), Language::En);
    }
}
