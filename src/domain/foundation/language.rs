//! Supported conversation languages.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Language a session is conducted in.
///
/// A fixed, closed enumeration: prompt templates, questionnaire text, and
/// answer vocabularies exist for exactly these tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl Language {
    /// All supported languages.
    pub const ALL: [Language; 2] = [Language::En, Language::Ar];

    /// Returns the wire tag for this language.
    pub fn tag(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
        }
    }

    /// Resolves a tag leniently: unrecognized or absent tags fall back to
    /// the default language.
    pub fn resolve(tag: Option<&str>) -> Self {
        tag.and_then(|t| t.parse().ok()).unwrap_or_default()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for Language {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "ar" => Ok(Language::Ar),
            other => Err(ValidationError::unsupported_language(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_language_is_english() {
        assert_eq!(Language::default(), Language::En);
    }

    #[test]
    fn parses_known_tags() {
        assert_eq!("en".parse::<Language>().unwrap(), Language::En);
        assert_eq!("ar".parse::<Language>().unwrap(), Language::Ar);
        assert_eq!(" AR ".parse::<Language>().unwrap(), Language::Ar);
    }

    #[test]
    fn strict_parse_rejects_unknown_tags() {
        let err = "fr".parse::<Language>().unwrap_err();
        assert!(matches!(err, ValidationError::UnsupportedLanguage { .. }));
    }

    #[test]
    fn lenient_resolve_falls_back_to_default() {
        assert_eq!(Language::resolve(None), Language::En);
        assert_eq!(Language::resolve(Some("fr")), Language::En);
        assert_eq!(Language::resolve(Some("ar")), Language::Ar);
    }

    #[test]
    fn serializes_to_lowercase_tags() {
        assert_eq!(serde_json::to_string(&Language::Ar).unwrap(), "\"ar\"");
        let lang: Language = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(lang, Language::En);
    }
}
