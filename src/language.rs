use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of conversational languages the system supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "es")]
    Spanish,
}

impl Language {
    pub fn tag(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Spanish => "es",
        }
    }

    pub fn parse(tag: &str) -> Result<Self> {
        match tag {
            "en" => Ok(Language::English),
            "es" => Ok(Language::Spanish),
            other => Err(Error::UnsupportedLanguage(other.to_string())),
        }
    }

    /// The other supported language. With exactly two locales this is the
    /// default partner language for a new session.
    pub fn counterpart(&self) -> Self {
        match self {
            Language::English => Language::Spanish,
            Language::Spanish => Language::English,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_tags() {
        assert_eq!(Language::parse("en").unwrap(), Language::English);
        assert_eq!(Language::parse("es").unwrap(), Language::Spanish);
    }

    #[test]
    fn rejects_unknown_tags() {
        match Language::parse("fr") {
            Err(Error::UnsupportedLanguage(tag)) => assert_eq!(tag, "fr"),
            other => panic!("expected UnsupportedLanguage, got {:?}", other),
        }
        assert!(Language::parse("").is_err());
        assert!(Language::parse("EN").is_err());
    }

    #[test]
    fn counterpart_is_symmetric() {
        assert_eq!(Language::English.counterpart(), Language::Spanish);
        assert_eq!(Language::Spanish.counterpart(), Language::English);
    }

    #[test]
    fn serializes_as_bare_tag() {
        assert_eq!(serde_json::to_string(&Language::English).unwrap(), "\"en\"");
        let lang: Language = serde_json::from_str("\"es\"").unwrap();
        assert_eq!(lang, Language::Spanish);
    }
}
