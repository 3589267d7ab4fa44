// Supported content languages
// Author: kelexine (https://github.com/kelexine)

use crate::error::{TranslateError, Result};
use phf::phf_map;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Accepted spellings (lower-cased) for each supported language.
static LANGUAGE_ALIASES: phf::Map<&'static str, Language> = phf_map! {
    "en" => Language::English,
    "en-us" => Language::English,
    "en-gb" => Language::English,
    "en_us" => Language::English,
    "english" => Language::English,
    "ja" => Language::Japanese,
    "ja-jp" => Language::Japanese,
    "ja_jp" => Language::Japanese,
    "jp" => Language::Japanese,
    "japanese" => Language::Japanese,
};

/// A language the portfolio content is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ja")]
    Japanese,
}

impl Language {
    /// Every supported language.
    pub const ALL: [Language; 2] = [Language::English, Language::Japanese];

    /// ISO 639-1 code, as used by the translation API and in memory keys.
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Japanese => "ja",
        }
    }

    /// The other language of the pair.
    pub fn counterpart(self) -> Language {
        match self {
            Language::English => Language::Japanese,
            Language::Japanese => Language::English,
        }
    }

    /// Resolve a language code or alias, case-insensitively.
    pub fn from_code(code: &str) -> Option<Language> {
        LANGUAGE_ALIASES
            .get(code.trim().to_lowercase().as_str())
            .copied()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = TranslateError;

    fn from_str(s: &str) -> Result<Self> {
        Language::from_code(s).ok_or_else(|| {
            TranslateError::InvalidInput(format!(
                "Unsupported language: {:?}. Supported languages: en, ja",
                s
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_and_aliases() {
        assert_eq!(Language::from_code("en"), Some(Language::English));
        assert_eq!(Language::from_code("EN-US"), Some(Language::English));
        assert_eq!(Language::from_code(" ja-JP "), Some(Language::Japanese));
        assert_eq!(Language::from_code("jp"), Some(Language::Japanese));
        assert_eq!(Language::from_code("fr"), None);
    }

    #[test]
    fn test_from_str_error() {
        let err = "de".parse::<Language>().unwrap_err();
        assert!(matches!(err, TranslateError::InvalidInput(_)));
    }

    #[test]
    fn test_serde_uses_codes() {
        assert_eq!(serde_json::to_string(&Language::Japanese).unwrap(), "\"ja\"");
        let lang: Language = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(lang, Language::English);
        assert_eq!(lang.counterpart(), Language::Japanese);
    }
}
