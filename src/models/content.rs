//! Localized CMS field models.
//!
//! Every translatable field of a portfolio section (hero title, research
//! summary, publication abstract, ...) is edited in one language and carries
//! an explicit translation state for the other. A blank translation is only
//! ever meaningful as `Translated("")`, which the editor chose on purpose.

// Author: kelexine (https://github.com/kelexine)

use super::language::Language;
use serde::{Deserialize, Serialize};

/// Translation progress of a single field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "text", rename_all = "snake_case")]
pub enum TranslationState {
    /// No translation exists yet; auto-translation may fill it.
    #[default]
    NotTranslated,
    /// A translation request is in flight.
    Translating,
    /// Final text, possibly intentionally blank.
    Translated(String),
}

impl TranslationState {
    /// The translated text, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            TranslationState::Translated(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_translated(&self) -> bool {
        matches!(self, TranslationState::Translated(_))
    }
}

/// A CMS field authored in one language with its counterpart translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedText {
    pub source_language: Language,
    pub source: String,
    #[serde(default)]
    pub translation: TranslationState,
}

impl LocalizedText {
    /// A freshly authored field with no translation yet.
    pub fn new(source_language: Language, source: impl Into<String>) -> Self {
        Self {
            source_language,
            source: source.into(),
            translation: TranslationState::NotTranslated,
        }
    }

    /// A field whose translation was provided by hand.
    pub fn with_translation(
        source_language: Language,
        source: impl Into<String>,
        translation: impl Into<String>,
    ) -> Self {
        Self {
            source_language,
            source: source.into(),
            translation: TranslationState::Translated(translation.into()),
        }
    }

    /// Replace the source text. A changed source invalidates the translation.
    pub fn set_source(&mut self, source: impl Into<String>) {
        let source = source.into();
        if source != self.source {
            self.source = source;
            self.translation = TranslationState::NotTranslated;
        }
    }

    /// Whether auto-translation should pick this field up.
    pub fn needs_translation(&self) -> bool {
        self.translation == TranslationState::NotTranslated && !self.source.trim().is_empty()
    }

    /// Language the translation is written in.
    pub fn target_language(&self) -> Language {
        self.source_language.counterpart()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intentional_blank_is_not_pending() {
        let field = LocalizedText::with_translation(Language::English, "Lab news", "");
        assert!(!field.needs_translation());
        assert_eq!(field.translation.text(), Some(""));
    }

    #[test]
    fn test_blank_source_is_not_pending() {
        let field = LocalizedText::new(Language::English, "   ");
        assert!(!field.needs_translation());
    }

    #[test]
    fn test_set_source_resets_translation() {
        let mut field = LocalizedText::with_translation(Language::English, "Hello", "こんにちは");

        field.set_source("Hello");
        assert!(field.translation.is_translated());

        field.set_source("Hello there");
        assert_eq!(field.translation, TranslationState::NotTranslated);
        assert!(field.needs_translation());
    }

    #[test]
    fn test_state_serialization() {
        let json = serde_json::to_value(TranslationState::Translated("研究".to_string())).unwrap();
        assert_eq!(json["state"], "translated");
        assert_eq!(json["text"], "研究");

        let pending = serde_json::to_value(TranslationState::NotTranslated).unwrap();
        assert_eq!(pending["state"], "not_translated");
    }
}
