//! Translation memory keys, entries and statistics.

// Author: kelexine (https://github.com/kelexine)

use crate::models::Language;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage key the whole memory is persisted under.
pub const MEMORY_STORAGE_KEY: &str = "translationMemory";

/// Confidence of a translation returned by the backend.
pub const EXACT_CONFIDENCE: f64 = 1.0;

/// Normalize source text for keying: case-folded and trimmed.
pub fn normalize_text(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Identifies one translation request: `source:target:normalized text`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    pub source: Language,
    pub target: Language,
    /// Normalized source text.
    pub text: String,
}

impl CacheKey {
    pub fn new(text: &str, source: Language, target: Language) -> Self {
        Self {
            source,
            target,
            text: normalize_text(text),
        }
    }

    /// Parse the persisted string form. Only the first two `:` separate
    /// fields, so source texts containing colons survive.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.splitn(3, ':');
        let source = Language::from_code(parts.next()?)?;
        let target = Language::from_code(parts.next()?)?;
        let text = parts.next()?;
        if text.is_empty() {
            return None;
        }
        Some(Self {
            source,
            target,
            text: text.to_string(),
        })
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.source.code(), self.target.code(), self.text)
    }
}

/// A translation as persisted, nested under its key and target language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTranslation {
    pub text: String,
    /// Creation time in milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub confidence: f64,
}

impl StoredTranslation {
    pub fn age_millis(&self, now_millis: i64) -> i64 {
        now_millis.saturating_sub(self.timestamp)
    }
}

/// A cached translation as returned by lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub key: CacheKey,
    pub translated_text: String,
    pub created_at: DateTime<Utc>,
    pub confidence: f64,
}

impl CacheEntry {
    pub(crate) fn from_stored(key: CacheKey, stored: &StoredTranslation) -> Self {
        Self {
            key,
            translated_text: stored.text.clone(),
            created_at: DateTime::from_timestamp_millis(stored.timestamp).unwrap_or_default(),
            confidence: stored.confidence,
        }
    }
}

/// Outcome of a translate call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResult {
    pub translated_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_language: Option<String>,
    pub confidence: f64,
    pub from_cache: bool,
}

impl TranslationResult {
    pub(crate) fn from_cache(entry: CacheEntry) -> Self {
        Self {
            detected_language: Some(entry.key.source.code().to_string()),
            translated_text: entry.translated_text,
            confidence: entry.confidence,
            from_cache: true,
        }
    }
}

/// Diagnostic readout of the memory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryStats {
    /// Number of distinct keys.
    pub total_entries: usize,
    /// Size of the serialized store.
    pub total_size_bytes: usize,
}
