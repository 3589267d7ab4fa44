//! Configuration data structures for en2ja.
//!
//! This module defines the schema for the application settings: the HTTP
//! server, the Google translation backend, the translation memory and logging.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::models::Language;
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroize;

/// The root configuration object for the application.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server settings (host, port).
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream translation API settings.
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Translation memory (cache) settings.
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Logging and observability settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for the built-in HTTP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The IP address or hostname the server should bind to.
    /// Default: `127.0.0.1`
    #[serde(default = "default_host")]
    pub host: String,

    /// The port number the server should listen on.
    /// Default: `8787`
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Google Cloud Translation API key.
///
/// Never printed by `Debug` and wiped from memory on drop.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
#[serde(transparent)]
#[zeroize(drop)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

// Custom Debug impl that never logs the key
impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

/// Settings for the upstream translation API connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    /// API key for Google Cloud Translation.
    /// Falls back to the `GOOGLE_TRANSLATE_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<ApiKey>,

    /// Endpoint of the v2 translate method.
    /// Default: `https://translation.googleapis.com/language/translate/v2`
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Language content is usually authored in.
    /// Default: `en`
    #[serde(default = "default_source_language")]
    pub default_source_language: Language,

    /// Language content is usually translated into.
    /// Default: `ja`
    #[serde(default = "default_target_language")]
    pub default_target_language: Language,

    /// Number of texts sent in one backend call.
    /// Default: `10`
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Number of batch calls allowed in flight at once.
    /// Default: `4`
    #[serde(default = "default_max_concurrent_batches")]
    pub max_concurrent_batches: usize,

    /// Connection and request timeout in seconds.
    /// Default: `30`
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Maximum number of times to retry failed API requests.
    /// Default: `3`
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial delay between retries in milliseconds.
    /// Default: `1000`
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

/// Settings for the translation memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Whether the memory is consulted and populated at all.
    /// Default: `true`
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Whether the memory is written to disk. When off, it lives only for the
    /// lifetime of the process.
    /// Default: `true`
    #[serde(default = "default_true")]
    pub persist: bool,

    /// Directory holding the persisted memory blob.
    /// Default: `~/.en2ja`
    #[serde(default = "default_storage_dir")]
    pub storage_dir: String,

    /// Retention window in days.
    /// Default: `30`
    #[serde(default = "default_ttl_days")]
    pub ttl_days: u32,

    /// Minimum word-overlap ratio for a fuzzy hit.
    /// Default: `0.8`
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,

    /// Confidence recorded for translations reused from a fuzzy hit.
    /// Default: `0.9`
    #[serde(default = "default_fuzzy_confidence")]
    pub fuzzy_confidence: f64,

    /// Whether near-duplicate texts may reuse cached translations.
    /// Default: `true`
    #[serde(default = "default_true")]
    pub fuzzy_matching: bool,
}

/// Settings for application logging and output format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum log level (`trace`, `debug`, `info`, `warn`, `error`).
    /// Default: `info`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format for logs (`pretty`, `json`, `compact`).
    /// Default: `pretty`
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default trait implementations linking to custom logic

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: default_api_base_url(),
            default_source_language: default_source_language(),
            default_target_language: default_target_language(),
            batch_size: default_batch_size(),
            max_concurrent_batches: default_max_concurrent_batches(),
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            persist: true,
            storage_dir: default_storage_dir(),
            ttl_days: default_ttl_days(),
            similarity_threshold: default_similarity_threshold(),
            fuzzy_confidence: default_fuzzy_confidence(),
            fuzzy_matching: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl MemoryConfig {
    /// Retention window in milliseconds.
    pub fn ttl_millis(&self) -> i64 {
        i64::from(self.ttl_days) * 24 * 60 * 60 * 1000
    }
}

// Helper functions for serde defaults and shared constants
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

fn default_true() -> bool {
    true
}

fn default_api_base_url() -> String {
    "https://translation.googleapis.com/language/translate/v2".to_string()
}

fn default_source_language() -> Language {
    Language::English
}

fn default_target_language() -> Language {
    Language::Japanese
}

fn default_batch_size() -> usize {
    10
}

fn default_max_concurrent_batches() -> usize {
    4
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

pub(crate) fn default_storage_dir() -> String {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".en2ja")
        .to_string_lossy()
        .to_string()
}

fn default_ttl_days() -> u32 {
    30
}

fn default_similarity_threshold() -> f64 {
    0.8
}

fn default_fuzzy_confidence() -> f64 {
    0.9
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}
