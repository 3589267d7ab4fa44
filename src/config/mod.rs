// Configuration module
// Author: kelexine (https://github.com/kelexine)

mod models;

pub use models::*;

use crate::error::{TranslateError, Result};
use config::{Config, Environment, File};
use std::path::{Path, PathBuf};

/// Environment variable consulted when no API key is configured.
pub const API_KEY_ENV: &str = "GOOGLE_TRANSLATE_API_KEY";

impl AppConfig {
    /// Load configuration from the default config file location.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration from multiple sources with precedence:
    /// 1. Environment variables (highest), e.g. `EN2JA_TRANSLATION__API_KEY`
    /// 2. Config file (`path`, or `~/.en2ja/config.toml`)
    /// 3. Defaults (lowest)
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let file_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_config_path);

        let config = Config::builder()
            // Start with defaults
            .add_source(Config::try_from(&Self::default())?)
            // Load from config file; an explicit path must exist
            .add_source(
                File::from(file_path)
                    .required(path.is_some())
            )
            // Override with environment variables (prefix: EN2JA_)
            .add_source(
                Environment::with_prefix("EN2JA")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
            )
            .build()
            .map_err(|e| TranslateError::Config(e.to_string()))?;

        let mut app_config: AppConfig = config
            .try_deserialize()
            .map_err(|e| TranslateError::Config(e.to_string()))?;

        if app_config.translation.api_key.as_ref().map_or(true, ApiKey::is_empty) {
            app_config.translation.api_key = std::env::var(API_KEY_ENV)
                .ok()
                .map(ApiKey::new)
                .filter(|key| !key.is_empty());
        }

        app_config.validate()?;
        Ok(app_config)
    }

    /// Reject settings the translator cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.translation.batch_size == 0 {
            return Err(TranslateError::Config("translation.batch_size must be at least 1".to_string()));
        }
        if self.translation.max_concurrent_batches == 0 {
            return Err(TranslateError::Config(
                "translation.max_concurrent_batches must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.memory.similarity_threshold) {
            return Err(TranslateError::Config(
                "memory.similarity_threshold must be between 0 and 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.memory.fuzzy_confidence) {
            return Err(TranslateError::Config(
                "memory.fuzzy_confidence must be between 0 and 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Copy of the configuration that is safe to print.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.translation.api_key.is_some() {
            config.translation.api_key = Some(ApiKey::new("[REDACTED]"));
        }
        config
    }

    fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".en2ja")
            .join("config.toml")
    }
}
