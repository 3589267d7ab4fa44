//! Translator: the translation memory composed with a backend.
//!
//! Every translate call consults the memory first (exact key, then fuzzy
//! match) and only reaches the backend on a full miss. Successful backend
//! results are recorded; failures never are.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod batch;
mod fields;

use crate::backend::{BackendTranslation, TranslationBackend};
use crate::config::TranslationConfig;
use crate::error::{TranslateError, Result};
use crate::memory::{TranslationMemory, TranslationResult, EXACT_CONFIDENCE};
use crate::metrics;
use crate::models::Language;
use std::sync::Arc;
use tracing::{debug, info};

/// Default number of texts sent per backend call.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Default number of backend calls a batch keeps in flight.
pub const DEFAULT_MAX_CONCURRENT_BATCHES: usize = 4;

pub struct Translator<B> {
    backend: B,
    memory: Arc<TranslationMemory>,
    batch_size: usize,
    max_concurrent_batches: usize,
}

impl<B: TranslationBackend> Translator<B> {
    pub fn new(backend: B, memory: Arc<TranslationMemory>) -> Self {
        Self {
            backend,
            memory,
            batch_size: DEFAULT_BATCH_SIZE,
            max_concurrent_batches: DEFAULT_MAX_CONCURRENT_BATCHES,
        }
    }

    /// Build a translator with batching taken from the translation settings.
    pub fn from_config(backend: B, memory: Arc<TranslationMemory>, config: &TranslationConfig) -> Self {
        Self::new(backend, memory)
            .with_batch_size(config.batch_size)
            .with_max_concurrent_batches(config.max_concurrent_batches)
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_max_concurrent_batches(mut self, max_concurrent_batches: usize) -> Self {
        self.max_concurrent_batches = max_concurrent_batches.max(1);
        self
    }

    pub fn memory(&self) -> &Arc<TranslationMemory> {
        &self.memory
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Translate one text, reusing the memory where possible.
    pub async fn translate(&self, text: &str, source: Language, target: Language) -> Result<TranslationResult> {
        let result = self.translate_single(text, source, target).await;
        metrics::record_translation("translate", result.is_ok());
        result
    }

    /// English to Japanese.
    pub async fn translate_to_japanese(&self, text: &str) -> Result<TranslationResult> {
        self.translate(text, Language::English, Language::Japanese).await
    }

    /// Japanese to English.
    pub async fn translate_to_english(&self, text: &str) -> Result<TranslationResult> {
        self.translate(text, Language::Japanese, Language::English).await
    }

    /// Translate with backend language detection.
    ///
    /// The memory cannot be consulted without a source language, but the
    /// result is recorded under the detected one when it is supported.
    pub async fn auto_translate(&self, text: &str, target: Language) -> Result<TranslationResult> {
        let result = self.auto_translate_single(text, target).await;
        metrics::record_translation("auto", result.is_ok());
        result
    }

    async fn translate_single(&self, text: &str, source: Language, target: Language) -> Result<TranslationResult> {
        validate_pair(source, target)?;
        if text.trim().is_empty() {
            return Err(TranslateError::InvalidInput("text must not be blank".to_string()));
        }

        if let Some(hit) = self.resolve_cached(text, source, target) {
            return Ok(hit);
        }

        let translations = self
            .backend
            .translate(&[text.to_string()], Some(source), target)
            .await?;
        let translation = single_result(translations)?;

        self.memory
            .record(text, source, target, &translation.translated_text, EXACT_CONFIDENCE);
        info!("Translated {} -> {} via backend", source, target);

        Ok(fresh_result(translation, Some(source)))
    }

    async fn auto_translate_single(&self, text: &str, target: Language) -> Result<TranslationResult> {
        if text.trim().is_empty() {
            return Err(TranslateError::InvalidInput("text must not be blank".to_string()));
        }

        let translations = self.backend.translate(&[text.to_string()], None, target).await?;
        let translation = single_result(translations)?;

        match translation.detected_language.as_deref().and_then(Language::from_code) {
            Some(detected) if detected != target => {
                self.memory
                    .record(text, detected, target, &translation.translated_text, EXACT_CONFIDENCE);
            }
            _ => debug!(
                "Not recording auto translation (detected {:?}, target {})",
                translation.detected_language, target
            ),
        }

        Ok(fresh_result(translation, None))
    }

    /// Exact hit, else fuzzy hit (re-recorded under this text's own key),
    /// else `None`.
    pub(crate) fn resolve_cached(&self, text: &str, source: Language, target: Language) -> Option<TranslationResult> {
        if let Some(entry) = self.memory.lookup_exact(text, source, target) {
            metrics::record_exact_hit();
            debug!("Exact memory hit for {}", entry.key);
            return Some(TranslationResult::from_cache(entry));
        }

        if let Some(entry) = self.memory.lookup_fuzzy(text, source, target) {
            metrics::record_fuzzy_hit();
            let confidence = self.memory.config().fuzzy_confidence;
            let recorded = self
                .memory
                .record(text, source, target, &entry.translated_text, confidence);

            return Some(match recorded {
                Some(entry) => TranslationResult::from_cache(entry),
                None => TranslationResult {
                    translated_text: entry.translated_text,
                    detected_language: Some(source.code().to_string()),
                    confidence,
                    from_cache: true,
                },
            });
        }

        metrics::record_memory_miss();
        None
    }
}

fn validate_pair(source: Language, target: Language) -> Result<()> {
    if source == target {
        return Err(TranslateError::InvalidInput(format!(
            "source and target language are both {}",
            source
        )));
    }
    Ok(())
}

fn single_result(translations: Vec<BackendTranslation>) -> Result<BackendTranslation> {
    let count = translations.len();
    let mut translations = translations.into_iter();
    match (translations.next(), count) {
        (Some(translation), 1) => Ok(translation),
        _ => Err(TranslateError::Backend(format!(
            "Expected 1 translation, received {}",
            count
        ))),
    }
}

/// Result for a text the backend just translated. The detected language
/// falls back to the requested source.
fn fresh_result(translation: BackendTranslation, source: Option<Language>) -> TranslationResult {
    TranslationResult {
        detected_language: translation
            .detected_language
            .or_else(|| source.map(|language| language.code().to_string())),
        translated_text: translation.translated_text,
        confidence: EXACT_CONFIDENCE,
        from_cache: false,
    }
}
