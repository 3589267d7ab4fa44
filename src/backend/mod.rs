// Translation backend module
// Author: kelexine (https://github.com/kelexine)

mod client;

pub use client::GoogleTranslateClient;

use crate::error::{TranslateError, Result};
use crate::models::Language;
use std::future::Future;
use std::sync::Arc;

/// One translated text as returned by a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendTranslation {
    pub translated_text: String,
    /// Source language code reported by the backend, when it detected one.
    pub detected_language: Option<String>,
}

/// Remote text translation.
///
/// Implementations translate every text in `texts` and return exactly one
/// result per input, in input order. `source = None` asks the backend to
/// detect the source language.
pub trait TranslationBackend: Send + Sync {
    fn translate(
        &self,
        texts: &[String],
        source: Option<Language>,
        target: Language,
    ) -> impl Future<Output = Result<Vec<BackendTranslation>>> + Send;

    /// Whether calls can be expected to reach a translation service.
    fn is_ready(&self) -> bool {
        true
    }
}

impl<B: TranslationBackend> TranslationBackend for Arc<B> {
    fn translate(
        &self,
        texts: &[String],
        source: Option<Language>,
        target: Language,
    ) -> impl Future<Output = Result<Vec<BackendTranslation>>> + Send {
        self.as_ref().translate(texts, source, target)
    }

    fn is_ready(&self) -> bool {
        self.as_ref().is_ready()
    }
}

/// An absent backend: every call fails with `NotConfigured`, so memory hits
/// keep working without an API key.
impl<B: TranslationBackend> TranslationBackend for Option<B> {
    async fn translate(
        &self,
        texts: &[String],
        source: Option<Language>,
        target: Language,
    ) -> Result<Vec<BackendTranslation>> {
        match self {
            Some(backend) => backend.translate(texts, source, target).await,
            None => Err(TranslateError::NotConfigured(
                "no translation backend; set translation.api_key or GOOGLE_TRANSLATE_API_KEY"
                    .to_string(),
            )),
        }
    }

    fn is_ready(&self) -> bool {
        self.as_ref().is_some_and(TranslationBackend::is_ready)
    }
}
