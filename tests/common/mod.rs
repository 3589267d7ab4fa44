// Shared test fixtures
// Author: kelexine (https://github.com/kelexine)

#![allow(dead_code)]

use en2ja::backend::{BackendTranslation, TranslationBackend};
use en2ja::config::MemoryConfig;
use en2ja::error::{TranslateError, Result};
use en2ja::memory::{Clock, InMemoryBlobStore, ManualClock, TranslationMemory};
use en2ja::models::Language;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

pub const DAY: i64 = 24 * 60 * 60 * 1000;

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendCall {
    pub texts: Vec<String>,
    pub source: Option<Language>,
    pub target: Language,
}

/// Deterministic backend: translates `text` to `"{target}:{text}"` and
/// records every call. Texts listed in `fail_on` make the whole call fail.
#[derive(Default)]
pub struct MockBackend {
    calls: Mutex<Vec<BackendCall>>,
    fail_on: Mutex<HashSet<String>>,
    detected: Mutex<Option<String>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(&self, text: &str) {
        self.fail_on.lock().insert(text.to_string());
    }

    /// Language reported for auto-detection calls.
    pub fn detect_as(&self, code: &str) {
        *self.detected.lock() = Some(code.to_string());
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn translated(text: &str, target: Language) -> String {
        format!("{}:{}", target.code(), text)
    }
}

impl TranslationBackend for MockBackend {
    async fn translate(
        &self,
        texts: &[String],
        source: Option<Language>,
        target: Language,
    ) -> Result<Vec<BackendTranslation>> {
        self.calls.lock().push(BackendCall {
            texts: texts.to_vec(),
            source,
            target,
        });

        if texts.iter().any(|text| self.fail_on.lock().contains(text)) {
            return Err(TranslateError::Backend("HTTP 503: backend unavailable".to_string()));
        }

        let detected = match source {
            Some(_) => None,
            None => self.detected.lock().clone(),
        };

        Ok(texts
            .iter()
            .map(|text| BackendTranslation {
                translated_text: Self::translated(text, target),
                detected_language: detected.clone(),
            })
            .collect())
    }
}

/// A process-local memory on a manual clock.
pub fn memory_at(now: i64) -> (Arc<TranslationMemory>, Arc<ManualClock>) {
    memory_with(MemoryConfig::default(), Arc::new(InMemoryBlobStore::new()), now)
}

pub fn memory_with(
    config: MemoryConfig,
    storage: Arc<InMemoryBlobStore>,
    now: i64,
) -> (Arc<TranslationMemory>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(now));
    let memory = TranslationMemory::load_with_clock(config, storage, Arc::clone(&clock) as Arc<dyn Clock>);
    (Arc::new(memory), clock)
}
