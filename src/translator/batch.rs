// Batch translation with chunked, concurrent backend calls
// Author: kelexine (https://github.com/kelexine)

use super::{fresh_result, validate_pair, Translator};
use crate::backend::TranslationBackend;
use crate::error::{TranslateError, Result};
use crate::memory::{CacheKey, TranslationResult, EXACT_CONFIDENCE};
use crate::metrics;
use crate::models::Language;
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// A text that missed the memory, with every input position it fills.
struct Pending {
    text: String,
    positions: Vec<usize>,
}

impl<B: TranslationBackend> Translator<B> {
    /// Translate many texts, returning results in input order.
    ///
    /// Texts are resolved through the memory first. The rest are
    /// de-duplicated, split into chunks of `batch_size` and sent with up to
    /// `max_concurrent_batches` calls in flight. Chunks are consumed in
    /// order; the first failure aborts the batch after earlier chunks have
    /// been recorded.
    pub async fn batch_translate(
        &self,
        texts: &[String],
        source: Language,
        target: Language,
    ) -> Result<Vec<TranslationResult>> {
        let result = self.batch_translate_inner(texts, source, target).await;
        metrics::record_translation("batch", result.is_ok());
        result
    }

    async fn batch_translate_inner(
        &self,
        texts: &[String],
        source: Language,
        target: Language,
    ) -> Result<Vec<TranslationResult>> {
        validate_pair(source, target)?;
        if let Some(index) = texts.iter().position(|text| text.trim().is_empty()) {
            return Err(TranslateError::InvalidInput(format!(
                "text at index {} must not be blank",
                index
            )));
        }
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut results: Vec<Option<TranslationResult>> = vec![None; texts.len()];
        let mut pending: Vec<Pending> = Vec::new();
        let mut pending_by_key: HashMap<CacheKey, usize> = HashMap::new();

        for (index, text) in texts.iter().enumerate() {
            let key = CacheKey::new(text, source, target);
            if let Some(&slot) = pending_by_key.get(&key) {
                pending[slot].positions.push(index);
                continue;
            }

            match self.resolve_cached(text, source, target) {
                Some(hit) => results[index] = Some(hit),
                None => {
                    pending_by_key.insert(key, pending.len());
                    pending.push(Pending {
                        text: text.clone(),
                        positions: vec![index],
                    });
                }
            }
        }

        debug!(
            "Batch of {}: {} resolved from memory, {} unique texts for backend",
            texts.len(),
            texts.len() - pending.iter().map(|p| p.positions.len()).sum::<usize>(),
            pending.len()
        );

        if !pending.is_empty() {
            self.translate_pending(&pending, &mut results, source, target).await?;
        }

        results
            .into_iter()
            .enumerate()
            .map(|(index, result)| {
                result.ok_or_else(|| {
                    TranslateError::Internal(format!("batch position {} was never resolved", index))
                })
            })
            .collect()
    }

    async fn translate_pending(
        &self,
        pending: &[Pending],
        results: &mut [Option<TranslationResult>],
        source: Language,
        target: Language,
    ) -> Result<()> {
        let chunks: Vec<(usize, Vec<String>)> = pending
            .chunks(self.batch_size)
            .enumerate()
            .map(|(n, chunk)| (n * self.batch_size, chunk.iter().map(|p| p.text.clone()).collect()))
            .collect();
        let chunk_count = chunks.len();

        let backend = &self.backend;
        let mut responses = stream::iter(chunks)
            .map(move |(offset, chunk)| async move {
                let outcome = backend.translate(&chunk, Some(source), target).await;
                (offset, chunk, outcome)
            })
            .buffered(self.max_concurrent_batches);

        while let Some((offset, chunk, outcome)) = responses.next().await {
            let translations = outcome.map_err(|e| {
                warn!("Batch chunk at offset {} failed: {}", offset, e);
                e
            })?;

            if translations.len() != chunk.len() {
                return Err(TranslateError::Backend(format!(
                    "Expected {} translations, received {}",
                    chunk.len(),
                    translations.len()
                )));
            }

            for (i, translation) in translations.into_iter().enumerate() {
                let item = &pending[offset + i];
                self.memory
                    .record(&item.text, source, target, &translation.translated_text, EXACT_CONFIDENCE);

                let result = fresh_result(translation, Some(source));
                for &position in &item.positions {
                    results[position] = Some(result.clone());
                }
            }
        }

        info!(
            "Translated {} texts {} -> {} in {} backend calls",
            pending.len(),
            source,
            target,
            chunk_count
        );
        Ok(())
    }
}
