// Auto-translation of CMS fields on save
// Author: kelexine (https://github.com/kelexine)

use super::Translator;
use crate::backend::TranslationBackend;
use crate::error::Result;
use crate::models::{Language, LocalizedText, TranslationState};
use tracing::{info, warn};

impl<B: TranslationBackend> Translator<B> {
    /// Fill every field that still needs a translation.
    ///
    /// Fields are marked `Translating`, translated in one batch per source
    /// language and set to `Translated`. Fields already translated (including
    /// intentionally blank ones) are left alone. If a batch fails, fields
    /// still marked `Translating` go back to `NotTranslated` and the error is
    /// returned. Returns the number of fields filled.
    pub async fn translate_fields(&self, fields: &mut [LocalizedText]) -> Result<usize> {
        let pending: Vec<usize> = fields
            .iter()
            .enumerate()
            .filter(|(_, field)| field.needs_translation())
            .map(|(index, _)| index)
            .collect();

        if pending.is_empty() {
            return Ok(0);
        }

        for &index in &pending {
            fields[index].translation = TranslationState::Translating;
        }

        let mut translated = 0;
        for source in Language::ALL {
            let group: Vec<usize> = pending
                .iter()
                .copied()
                .filter(|&index| fields[index].source_language == source)
                .collect();
            if group.is_empty() {
                continue;
            }

            let texts: Vec<String> = group.iter().map(|&index| fields[index].source.clone()).collect();
            match self.batch_translate(&texts, source, source.counterpart()).await {
                Ok(results) => {
                    for (&index, result) in group.iter().zip(results) {
                        fields[index].translation = TranslationState::Translated(result.translated_text);
                        translated += 1;
                    }
                }
                Err(e) => {
                    warn!("Field translation from {} failed: {}", source, e);
                    for &index in &pending {
                        if fields[index].translation == TranslationState::Translating {
                            fields[index].translation = TranslationState::NotTranslated;
                        }
                    }
                    return Err(e);
                }
            }
        }

        info!("Translated {} of {} fields", translated, fields.len());
        Ok(translated)
    }
}
