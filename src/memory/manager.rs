// Translation memory - exact and fuzzy reuse of earlier translations
// Author: kelexine (https://github.com/kelexine)

use super::clock::{Clock, SystemClock};
use super::models::{
    normalize_text, CacheEntry, CacheKey, MemoryStats, StoredTranslation, MEMORY_STORAGE_KEY,
};
use super::similarity::word_overlap;
use super::storage::{BlobStore, FileBlobStore, InMemoryBlobStore};
use super::store::MemoryStore;
use crate::config::MemoryConfig;
use crate::metrics;
use crate::models::Language;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Local cache of translations, persisted as one blob.
///
/// Construct one per process (or per test) and share it through an `Arc`.
/// Every method is synchronous and releases the store lock before returning,
/// so callers may hold the memory across `.await` points freely.
///
/// Persistence problems never surface from here: a corrupt blob yields an
/// empty memory, and failed writes are logged and counted.
pub struct TranslationMemory {
    config: MemoryConfig,
    store: RwLock<MemoryStore>,
    storage: Arc<dyn BlobStore>,
    clock: Arc<dyn Clock>,
}

impl TranslationMemory {
    /// Load the memory described by `config`: file-backed under
    /// `storage_dir` when `persist` is on, process-local otherwise.
    pub fn from_config(config: &MemoryConfig) -> Self {
        let storage: Arc<dyn BlobStore> = if config.persist {
            Arc::new(FileBlobStore::new(&config.storage_dir))
        } else {
            Arc::new(InMemoryBlobStore::new())
        };
        Self::load(config.clone(), storage)
    }

    /// Load the memory from `storage`, dropping expired entries.
    pub fn load(config: MemoryConfig, storage: Arc<dyn BlobStore>) -> Self {
        Self::load_with_clock(config, storage, Arc::new(SystemClock))
    }

    /// Load with an explicit time source.
    pub fn load_with_clock(
        config: MemoryConfig,
        storage: Arc<dyn BlobStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let store = Self::read_store(storage.as_ref());
        let memory = Self {
            config,
            store: RwLock::new(store),
            storage,
            clock,
        };

        memory.evict_expired();

        let entries = memory.store.read().len();
        metrics::update_memory_entries(entries);
        info!("Loaded translation memory with {} entries", entries);

        memory
    }

    fn read_store(storage: &dyn BlobStore) -> MemoryStore {
        match storage.load(MEMORY_STORAGE_KEY) {
            Ok(Some(blob)) => MemoryStore::from_blob(&blob).unwrap_or_else(|e| {
                warn!("{}; starting with an empty translation memory", e);
                metrics::record_storage_failure("corrupt");
                MemoryStore::new()
            }),
            Ok(None) => MemoryStore::new(),
            Err(e) => {
                warn!("Failed to read translation memory: {}", e);
                metrics::record_storage_failure("load");
                MemoryStore::new()
            }
        }
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Stored, unexpired translation for exactly this text (after
    /// normalization) and language pair.
    pub fn lookup_exact(&self, text: &str, source: Language, target: Language) -> Option<CacheEntry> {
        if !self.config.enabled {
            return None;
        }

        let key = CacheKey::new(text, source, target);
        let now = self.clock.now_millis();
        let store = self.store.read();
        let stored = store.get(&key)?;

        if stored.age_millis(now) >= self.config.ttl_millis() {
            debug!("Exact entry for {} has expired", key);
            return None;
        }

        Some(CacheEntry::from_stored(key, stored))
    }

    /// Best unexpired translation of a similar text in the same language
    /// pair, if its word-overlap score reaches the threshold. Equal scores
    /// go to the key recorded first.
    pub fn lookup_fuzzy(&self, text: &str, source: Language, target: Language) -> Option<CacheEntry> {
        if !self.config.enabled || !self.config.fuzzy_matching {
            return None;
        }

        let query = normalize_text(text);
        if query.is_empty() {
            return None;
        }

        let now = self.clock.now_millis();
        let ttl = self.config.ttl_millis();
        let store = self.store.read();

        // iter_pair yields keys in insertion order, so only a strictly
        // better score replaces the current best
        let mut best: Option<(f64, CacheKey, &StoredTranslation)> = None;
        for (key, stored) in store.iter_pair(source, target) {
            if stored.age_millis(now) >= ttl {
                continue;
            }

            let score = word_overlap(&query, &key.text);
            if score < self.config.similarity_threshold {
                continue;
            }

            if best.as_ref().map_or(true, |(best_score, _, _)| score > *best_score) {
                best = Some((score, key, stored));
            }
        }

        best.map(|(score, key, stored)| {
            debug!("Fuzzy match {:.2} for {:?} via {}", score, query, key);
            CacheEntry::from_stored(key, stored)
        })
    }

    /// Remember a translation and persist the memory. Expired entries are
    /// purged first. Returns `None` when the memory is disabled, the text
    /// is blank or the confidence is not a finite number.
    pub fn record(
        &self,
        text: &str,
        source: Language,
        target: Language,
        translated_text: &str,
        confidence: f64,
    ) -> Option<CacheEntry> {
        if !self.config.enabled {
            return None;
        }

        let key = CacheKey::new(text, source, target);
        if key.text.is_empty() {
            return None;
        }

        // NaN would be written as null and fail the next load
        if !confidence.is_finite() {
            warn!("Refusing to record {} with non-finite confidence {}", key, confidence);
            return None;
        }

        let now = self.clock.now_millis();
        let mut store = self.store.write();

        let evicted = store.purge_expired(now, self.config.ttl_millis());
        if evicted > 0 {
            debug!("Purged {} expired entries before write", evicted);
            metrics::record_evictions(evicted);
        }

        let stored = StoredTranslation {
            text: translated_text.to_string(),
            timestamp: now,
            confidence: confidence.clamp(0.0, 1.0),
        };
        store.insert(&key, stored.clone());
        debug!("Recorded translation for {} (confidence {:.2})", key, stored.confidence);

        metrics::update_memory_entries(store.len());
        self.persist(&store);

        Some(CacheEntry::from_stored(key, &stored))
    }

    /// Drop every entry older than the retention window. Returns the number
    /// of translations removed.
    pub fn evict_expired(&self) -> usize {
        let now = self.clock.now_millis();
        let mut store = self.store.write();

        let removed = store.purge_expired(now, self.config.ttl_millis());
        if removed > 0 {
            info!("Evicted {} expired translations", removed);
            metrics::record_evictions(removed);
            metrics::update_memory_entries(store.len());
            self.persist(&store);
        }

        removed
    }

    /// Forget everything, including the persisted blob.
    pub fn clear(&self) {
        let mut store = self.store.write();
        store.clear();
        metrics::update_memory_entries(0);

        if let Err(e) = self.storage.remove(MEMORY_STORAGE_KEY) {
            warn!("Failed to remove persisted translation memory: {}", e);
            metrics::record_storage_failure("remove");
        }

        info!("Translation memory cleared");
    }

    pub fn stats(&self) -> MemoryStats {
        let store = self.store.read();
        MemoryStats {
            total_entries: store.len(),
            total_size_bytes: store.serialized_size(),
        }
    }

    // Runs under the write lock so blobs hit storage in mutation order
    fn persist(&self, store: &MemoryStore) {
        let saved = store
            .to_blob()
            .and_then(|blob| self.storage.save(MEMORY_STORAGE_KEY, &blob));

        if let Err(e) = saved {
            warn!("Failed to persist translation memory: {}", e);
            metrics::record_storage_failure("save");
        }
    }
}
