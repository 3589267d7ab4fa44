// In-memory translation store and its persisted JSON shape
// Author: kelexine (https://github.com/kelexine)

use super::models::{CacheKey, StoredTranslation};
use crate::error::{TranslateError, Result};
use crate::models::Language;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;

/// Target language code → translation.
type Targets = BTreeMap<String, StoredTranslation>;

/// One key's translations and its position in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
struct Slot {
    seq: u64,
    targets: Targets,
}

/// Key string → target language code → translation.
///
/// Serializes to `{"en:ja:hello": {"ja": {"text": "...", "timestamp": 0, "confidence": 1.0}}}`,
/// the same blob the CMS dashboard kept in browser storage. Keys are written
/// and read in insertion order; overwriting a key keeps its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    entries: BTreeMap<String, Slot>,
    next_seq: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a persisted blob. Keys that do not parse are dropped; the rest
    /// are rewritten to their canonical form.
    pub fn from_blob(blob: &str) -> Result<Self> {
        let raw: MemoryStore = serde_json::from_str(blob)
            .map_err(|e| TranslateError::CacheCorruption(e.to_string()))?;

        let before = raw.entries.len();
        let mut store = MemoryStore::new();
        for (raw_key, slot) in raw.in_order() {
            let Some(parsed) = CacheKey::parse(raw_key) else {
                continue;
            };
            let key = CacheKey::new(&parsed.text, parsed.source, parsed.target);
            if key.text.is_empty() || slot.targets.is_empty() {
                continue;
            }
            let merged = store.slot_mut(key.to_string());
            for (code, stored) in &slot.targets {
                let newer = merged
                    .targets
                    .get(code)
                    .map_or(true, |existing| stored.timestamp > existing.timestamp);
                if newer {
                    merged.targets.insert(code.clone(), stored.clone());
                }
            }
        }

        let dropped = before - store.entries.len();
        if dropped > 0 {
            warn!("Dropped or merged {} malformed translation memory keys", dropped);
        }

        Ok(store)
    }

    pub fn to_blob(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Size in bytes of the serialized store.
    pub fn serialized_size(&self) -> usize {
        self.to_blob().map(|blob| blob.len()).unwrap_or(0)
    }

    pub fn get(&self, key: &CacheKey) -> Option<&StoredTranslation> {
        self.entries
            .get(&key.to_string())
            .and_then(|slot| slot.targets.get(key.target.code()))
    }

    pub fn insert(&mut self, key: &CacheKey, translation: StoredTranslation) {
        let mut targets = Targets::new();
        targets.insert(key.target.code().to_string(), translation);
        self.merge_slot(key.to_string(), targets);
    }

    /// Every entry translating `source` into `target`, oldest key first.
    pub fn iter_pair(
        &self,
        source: Language,
        target: Language,
    ) -> impl Iterator<Item = (CacheKey, &StoredTranslation)> + '_ {
        self.in_order().into_iter().filter_map(move |(raw, slot)| {
            let key = CacheKey::parse(raw)?;
            if key.source != source || key.target != target {
                return None;
            }
            let stored = slot.targets.get(target.code())?;
            Some((key, stored))
        })
    }

    /// Drop every translation at least `ttl_millis` old, then every key left
    /// without translations. Returns the number of translations removed.
    pub fn purge_expired(&mut self, now_millis: i64, ttl_millis: i64) -> usize {
        let mut removed = 0;
        self.entries.retain(|_, slot| {
            let before = slot.targets.len();
            slot.targets.retain(|_, stored| stored.age_millis(now_millis) < ttl_millis);
            removed += before - slot.targets.len();
            !slot.targets.is_empty()
        });
        removed
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    // Existing keys keep their position; per target the later write wins
    fn merge_slot(&mut self, key: String, targets: Targets) {
        self.slot_mut(key).targets.extend(targets);
    }

    fn slot_mut(&mut self, key: String) -> &mut Slot {
        let next_seq = &mut self.next_seq;
        self.entries.entry(key).or_insert_with(|| {
            let seq = *next_seq;
            *next_seq += 1;
            Slot {
                seq,
                targets: Targets::new(),
            }
        })
    }

    fn in_order(&self) -> Vec<(&String, &Slot)> {
        let mut slots: Vec<_> = self.entries.iter().collect();
        slots.sort_by_key(|(_, slot)| slot.seq);
        slots
    }
}

impl Serialize for MemoryStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let slots = self.in_order();
        let mut map = serializer.serialize_map(Some(slots.len()))?;
        for (key, slot) in slots {
            map.serialize_entry(key, &slot.targets)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for MemoryStore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(StoreVisitor)
    }
}

/// Reads keys in document order so positions survive a reload.
struct StoreVisitor;

impl<'de> Visitor<'de> for StoreVisitor {
    type Value = MemoryStore;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of translation memory keys")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<MemoryStore, A::Error> {
        let mut store = MemoryStore::new();
        while let Some((key, targets)) = access.next_entry::<String, Targets>()? {
            store.merge_slot(key, targets);
        }
        Ok(store)
    }
}
