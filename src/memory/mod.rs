//! Translation memory.
//!
//! A local cache in front of the translation backend. Translations are keyed
//! by language pair and normalized source text, reused verbatim on exact hits
//! and with reduced confidence for near-duplicate texts, expired after a fixed
//! retention window, and persisted as a single JSON blob.
//!
//! # Submodules
//!
//! - `manager`: the `TranslationMemory` itself.
//! - `models`: keys, entries, results and statistics.
//! - `store`: the in-memory map and its persisted shape.
//! - `similarity`: the word-overlap score used for fuzzy hits.
//! - `storage`: blob stores (file-backed and process-local).
//! - `clock`: time sources for expiry.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod clock;
pub mod manager;
pub mod models;
pub mod similarity;
pub mod storage;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use manager::TranslationMemory;
pub use models::{
    CacheEntry, CacheKey, MemoryStats, TranslationResult, EXACT_CONFIDENCE, MEMORY_STORAGE_KEY,
};
pub use storage::{BlobStore, FileBlobStore, InMemoryBlobStore};
