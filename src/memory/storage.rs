//! Durable blob storage for the translation memory.
//!
//! The memory is persisted as a single JSON blob under a fixed key. A store
//! only has to read, write and delete that blob.

// Author: kelexine (https://github.com/kelexine)

use crate::error::Result;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Key-value storage for opaque text blobs.
pub trait BlobStore: Send + Sync {
    /// Read the blob stored under `key`, if any.
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Replace the blob stored under `key`.
    fn save(&self, key: &str, blob: &str) -> Result<()>;

    /// Delete the blob stored under `key`. Deleting a missing blob succeeds.
    fn remove(&self, key: &str) -> Result<()>;
}

/// One `<key>.json` file per blob inside a directory.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl BlobStore for FileBlobStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, key: &str, blob: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        // Write next to the target and rename, so readers never see half a blob
        let path = self.path_for(key);
        let tmp_path = self.dir.join(format!(".{}.json.tmp", key));
        fs::write(&tmp_path, blob)?;
        fs::rename(&tmp_path, &path)?;

        debug!("Persisted {} bytes to {}", blob.len(), path.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local store; contents vanish with the process.
#[derive(Debug, Default)]
pub struct InMemoryBlobStore {
    blobs: Mutex<HashMap<String, String>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one blob.
    pub fn with_blob(key: &str, blob: impl Into<String>) -> Self {
        let store = Self::new();
        store.blobs.lock().insert(key.to_string(), blob.into());
        store
    }
}

impl BlobStore for InMemoryBlobStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.blobs.lock().get(key).cloned())
    }

    fn save(&self, key: &str, blob: &str) -> Result<()> {
        self.blobs.lock().insert(key.to_string(), blob.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.blobs.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileBlobStore::new(dir.path().join("nested"));

        assert_eq!(store.load("memory").unwrap(), None);

        store.save("memory", "{\"a\":1}").unwrap();
        assert_eq!(store.load("memory").unwrap().as_deref(), Some("{\"a\":1}"));
        assert!(store.path_for("memory").exists());

        store.remove("memory").unwrap();
        assert_eq!(store.load("memory").unwrap(), None);
        // Removing twice is fine
        store.remove("memory").unwrap();
    }

    #[test]
    fn test_in_memory_store() {
        let store = InMemoryBlobStore::with_blob("k", "v");
        assert_eq!(store.load("k").unwrap().as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert_eq!(store.load("k").unwrap(), None);
    }
}
