//! Versioned JSON persistence for the enhanced_input component
//!
//! A [`Store`] is a typed handle on a single key in the `.storage/`
//! directory. The whole value is written and read wholesale as one
//! JSON blob, wrapped in a versioned envelope.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, warn};

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("version mismatch for {key}: expected {expected}, found {found}")]
    VersionMismatch {
        key: String,
        expected: u32,
        found: u32,
    },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// On-disk wrapper with version tracking
///
/// JSON format:
/// ```json
/// {
///   "version": 1,
///   "key": "enhanced_input_storage",
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Envelope<T> {
    version: u32,
    key: String,
    data: T,
}

/// A typed handle on one versioned storage key.
///
/// Files live under `<config_dir>/.storage/<key>`. Saves are atomic:
/// the blob is written to `<key>.tmp` and renamed into place.
#[derive(Debug)]
pub struct Store<T> {
    path: PathBuf,
    key: String,
    version: u32,
    _data: PhantomData<fn() -> T>,
}

impl<T> Store<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Create a handle for `key` under `<config_dir>/.storage/`
    pub fn new(config_dir: impl AsRef<Path>, key: impl Into<String>, version: u32) -> Self {
        let key = key.into();
        Self {
            path: config_dir.as_ref().join(".storage").join(&key),
            key,
            version,
            _data: PhantomData,
        }
    }

    /// The storage key this handle reads and writes
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a blob has been persisted for this key
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the persisted value.
    ///
    /// Returns `Ok(None)` when nothing has been persisted yet. A blob
    /// written with a different major version is an error, not silently
    /// reinterpreted.
    pub async fn load(&self) -> StorageResult<Option<T>> {
        if !self.path.exists() {
            debug!(key = %self.key, "no persisted data");
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).await?;
        let envelope: Envelope<T> = serde_json::from_str(&content)?;

        if envelope.version != self.version {
            warn!(
                key = %self.key,
                found = envelope.version,
                expected = self.version,
                "refusing to load mismatched storage version"
            );
            return Err(StorageError::VersionMismatch {
                key: self.key.clone(),
                expected: self.version,
                found: envelope.version,
            });
        }

        debug!(key = %self.key, "loaded persisted data");
        Ok(Some(envelope.data))
    }

    /// Persist `data`, overwriting any prior blob for this key.
    pub async fn save(&self, data: &T) -> StorageResult<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).await?;
        }

        let envelope = Envelope {
            version: self.version,
            key: self.key.clone(),
            data,
        };
        let content = serde_json::to_string_pretty(&envelope)?;

        // Write to a temp file first, then atomically rename into place
        let temp_path = self.path.with_file_name(format!("{}.tmp", self.key));
        fs::write(&temp_path, &content).await?;
        fs::rename(&temp_path, &self.path).await?;

        debug!(key = %self.key, "saved persisted data");
        Ok(())
    }

    /// Delete the persisted blob, if any
    pub async fn delete(&self) -> StorageResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).await?;
            debug!(key = %self.key, "deleted persisted data");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    type Blob = HashMap<String, String>;

    fn sample() -> Blob {
        let mut data = Blob::new();
        data.insert("enhanced_input.notes".to_string(), "hello".to_string());
        data
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let store: Store<Blob> = Store::new(dir.path(), "enhanced_input_storage", 1);

        assert!(!store.exists());
        store.save(&sample()).await.unwrap();
        assert!(store.exists());

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, Some(sample()));
    }

    #[tokio::test]
    async fn test_load_missing_is_none() {
        let dir = TempDir::new().unwrap();
        let store: Store<Blob> = Store::new(dir.path(), "enhanced_input_storage", 1);

        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_version_mismatch_is_an_error() {
        let dir = TempDir::new().unwrap();
        let v1: Store<Blob> = Store::new(dir.path(), "enhanced_input_storage", 1);
        v1.save(&sample()).await.unwrap();

        let v2: Store<Blob> = Store::new(dir.path(), "enhanced_input_storage", 2);
        let err = v2.load().await.unwrap_err();
        assert!(matches!(
            err,
            StorageError::VersionMismatch {
                expected: 2,
                found: 1,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_save_overwrites_prior_blob() {
        let dir = TempDir::new().unwrap();
        let store: Store<Blob> = Store::new(dir.path(), "enhanced_input_storage", 1);

        store.save(&sample()).await.unwrap();
        let replacement = Blob::new();
        store.save(&replacement).await.unwrap();

        assert_eq!(store.load().await.unwrap(), Some(replacement));
    }

    #[tokio::test]
    async fn test_no_temp_file_left_behind() {
        let dir = TempDir::new().unwrap();
        let store: Store<Blob> = Store::new(dir.path(), "enhanced_input_storage", 1);
        store.save(&sample()).await.unwrap();

        let temp = store
            .path()
            .with_file_name("enhanced_input_storage.tmp");
        assert!(!temp.exists());
    }

    #[tokio::test]
    async fn test_delete() {
        let dir = TempDir::new().unwrap();
        let store: Store<Blob> = Store::new(dir.path(), "enhanced_input_storage", 1);

        store.save(&sample()).await.unwrap();
        store.delete().await.unwrap();
        assert!(!store.exists());

        // deleting again is a no-op
        store.delete().await.unwrap();
    }
}
