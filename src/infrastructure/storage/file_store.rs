//! JSON-file-backed durable store.
//!
//! The Rust stand-in for the browser's `localStorage`: one flat JSON object
//! of string keys to string values, rewritten atomically on every mutation.
//! Volumes are tiny (one credential, a handful of cache entries), so a full
//! rewrite per write is fine.

use crate::domain::storage::{KeyValueStore, StorageResult};
use crate::error::AppError;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Durable [`KeyValueStore`] persisted to a single JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Guards read-modify-write cycles against concurrent mutations.
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Opens (or creates) the store at `path`, loading any existing content.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] if an existing file cannot be read or
    /// is not valid JSON.
    pub async fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();

        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| {
                AppError::storage(format!("{} is not a valid store file: {e}", path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(AppError::storage(format!(
                    "Failed to read {}: {e}",
                    path.display()
                )));
            }
        };

        debug!("Opened store at {} ({} entries)", path.display(), entries.len());

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Writes the whole map out via a temp file + rename so a crash never
    /// leaves a half-written store behind.
    async fn flush(&self, entries: &BTreeMap<String, String>) -> StorageResult<()> {
        let raw = serde_json::to_string_pretty(entries)
            .map_err(|e| AppError::storage(format!("Failed to serialize store: {e}")))?;

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, raw)
            .await
            .map_err(|e| AppError::storage(format!("Failed to write {}: {e}", tmp.display())))?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            warn!("Failed to replace {}: {e}", self.path.display());
            AppError::storage(format!("Failed to replace {}: {e}", self.path.display()))
        })?;

        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries).await
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.entries.lock().await;
        if entries.remove(key).is_some() {
            self.flush(&entries).await?;
        }
        Ok(())
    }

    async fn clear_prefix(&self, prefix: &str) -> StorageResult<()> {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|k, _| !k.starts_with(prefix));
        if entries.len() != before {
            debug!("Cleared {} entries under '{}'", before - entries.len(), prefix);
            self.flush(&entries).await?;
        }
        Ok(())
    }
}
