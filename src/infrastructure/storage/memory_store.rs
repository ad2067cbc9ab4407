//! In-process map implementation, used in tests and as a non-durable
//! fallback when no storage path is usable.

use crate::domain::storage::{KeyValueStore, StorageResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Volatile [`KeyValueStore`] backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries; handy in assertions.
    pub fn len(&self) -> usize {
        self.entries.lock().expect("store mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self
            .entries
            .lock()
            .expect("store mutex poisoned")
            .get(key)
            .cloned())
    }

    async fn put(&self, key: &str, value: &str) -> StorageResult<()> {
        self.entries
            .lock()
            .expect("store mutex poisoned")
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        self.entries
            .lock()
            .expect("store mutex poisoned")
            .remove(key);
        Ok(())
    }

    async fn clear_prefix(&self, prefix: &str) -> StorageResult<()> {
        self.entries
            .lock()
            .expect("store mutex poisoned")
            .retain(|k, _| !k.starts_with(prefix));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_delete() {
        let store = MemoryStore::new();

        store.put("a", "1").await.unwrap();
        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("1"));

        store.delete("a").await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), None);

        // Deleting again is fine.
        store.delete("a").await.unwrap();
    }

    #[tokio::test]
    async fn test_overwrite() {
        let store = MemoryStore::new();
        store.put("k", "old").await.unwrap();
        store.put("k", "new").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_clear_prefix_leaves_other_keys() {
        let store = MemoryStore::new();
        store.put("shortio:cache:a", "1").await.unwrap();
        store.put("shortio:api_key", "sk_x").await.unwrap();
        store.put("other:key", "keep").await.unwrap();

        store.clear_prefix("shortio:").await.unwrap();

        assert_eq!(store.get("shortio:cache:a").await.unwrap(), None);
        assert_eq!(store.get("shortio:api_key").await.unwrap(), None);
        assert_eq!(store.get("other:key").await.unwrap().as_deref(), Some("keep"));
    }
}
