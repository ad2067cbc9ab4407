//! Durable key-value storage trait.
//!
//! The original dashboard leaned on browser `localStorage` with manual
//! prefix scans for mass deletion. This trait is the typed replacement:
//! string keys, JSON string values, prefix-scoped clearing.
//!
//! # Implementations
//!
//! - [`crate::infrastructure::storage::FileStore`] - JSON file on disk
//! - [`crate::infrastructure::storage::MemoryStore`] - in-process map for tests

use crate::error::AppError;
use async_trait::async_trait;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, AppError>;

/// Typed key-value store backing the cache and persisted session state.
///
/// All values are opaque strings; callers serialize structure themselves.
/// Implementations must be safe to share across tasks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads a value by exact key.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] when the backing store cannot be read.
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Writes a value, overwriting unconditionally.
    async fn put(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Removes a single key. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Removes every key starting with `prefix`.
    ///
    /// This is how the whole reserved namespace is torn down on logout or
    /// reset.
    async fn clear_prefix(&self, prefix: &str) -> StorageResult<()>;
}
