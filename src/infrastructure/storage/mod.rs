//! Storage backends for the [`KeyValueStore`] trait.
//!
//! [`KeyValueStore`]: crate::domain::storage::KeyValueStore

mod file_store;
mod memory_store;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;
