//! Response cache keyed by (action, normalized parameters).
//!
//! Every successful gateway fetch is written here unconditionally; entries
//! are never expired — invalidation is manual, via forced refresh or the
//! full reset that [`ResponseCache::clear_all`] performs. Staleness is
//! user-managed by design.

use crate::domain::action::Action;
use crate::domain::storage::KeyValueStore;
use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Reserved key namespace in durable storage. Everything the dashboard
/// persists — cache entries, timestamps, credential, period — lives under
/// this prefix so one prefix clear tears the whole session down.
pub const RESERVED_PREFIX: &str = "shortio:";

const CACHE_PREFIX: &str = "shortio:cache:";

/// Ordered query parameters, as they travel on the wire.
pub type Params = Vec<(String, String)>;

/// Drops nullish entries from a parameter list, preserving order.
///
/// This is the only normalization applied to the wire form; key derivation
/// additionally canonicalizes ordering (see [`cache_key`]).
pub fn normalize_params(pairs: &[(&str, Option<String>)]) -> Params {
    pairs
        .iter()
        .filter_map(|(k, v)| v.as_ref().map(|v| (k.to_string(), v.clone())))
        .collect()
}

/// Derives the composite cache key for an action + parameter mapping.
///
/// Parameters are sorted by name before serialization so two logically
/// identical requests hit the same entry regardless of construction order.
pub fn cache_key(action: Action, params: &Params) -> String {
    let mut sorted: Vec<&(String, String)> = params.iter().collect();
    sorted.sort();

    let mut key = format!("{CACHE_PREFIX}{action}");
    for (k, v) in sorted {
        key.push(':');
        key.push_str(k);
        key.push('=');
        key.push_str(v);
    }
    key
}

/// A cached payload plus the moment it was fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub payload: Value,
    pub retrieved_at: DateTime<Utc>,
}

/// Process-local, durable response cache.
pub struct ResponseCache {
    store: Arc<dyn KeyValueStore>,
}

impl ResponseCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Looks up the cached entry for (action, params).
    ///
    /// Fail-open: a storage error or an unreadable entry is treated as a
    /// miss (and the bad entry dropped), never surfaced to the caller.
    pub async fn get(&self, action: Action, params: &Params) -> Option<CacheEntry> {
        let key = cache_key(action, params);

        let raw = match self.store.get(&key).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Cache read error for {key}: {e}");
                return None;
            }
        };

        match serde_json::from_str::<CacheEntry>(&raw) {
            Ok(entry) => {
                debug!("Cache HIT: {key}");
                Some(entry)
            }
            Err(e) => {
                warn!("Dropping unreadable cache entry {key}: {e}");
                let _ = self.store.delete(&key).await;
                None
            }
        }
    }

    /// Stores `payload` under the normalized key with the current time,
    /// overwriting unconditionally.
    pub async fn put(&self, action: Action, params: &Params, payload: Value) -> CacheEntry {
        let entry = CacheEntry {
            payload,
            retrieved_at: Utc::now(),
        };

        let key = cache_key(action, params);
        match serde_json::to_string(&entry) {
            Ok(raw) => {
                if let Err(e) = self.store.put(&key, &raw).await {
                    warn!("Cache write error for {key}: {e}");
                } else {
                    debug!("Cache SET: {key}");
                }
            }
            Err(e) => warn!("Cache serialize error for {key}: {e}"),
        }

        entry
    }

    /// Removes everything under the reserved prefix — cache entries and
    /// persisted session state alike. Used for logout and explicit reset.
    pub async fn clear_all(&self) -> Result<(), AppError> {
        debug!("Clearing all entries under '{RESERVED_PREFIX}'");
        self.store.clear_prefix(RESERVED_PREFIX).await
    }
}
