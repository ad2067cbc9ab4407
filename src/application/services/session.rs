//! Session state: credential, active period, loading counter, error banner.
//!
//! This is the explicit context object replacing the original dashboard's
//! scattered globals. Credential and period are mirrored into durable
//! storage under the reserved prefix; everything else is in-memory only.

use crate::domain::period::{Period, Preset};
use crate::domain::storage::KeyValueStore;
use crate::error::AppError;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use tracing::warn;

const API_KEY_KEY: &str = "shortio:api_key";
const PERIOD_KEY: &str = "shortio:period";
const PERIOD_START_KEY: &str = "shortio:period_start";
const PERIOD_END_KEY: &str = "shortio:period_end";

/// Prefix every valid short.io API key starts with.
const CREDENTIAL_PREFIX: &str = "sk_";

/// Validates the credential format: trimmed, non-empty, `sk_`-prefixed.
///
/// Format is the only thing checked here — whether the key is actually
/// accepted is decided by the upstream on first use.
pub fn validate_credential(raw: &str) -> Result<String, AppError> {
    let key = raw.trim();
    if !key.starts_with(CREDENTIAL_PREFIX) {
        return Err(AppError::validation(format!(
            "Invalid API key format. It should start with \"{CREDENTIAL_PREFIX}\"."
        )));
    }
    Ok(key.to_string())
}

/// Mutable session context held by the controller.
pub struct Session {
    store: Arc<dyn KeyValueStore>,
    credential: Option<String>,
    period: Period,
    /// Count of in-flight fetches; drives the single shared loading flag.
    pending_ops: u32,
    last_error: Option<String>,
    /// Timestamp of the newest payload shown, cached or fresh.
    last_retrieved: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            credential: None,
            period: Period::default(),
            pending_ops: 0,
            last_error: None,
            last_retrieved: None,
        }
    }

    /// Restores persisted credential and period from durable storage.
    ///
    /// Unreadable persisted values are dropped silently and defaults used;
    /// a missing store entry is simply "not logged in yet".
    pub async fn restore(&mut self) {
        match self.store.get(API_KEY_KEY).await {
            Ok(credential) => self.credential = credential,
            Err(e) => warn!("Failed to restore credential: {e}"),
        }

        self.period = self.restore_period().await;
    }

    async fn restore_period(&self) -> Period {
        let name = match self.store.get(PERIOD_KEY).await {
            Ok(Some(name)) => name,
            Ok(None) => return Period::default(),
            Err(e) => {
                warn!("Failed to restore period: {e}");
                return Period::default();
            }
        };

        if name == "custom" {
            let start = self.restore_date(PERIOD_START_KEY).await;
            let end = self.restore_date(PERIOD_END_KEY).await;
            match Period::custom(start, end) {
                Ok(period) => period,
                Err(_) => Period::default(),
            }
        } else {
            Preset::parse(&name).map(Period::Preset).unwrap_or_default()
        }
    }

    async fn restore_date(&self, key: &str) -> Option<NaiveDate> {
        self.store
            .get(key)
            .await
            .ok()
            .flatten()
            .and_then(|raw| raw.parse().ok())
    }

    // ─── Credential ──────────────────────────────────────────────────────────

    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.credential.is_some()
    }

    /// Stores a (format-validated) credential in memory and durably.
    pub async fn set_credential(&mut self, credential: String) {
        if let Err(e) = self.store.put(API_KEY_KEY, &credential).await {
            warn!("Failed to persist credential: {e}");
        }
        self.credential = Some(credential);
    }

    /// Forgets all in-memory session identity and display state.
    ///
    /// Durable state is cleared separately via the cache's prefix clear so
    /// the two teardown paths (logout, 401/403) share one implementation.
    pub fn clear_in_memory(&mut self) {
        self.credential = None;
        self.period = Period::default();
        self.pending_ops = 0;
        self.last_error = None;
        self.last_retrieved = None;
    }

    // ─── Period ──────────────────────────────────────────────────────────────

    pub fn period(&self) -> Period {
        self.period
    }

    /// Activates a preset, dropping any persisted custom dates.
    pub async fn set_period_preset(&mut self, preset: Preset) {
        self.period = Period::Preset(preset);
        if let Err(e) = self.store.put(PERIOD_KEY, preset.as_str()).await {
            warn!("Failed to persist period: {e}");
        }
        let _ = self.store.delete(PERIOD_START_KEY).await;
        let _ = self.store.delete(PERIOD_END_KEY).await;
    }

    /// Activates a validated custom range and persists its dates.
    pub async fn set_custom_period(&mut self, period: Period) {
        let Period::Custom { start, end } = period else {
            return;
        };
        self.period = period;
        for (key, value) in [
            (PERIOD_KEY, "custom".to_string()),
            (PERIOD_START_KEY, start.to_string()),
            (PERIOD_END_KEY, end.to_string()),
        ] {
            if let Err(e) = self.store.put(key, &value).await {
                warn!("Failed to persist period: {e}");
            }
        }
    }

    // ─── Loading indicator ───────────────────────────────────────────────────

    pub fn begin_op(&mut self) {
        self.pending_ops += 1;
    }

    /// Decrements the in-flight counter, clamped at zero.
    pub fn end_op(&mut self) {
        self.pending_ops = self.pending_ops.saturating_sub(1);
    }

    pub fn is_loading(&self) -> bool {
        self.pending_ops > 0
    }

    // ─── Error banner and timestamp display ──────────────────────────────────

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn note_retrieved(&mut self, at: DateTime<Utc>) {
        self.last_retrieved = Some(at);
    }

    pub fn last_retrieved(&self) -> Option<DateTime<Utc>> {
        self.last_retrieved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::MemoryStore;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    /// Everything the session persists must sit under the reserved prefix,
    /// or the logout prefix-clear would miss it.
    #[test]
    fn test_persisted_keys_under_reserved_prefix() {
        use crate::application::services::cache_service::RESERVED_PREFIX;
        for key in [API_KEY_KEY, PERIOD_KEY, PERIOD_START_KEY, PERIOD_END_KEY] {
            assert!(key.starts_with(RESERVED_PREFIX), "{key}");
        }
    }

    #[test]
    fn test_validate_credential() {
        assert_eq!(validate_credential("sk_abc123").unwrap(), "sk_abc123");
        assert_eq!(validate_credential("  sk_abc123  ").unwrap(), "sk_abc123");
        assert!(validate_credential("pk_abc123").is_err());
        assert!(validate_credential("").is_err());
        assert!(validate_credential("   ").is_err());
    }

    #[tokio::test]
    async fn test_credential_round_trip() {
        let store = Arc::new(MemoryStore::new());

        let mut session = Session::new(store.clone());
        session.set_credential("sk_test".to_string()).await;
        assert!(session.is_authenticated());

        let mut restored = Session::new(store);
        restored.restore().await;
        assert_eq!(restored.credential(), Some("sk_test"));
    }

    #[tokio::test]
    async fn test_period_restored_verbatim() {
        let store = Arc::new(MemoryStore::new());

        let mut session = Session::new(store.clone());
        let custom = Period::custom(Some(date("2026-01-01")), Some(date("2026-01-31"))).unwrap();
        session.set_custom_period(custom).await;

        let mut restored = Session::new(store);
        restored.restore().await;
        assert_eq!(restored.period(), custom);
    }

    #[tokio::test]
    async fn test_preset_drops_custom_dates() {
        let store = Arc::new(MemoryStore::new());

        let mut session = Session::new(store.clone());
        let custom = Period::custom(Some(date("2026-01-01")), Some(date("2026-01-31"))).unwrap();
        session.set_custom_period(custom).await;
        session.set_period_preset(Preset::Last7).await;

        assert_eq!(store.get("shortio:period_start").await.unwrap(), None);
        assert_eq!(store.get("shortio:period_end").await.unwrap(), None);

        let mut restored = Session::new(store);
        restored.restore().await;
        assert_eq!(restored.period(), Period::Preset(Preset::Last7));
    }

    #[tokio::test]
    async fn test_missing_period_defaults_to_last30() {
        let mut session = Session::new(Arc::new(MemoryStore::new()));
        session.restore().await;
        assert_eq!(session.period(), Period::default());
    }

    #[test]
    fn test_loading_counter_clamps_at_zero() {
        let mut session = Session::new(Arc::new(MemoryStore::new()));

        session.end_op();
        assert!(!session.is_loading());

        session.begin_op();
        session.begin_op();
        assert!(session.is_loading());
        session.end_op();
        assert!(session.is_loading());
        session.end_op();
        assert!(!session.is_loading());
        session.end_op();
        assert!(!session.is_loading());
    }

    #[test]
    fn test_clear_in_memory() {
        let mut session = Session::new(Arc::new(MemoryStore::new()));
        session.credential = Some("sk_x".to_string());
        session.set_error("boom");
        session.begin_op();

        session.clear_in_memory();

        assert!(!session.is_authenticated());
        assert!(session.last_error().is_none());
        assert!(!session.is_loading());
    }
}
