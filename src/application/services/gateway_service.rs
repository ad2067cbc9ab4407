//! The caching gateway: decides cache-vs-network per call and interprets
//! the forwarding endpoint's responses.

use crate::application::services::cache_service::{Params, ResponseCache};
use crate::domain::action::Action;
use crate::error::AppError;
use crate::infrastructure::http::GatewayTransport;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// A successful gateway call: the payload plus where it came from.
#[derive(Debug, Clone)]
pub struct CallOutcome {
    pub payload: Value,
    /// When the payload was fetched from the network — the stored cache
    /// timestamp on a hit, now on a fresh fetch. Feeds the "last retrieved"
    /// display.
    pub retrieved_at: DateTime<Utc>,
    pub from_cache: bool,
}

/// Gateway over the forwarding endpoint, consulting [`ResponseCache`] first
/// unless a forced refresh is requested.
pub struct ApiGateway {
    transport: Arc<dyn GatewayTransport>,
    cache: ResponseCache,
}

impl ApiGateway {
    pub fn new(transport: Arc<dyn GatewayTransport>, cache: ResponseCache) -> Self {
        Self { transport, cache }
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Executes one dashboard query.
    ///
    /// # Behavior
    ///
    /// 1. No credential → [`AppError::Unauthenticated`], zero network I/O.
    /// 2. `force_refresh == false` and the cache holds an entry for
    ///    (action, params) → cached payload, no network I/O.
    /// 3. Otherwise one GET to the forwarding endpoint; on success the
    ///    payload is written through the cache before returning.
    ///
    /// # Errors
    ///
    /// - [`AppError::Network`] — transport or JSON-parse failure; session
    ///   state is untouched and a forced refresh can always retry.
    /// - [`AppError::Api`] — non-2xx from upstream, with the original
    ///   status. A 401/403 additionally clears the whole durable namespace
    ///   (cache, credential, period); the caller is expected to drop its
    ///   in-memory identity and route to credential entry.
    pub async fn call(
        &self,
        credential: Option<&str>,
        action: Action,
        params: &Params,
        force_refresh: bool,
    ) -> Result<CallOutcome, AppError> {
        let Some(credential) = credential else {
            return Err(AppError::Unauthenticated);
        };

        if !force_refresh {
            if let Some(entry) = self.cache.get(action, params).await {
                return Ok(CallOutcome {
                    payload: entry.payload,
                    retrieved_at: entry.retrieved_at,
                    from_cache: true,
                });
            }
        }

        let mut wire_params: Params = vec![("action".to_string(), action.as_str().to_string())];
        wire_params.extend(params.iter().cloned());

        let response = self.transport.get(&wire_params, credential).await?;

        if !response.is_success() {
            return Err(self.interpret_failure(action, response.status, &response.body).await);
        }

        let payload: Value = serde_json::from_str(&response.body)
            .map_err(|e| AppError::network(format!("Invalid JSON from gateway: {e}")))?;

        let entry = self.cache.put(action, params, payload.clone()).await;
        debug!("Fetched {action} from network");

        Ok(CallOutcome {
            payload,
            retrieved_at: entry.retrieved_at,
            from_cache: false,
        })
    }

    /// Maps a non-success response onto the error taxonomy, tearing down
    /// the durable session on an authentication failure.
    async fn interpret_failure(&self, action: Action, status: u16, body: &str) -> AppError {
        let parsed: Option<Value> = serde_json::from_str(body).ok();

        let message = parsed
            .as_ref()
            .and_then(|v| v.get("error"))
            .and_then(Value::as_str)
            .map(String::from)
            .unwrap_or_else(|| format!("Short.io API request failed for {action}"));
        let details = parsed
            .as_ref()
            .and_then(|v| v.get("details"))
            .cloned()
            .unwrap_or(Value::Null);

        let error = AppError::api(status, message, details);

        if error.is_auth_failure() {
            warn!("Authentication failure ({status}) on {action}; clearing session");
            if let Err(e) = self.cache.clear_all().await {
                warn!("Failed to clear session state: {e}");
            }
        }

        error
    }
}
