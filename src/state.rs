//! Shared state injected into forwarding-endpoint handlers.

use crate::config::Config;
use crate::error::AppError;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    /// Shared upstream client with the configured per-request timeout.
    pub http: reqwest::Client,
    pub config: Arc<Config>,
}

impl AppState {
    /// Builds the state from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_seconds))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }
}
