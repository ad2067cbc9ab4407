//! Transport trait between the gateway and the forwarding endpoint.

use crate::error::AppError;
use async_trait::async_trait;

/// Raw response from the forwarding endpoint, before JSON interpretation.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One HTTP GET against the forwarding endpoint.
///
/// `params` arrive already normalized (action first, nullish entries
/// dropped); the credential travels in the `X-Api-Key` header.
///
/// # Implementations
///
/// - [`crate::infrastructure::http::ReqwestTransport`] - production client
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GatewayTransport: Send + Sync {
    /// Issues the request and returns status + body.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Network`] on connect, timeout, or body-read
    /// failure. Non-2xx statuses are NOT errors at this layer — the gateway
    /// interprets them.
    async fn get(
        &self,
        params: &[(String, String)],
        credential: &str,
    ) -> Result<TransportResponse, AppError>;
}
