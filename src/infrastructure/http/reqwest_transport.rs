//! reqwest-backed implementation of [`GatewayTransport`].

use super::transport::{GatewayTransport, TransportResponse};
use crate::error::AppError;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Header carrying the user's API key to the forwarding endpoint.
pub(crate) const API_KEY_HEADER: &str = "X-Api-Key";

/// Production transport: one shared `reqwest::Client` against a fixed
/// endpoint URL.
pub struct ReqwestTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl ReqwestTransport {
    /// Builds a transport for the forwarding endpoint at `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the client cannot be constructed.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl GatewayTransport for ReqwestTransport {
    async fn get(
        &self,
        params: &[(String, String)],
        credential: &str,
    ) -> Result<TransportResponse, AppError> {
        debug!("GET {} {:?}", self.endpoint, params);

        let response = self
            .client
            .get(&self.endpoint)
            .query(params)
            .header(API_KEY_HEADER, credential)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| AppError::network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::network(format!("Failed to read response body: {e}")))?;

        Ok(TransportResponse { status, body })
    }
}
