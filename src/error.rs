//! Application error taxonomy.
//!
//! One error type serves both halves of the crate: the dashboard controller
//! surfaces these as user-visible strings, and the forwarding endpoint maps
//! them onto the wire shape `{error, status?, details?}` expected by clients.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;

/// Errors produced by the gateway, cache, controller, and forwarding endpoint.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Input rejected before any network effect (bad credential format,
    /// reversed custom date range, missing required parameter).
    #[error("{message}")]
    Validation { message: String },

    /// No credential is stored; the caller must route to credential entry.
    #[error("API key is not set")]
    Unauthenticated,

    /// Upstream returned a non-success status. `status` carries the original
    /// upstream code; 401/403 additionally trigger full session teardown.
    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        details: Value,
    },

    /// Transport or body-parse failure. Never clears session state.
    #[error("Network error: {0}")]
    Network(String),

    /// Durable store read/write failure.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("{message}")]
    Internal { message: String },
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn api(status: u16, message: impl Into<String>, details: Value) -> Self {
        Self::Api {
            status,
            message: message.into(),
            details,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether this failure signals an invalid or rejected credential.
    ///
    /// The gateway reacts by clearing all cached state and routing back to
    /// credential entry.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            AppError::Unauthenticated
                | AppError::Api {
                    status: 401 | 403,
                    ..
                }
        )
    }

    /// Single user-visible string for the error banner.
    ///
    /// `Api` errors fold their details in, matching what the original
    /// dashboard showed next to the failing view.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Api {
                status,
                message,
                details,
            } => {
                if details.is_null() {
                    format!("{message} (Status: {status})")
                } else if let Some(s) = details.as_str() {
                    format!("{message}: {s}")
                } else {
                    format!("{message}: {details}")
                }
            }
            other => other.to_string(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
    #[serde(skip_serializing_if = "Value::is_null")]
    details: Value,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, upstream_status, details) = match self {
            AppError::Validation { message } => {
                (StatusCode::BAD_REQUEST, message, None, Value::Null)
            }
            AppError::Unauthenticated => (
                StatusCode::BAD_REQUEST,
                "X-Api-Key header is missing.".to_string(),
                None,
                Value::Null,
            ),
            AppError::Api {
                status,
                message,
                details,
            } => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                message,
                Some(status),
                details,
            ),
            AppError::Network(message) => (StatusCode::BAD_GATEWAY, message, None, Value::Null),
            AppError::Storage(message) | AppError::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                message,
                None,
                Value::Null,
            ),
        };

        let body = ErrorBody {
            error,
            status: upstream_status,
            details,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_auth_failure_detection() {
        assert!(AppError::Unauthenticated.is_auth_failure());
        assert!(AppError::api(401, "nope", Value::Null).is_auth_failure());
        assert!(AppError::api(403, "nope", Value::Null).is_auth_failure());
        assert!(!AppError::api(404, "gone", Value::Null).is_auth_failure());
        assert!(!AppError::network("timeout").is_auth_failure());
    }

    #[test]
    fn test_user_message_includes_details() {
        let err = AppError::api(422, "Short.io API request failed", json!({"field": "path"}));
        let msg = err.user_message();
        assert!(msg.contains("Short.io API request failed"));
        assert!(msg.contains("path"));
    }

    #[test]
    fn test_user_message_without_details_shows_status() {
        let err = AppError::api(500, "Short.io API request failed", Value::Null);
        assert_eq!(
            err.user_message(),
            "Short.io API request failed (Status: 500)"
        );
    }
}
