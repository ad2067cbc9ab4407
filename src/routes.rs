//! Router configuration for the forwarding endpoint.
//!
//! # Route Structure
//!
//! - `GET     /shortio-api` - Forward one dashboard query to short.io
//! - `OPTIONS /shortio-api` - CORS preflight
//! - `GET     /health`      - Liveness check
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Origin policy from [`crate::api::cors`]

use crate::api::cors;
use crate::api::handlers::proxy_handler;
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::routing::get;
use axum::{Json, Router, middleware};
use serde_json::json;

async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/shortio-api",
            get(proxy_handler).options(cors::preflight_handler),
        )
        .route("/health", get(health_handler))
        .layer(middleware::from_fn_with_state(state.clone(), cors::layer))
        .with_state(state)
        .layer(tracing::layer())
}
