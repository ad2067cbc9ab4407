//! Forwarding-endpoint layer: CORS policy, handlers, middleware.

pub mod cors;
pub mod handlers;
pub mod middleware;
