//! Middleware for the forwarding endpoint.

pub mod tracing;
