//! Application services.

pub mod cache_service;
pub mod gateway_service;
pub mod session;

pub use cache_service::{CacheEntry, ResponseCache};
pub use gateway_service::{ApiGateway, CallOutcome};
pub use session::Session;
