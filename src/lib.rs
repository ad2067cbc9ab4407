//! # shortio-dash
//!
//! A terminal dashboard for short.io link statistics, plus the small
//! forwarding endpoint it talks through.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Actions, periods, navigation state, entities,
//!   and the durable key-value storage trait
//! - **Application Layer** ([`application`]) - Response cache, caching gateway,
//!   session, view controller, and chart presentation
//! - **Infrastructure Layer** ([`infrastructure`]) - File/memory storage and the
//!   reqwest transport
//! - **API Layer** ([`api`]) - The forwarding endpoint's handlers and CORS policy
//!
//! ## Features
//!
//! - Durable response cache keyed by (action, parameters), no expiry
//! - Forced refresh that bypasses the cache on demand
//! - Reporting period presets plus custom date ranges
//! - Full session teardown on credential rejection (401/403)
//! - CORS policy covering a public origin and its preview deployments
//!
//! ## Quick Start
//!
//! ```bash
//! # Start the forwarding endpoint
//! cargo run
//!
//! # In another terminal, open the dashboard
//! cargo run --bin dash
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via
//! [`config::Config`]. See the [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::controller::{StateChange, ViewController};
    pub use crate::application::services::{ApiGateway, ResponseCache, Session};
    pub use crate::domain::action::Action;
    pub use crate::domain::entities::{Link, LinkPage, ShortDomain, StatsPayload};
    pub use crate::domain::navigation::View;
    pub use crate::domain::period::{Period, Preset};
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
