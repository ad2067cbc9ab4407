//! Forwarding-endpoint handlers.

mod proxy;

pub use proxy::{ProxyQuery, proxy_handler};
