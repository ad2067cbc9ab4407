//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before anything
//! binds or connects.
//!
//! ## Forwarding endpoint variables
//!
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`)
//! - `PUBLIC_ORIGIN` - The deployment origin whose requests get the CORS
//!   origin echoed back (e.g. `https://track.example.com`). When unset, only
//!   the preview-subdomain rule can match.
//! - `PREVIEW_DOMAIN_SUFFIX` - Shared suffix for preview deployments
//!   (default: `.pages.dev`)
//! - `SHORTIO_API_BASE` - General API upstream (default: `https://api.short.io`)
//! - `SHORTIO_STATS_BASE` - Statistics upstream (default: `https://statistics.short.io`)
//! - `UPSTREAM_TIMEOUT_SECONDS` - Per-request upstream timeout (default: 30)
//!
//! ## Dashboard client variables
//!
//! - `GATEWAY_ENDPOINT` - URL of the forwarding endpoint the `dash` CLI talks
//!   to (default: `http://127.0.0.1:3000/shortio-api`)
//! - `STORAGE_PATH` - Durable session/cache file (default: `.shortio-dash.json`)
//!
//! ## Logging
//!
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)

use anyhow::Result;
use std::env;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,
    /// Origin that is always allowed to call the forwarding endpoint.
    pub public_origin: Option<String>,
    /// Hostname suffix shared by preview deployments of the same project.
    pub preview_domain_suffix: String,
    pub shortio_api_base: String,
    pub shortio_stats_base: String,
    pub upstream_timeout_seconds: u64,
    pub gateway_endpoint: String,
    pub storage_path: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Self {
        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        let public_origin = env::var("PUBLIC_ORIGIN").ok().filter(|v| !v.is_empty());

        let preview_domain_suffix =
            env::var("PREVIEW_DOMAIN_SUFFIX").unwrap_or_else(|_| ".pages.dev".to_string());

        let shortio_api_base =
            env::var("SHORTIO_API_BASE").unwrap_or_else(|_| "https://api.short.io".to_string());
        let shortio_stats_base = env::var("SHORTIO_STATS_BASE")
            .unwrap_or_else(|_| "https://statistics.short.io".to_string());

        let upstream_timeout_seconds = env::var("UPSTREAM_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        let gateway_endpoint = env::var("GATEWAY_ENDPOINT")
            .unwrap_or_else(|_| "http://127.0.0.1:3000/shortio-api".to_string());

        let storage_path =
            env::var("STORAGE_PATH").unwrap_or_else(|_| ".shortio-dash.json".to_string());

        Self {
            listen_addr,
            log_level,
            log_format,
            public_origin,
            preview_domain_suffix,
            shortio_api_base,
            shortio_stats_base,
            upstream_timeout_seconds,
            gateway_endpoint,
            storage_path,
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is not in `host:port` form
    /// - an upstream base or the gateway endpoint is not an http(s) URL
    /// - the upstream timeout is zero
    pub fn validate(&self) -> Result<()> {
        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        for (name, value) in [
            ("SHORTIO_API_BASE", &self.shortio_api_base),
            ("SHORTIO_STATS_BASE", &self.shortio_stats_base),
            ("GATEWAY_ENDPOINT", &self.gateway_endpoint),
        ] {
            if !value.starts_with("http://") && !value.starts_with("https://") {
                anyhow::bail!("{} must start with 'http://' or 'https://', got '{}'", name, value);
            }
        }

        if let Some(origin) = &self.public_origin {
            if url::Url::parse(origin).is_err() {
                anyhow::bail!("PUBLIC_ORIGIN must be a valid URL, got '{}'", origin);
            }
        }

        if self.upstream_timeout_seconds == 0 {
            anyhow::bail!("UPSTREAM_TIMEOUT_SECONDS must be greater than 0");
        }

        if self.preview_domain_suffix.is_empty() {
            anyhow::bail!("PREVIEW_DOMAIN_SUFFIX must not be empty");
        }

        Ok(())
    }

    /// Prints configuration summary.
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  API upstream: {}", self.shortio_api_base);
        tracing::info!("  Stats upstream: {}", self.shortio_stats_base);
        match &self.public_origin {
            Some(origin) => tracing::info!("  Public origin: {}", origin),
            None => tracing::info!("  Public origin: (unset, preview-suffix rule only)"),
        }
        tracing::info!("  Preview suffix: {}", self.preview_domain_suffix);
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env();
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn base_config() -> Config {
        Config {
            listen_addr: "0.0.0.0:3000".to_string(),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            public_origin: Some("https://track.example.com".to_string()),
            preview_domain_suffix: ".pages.dev".to_string(),
            shortio_api_base: "https://api.short.io".to_string(),
            shortio_stats_base: "https://statistics.short.io".to_string(),
            upstream_timeout_seconds: 30,
            gateway_endpoint: "http://127.0.0.1:3000/shortio-api".to_string(),
            storage_path: ".shortio-dash.json".to_string(),
        }
    }

    #[test]
    fn test_config_validation() {
        let mut config = base_config();
        assert!(config.validate().is_ok());

        config.log_format = "invalid".to_string();
        assert!(config.validate().is_err());

        config.log_format = "json".to_string();
        assert!(config.validate().is_ok());

        config.listen_addr = "3000".to_string();
        assert!(config.validate().is_err());

        config.listen_addr = "0.0.0.0:3000".to_string();
        config.shortio_api_base = "ftp://api.short.io".to_string();
        assert!(config.validate().is_err());

        config.shortio_api_base = "https://api.short.io".to_string();
        config.upstream_timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_public_origin_rejected() {
        let mut config = base_config();
        config.public_origin = Some("not a url".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::remove_var("LISTEN");
            env::remove_var("SHORTIO_API_BASE");
            env::remove_var("PUBLIC_ORIGIN");
        }

        let config = Config::from_env();

        assert_eq!(config.listen_addr, "0.0.0.0:3000");
        assert_eq!(config.shortio_api_base, "https://api.short.io");
        assert_eq!(config.shortio_stats_base, "https://statistics.short.io");
        assert_eq!(config.preview_domain_suffix, ".pages.dev");
        assert!(config.public_origin.is_none());
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::set_var("LISTEN", "127.0.0.1:8080");
            env::set_var("SHORTIO_API_BASE", "http://localhost:9999");
            env::set_var("PUBLIC_ORIGIN", "https://dash.example.com");
        }

        let config = Config::from_env();

        assert_eq!(config.listen_addr, "127.0.0.1:8080");
        assert_eq!(config.shortio_api_base, "http://localhost:9999");
        assert_eq!(
            config.public_origin.as_deref(),
            Some("https://dash.example.com")
        );

        // Cleanup
        unsafe {
            env::remove_var("LISTEN");
            env::remove_var("SHORTIO_API_BASE");
            env::remove_var("PUBLIC_ORIGIN");
        }
    }
}
