//! API Configuration Module
//!
//! CORS, upload limits, paging defaults, storage backend selection and the
//! bind address. Everything is loaded from environment variables with
//! defaults suited to development.

use std::net::SocketAddr;

use relic_core::{DEFAULT_MAX_ELEMENT_BYTES, DEFAULT_PAGE_SIZE};

use crate::error::{ApiError, ApiResult};

/// Default upload limit for `POST /artifacts/upload`, 16 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

// ============================================================================
// STORE BACKEND
// ============================================================================

/// Which `RelicStore` the server runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Postgres,
    Memory,
}

impl StoreBackend {
    fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "memory" | "in-memory" | "mem" => StoreBackend::Memory,
            _ => StoreBackend::Postgres,
        }
    }
}

// ============================================================================
// API CONFIGURATION
// ============================================================================

#[derive(Debug, Clone)]
pub struct ApiConfig {
    // ========================================================================
    // CORS Configuration
    // ========================================================================
    /// Allowed CORS origins (comma-separated in env var).
    /// Empty means allow all origins (dev mode).
    pub cors_origins: Vec<String>,

    /// Whether to allow credentials in CORS requests.
    pub cors_allow_credentials: bool,

    /// Max age for CORS preflight cache in seconds.
    pub cors_max_age_secs: u64,

    // ========================================================================
    // Request Limits
    // ========================================================================
    /// Maximum size of an upload request body.
    pub max_upload_bytes: usize,

    /// Maximum size of a single array element in an upload.
    pub max_record_bytes: usize,

    /// Page size used when a list request omits `size`.
    pub default_page_size: u64,

    // ========================================================================
    // Storage
    // ========================================================================
    pub store: StoreBackend,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            cors_origins: Vec::new(), // Empty = allow all
            cors_allow_credentials: false,
            cors_max_age_secs: 86400,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_record_bytes: DEFAULT_MAX_ELEMENT_BYTES,
            default_page_size: DEFAULT_PAGE_SIZE,
            store: StoreBackend::default(),
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `RELIC_CORS_ORIGINS`: Comma-separated allowed origins (empty = allow all)
    /// - `RELIC_CORS_ALLOW_CREDENTIALS`: "true" or "false" (default: false)
    /// - `RELIC_CORS_MAX_AGE_SECS`: Preflight cache duration (default: 86400)
    /// - `RELIC_MAX_UPLOAD_BYTES`: Upload body limit (default: 16 MiB)
    /// - `RELIC_MAX_RECORD_BYTES`: Per-record limit inside an upload (default: 1 MiB)
    /// - `RELIC_DEFAULT_PAGE_SIZE`: Default list page size (default: 20)
    /// - `RELIC_STORE`: "memory" for the in-memory store, anything else for Postgres
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unparsable values fall back to
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let cors_origins = lookup("RELIC_CORS_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let cors_allow_credentials = lookup("RELIC_CORS_ALLOW_CREDENTIALS")
            .map(|s| s.to_lowercase() == "true")
            .unwrap_or(defaults.cors_allow_credentials);

        let cors_max_age_secs = lookup("RELIC_CORS_MAX_AGE_SECS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.cors_max_age_secs);

        let max_upload_bytes = lookup("RELIC_MAX_UPLOAD_BYTES")
            .and_then(|s| s.parse().ok())
            .filter(|n: &usize| *n > 0)
            .unwrap_or(defaults.max_upload_bytes);

        let max_record_bytes = lookup("RELIC_MAX_RECORD_BYTES")
            .and_then(|s| s.parse().ok())
            .filter(|n: &usize| *n > 0)
            .unwrap_or(defaults.max_record_bytes);

        let default_page_size = lookup("RELIC_DEFAULT_PAGE_SIZE")
            .and_then(|s| s.parse().ok())
            .filter(|n: &u64| *n > 0)
            .unwrap_or(defaults.default_page_size);

        let store = lookup("RELIC_STORE")
            .map(|s| StoreBackend::parse(&s))
            .unwrap_or(defaults.store);

        Self {
            cors_origins,
            cors_allow_credentials,
            cors_max_age_secs,
            max_upload_bytes,
            max_record_bytes,
            default_page_size,
            store,
        }
    }
}

// ============================================================================
// BIND ADDRESS
// ============================================================================

/// Resolve the listen address from `RELIC_API_BIND` and `PORT` /
/// `RELIC_API_PORT`.
pub fn resolve_bind_addr() -> ApiResult<SocketAddr> {
    bind_addr_from_lookup(|key| std::env::var(key).ok())
}

fn bind_addr_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ApiResult<SocketAddr> {
    let host = lookup("RELIC_API_BIND").unwrap_or_else(|| "0.0.0.0".to_string());
    let port_str = lookup("PORT")
        .or_else(|| lookup("RELIC_API_PORT"))
        .unwrap_or_else(|| "3000".to_string());
    let port = port_str
        .parse::<u16>()
        .map_err(|_| ApiError::invalid_input(format!("Invalid port value: {}", port_str)))?;

    let addr = format!("{}:{}", host, port);
    addr.parse::<SocketAddr>()
        .map_err(|e| ApiError::invalid_input(format!("Invalid bind address {}: {}", addr, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ApiConfig::from_lookup(lookup_from(&[]));
        assert!(config.cors_origins.is_empty());
        assert_eq!(config.max_upload_bytes, 16 * 1024 * 1024);
        assert_eq!(config.max_record_bytes, 1024 * 1024);
        assert_eq!(config.default_page_size, 20);
        assert_eq!(config.store, StoreBackend::Postgres);
    }

    #[test]
    fn test_overrides() {
        let config = ApiConfig::from_lookup(lookup_from(&[
            ("RELIC_CORS_ORIGINS", "https://a.example, ,https://b.example"),
            ("RELIC_MAX_RECORD_BYTES", "2048"),
            ("RELIC_DEFAULT_PAGE_SIZE", "0"),
            ("RELIC_STORE", "Memory"),
        ]));
        assert_eq!(
            config.cors_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
        assert_eq!(config.max_record_bytes, 2048);
        assert_eq!(config.default_page_size, 20);
        assert_eq!(config.store, StoreBackend::Memory);
    }

    #[test]
    fn test_bind_addr() {
        let addr = bind_addr_from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(addr.port(), 3000);

        let addr = bind_addr_from_lookup(lookup_from(&[
            ("RELIC_API_BIND", "127.0.0.1"),
            ("RELIC_API_PORT", "8081"),
            ("PORT", "9090"),
        ]))
        .unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:9090");

        assert!(bind_addr_from_lookup(lookup_from(&[("PORT", "http")])).is_err());
    }
}
