//! Manager configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `PHONE_API_BASE_URL` - Base URL of the phone REST backend (e.g., `http://localhost:3000`)
//!
//! ## Optional
//! - `MANAGER_HOST` - Bind address (default: 127.0.0.1)
//! - `MANAGER_PORT` - Listen port (default: 3001)
//! - `MANAGER_BASE_URL` - Public URL of the manager (default: `http://<host>:<port>`)
//! - `MANAGER_STATIC_DIR` - Directory served under `/static` (default: crates/manager/static)
//! - `PHONE_API_TIMEOUT_SECS` - Per-request timeout for backend calls (default: 30)
//! - `PHONE_CACHE_TTL_SECS` - Time-to-live of cached query results (default: 300)
//! - `PHONE_CACHE_MAX_CAPACITY` - Maximum number of cached query results (default: 1000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Sentry traces sample rate (default: 1.0)

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Manager application configuration.
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the manager
    pub base_url: String,
    /// Directory with static assets
    pub static_dir: String,
    /// Phone REST backend configuration
    pub api: PhoneApiConfig,
    /// Query cache configuration
    pub cache: CacheConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Phone REST backend configuration.
#[derive(Debug, Clone)]
pub struct PhoneApiConfig {
    /// Base URL; `/phone` is appended to it.
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// Query cache configuration.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// How long a cached result may be served before it is re-fetched.
    pub time_to_live: Duration,
    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            time_to_live: Duration::from_secs(300),
            max_capacity: 1000,
        }
    }
}

impl PhoneApiConfig {
    /// Build a backend configuration with the default timeout.
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(30),
        }
    }

    fn from_env() -> Result<Self, ConfigError> {
        let base_url = parse_base_url("PHONE_API_BASE_URL", &get_required_env("PHONE_API_BASE_URL")?)?;
        let timeout = Duration::from_secs(parse_env_or_default("PHONE_API_TIMEOUT_SECS", 30)?);
        Ok(Self { base_url, timeout })
    }
}

impl CacheConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            time_to_live: Duration::from_secs(parse_env_or_default("PHONE_CACHE_TTL_SECS", 300)?),
            max_capacity: parse_env_or_default("PHONE_CACHE_MAX_CAPACITY", 1000)?,
        })
    }
}

impl ManagerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("MANAGER_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("MANAGER_HOST".to_string(), e.to_string()))?;
        let port = parse_env_or_default("MANAGER_PORT", 3001)?;
        let base_url = get_optional_env("MANAGER_BASE_URL")
            .unwrap_or_else(|| format!("http://{}", SocketAddr::new(host, port)));
        let static_dir = get_env_or_default("MANAGER_STATIC_DIR", "crates/manager/static");

        let api = PhoneApiConfig::from_env()?;
        let cache = CacheConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            host,
            port,
            base_url,
            static_dir,
            api,
            cache,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Configuration for a local manager talking to `api_base_url`.
    ///
    /// Used by tests and tools that build the router without touching the
    /// process environment.
    #[must_use]
    pub fn local(api_base_url: Url) -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3001,
            base_url: "http://127.0.0.1:3001".to_string(),
            static_dir: "crates/manager/static".to_string(),
            api: PhoneApiConfig::new(api_base_url),
            cache: CacheConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the manager is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an optional environment variable, falling back to `default` when unset.
fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Parse and sanity-check a backend base URL.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` (tagged with `key`) for anything
/// that is not an absolute http(s) URL with a host.
pub fn parse_base_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be an absolute URL with a host".to_string(),
        ));
    }

    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url_valid() {
        let url = parse_base_url("TEST", "http://localhost:3000").unwrap();
        assert_eq!(url.host_str(), Some("localhost"));
        assert_eq!(url.port(), Some(3000));
    }

    #[test]
    fn test_parse_base_url_trims_whitespace() {
        assert!(parse_base_url("TEST", "  https://api.example.com/v1  ").is_ok());
    }

    #[test]
    fn test_parse_base_url_rejects_other_schemes() {
        let err = parse_base_url("TEST", "ftp://files.example.com").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_parse_base_url_rejects_garbage() {
        assert!(parse_base_url("TEST", "not a url").is_err());
        assert!(parse_base_url("TEST", "mailto:someone@example.com").is_err());
    }

    #[test]
    fn test_local_config() {
        let config = ManagerConfig::local(Url::parse("http://127.0.0.1:9999").unwrap());
        assert_eq!(config.socket_addr().port(), 3001);
        assert!(!config.is_secure());
        assert_eq!(config.cache.max_capacity, 1000);
        assert_eq!(config.api.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingEnvVar("PHONE_API_BASE_URL".to_string());
        assert_eq!(
            err.to_string(),
            "Missing environment variable: PHONE_API_BASE_URL"
        );
    }
}
