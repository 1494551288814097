//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CLEMENTINE_API_BASE_URL` - Backend origin (e.g., <https://shop.example.com>)
//!
//! ## Optional
//! - `CLEMENTINE_STORAGE_PATH` - Durable storage file (default: in-memory)
//! - `CLEMENTINE_HTTP_TIMEOUT_SECS` - Request timeout (default: 10)
//! - `CLEMENTINE_SEARCH_DEBOUNCE_MS` - Typeahead debounce (default: 250)
//! - `CLEMENTINE_SEARCH_LIMIT` - Typeahead result cap (default: 8)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default typeahead debounce window.
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 250;

/// Default typeahead result cap.
pub const DEFAULT_SEARCH_LIMIT: u32 = 8;

/// Default HTTP request timeout.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend origin; API requests go to `{base_url}/api/...`.
    pub base_url: Url,
    /// Durable storage file. `None` keeps state in memory only.
    pub storage_path: Option<PathBuf>,
    /// HTTP request timeout.
    pub http_timeout: Duration,
    /// Typeahead debounce window.
    pub search_debounce: Duration,
    /// Typeahead result cap.
    pub search_limit: u32,
    /// Sentry DSN for error tracking.
    pub sentry_dsn: Option<String>,
}

impl ClientConfig {
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

        let base_url = parse_base_url(&get_required_env("CLEMENTINE_API_BASE_URL")?)
            .map_err(|e| ConfigError::InvalidEnvVar("CLEMENTINE_API_BASE_URL".to_owned(), e))?;
        let storage_path = get_optional_env("CLEMENTINE_STORAGE_PATH").map(PathBuf::from);
        let http_timeout = Duration::from_secs(parse_env_or_default(
            "CLEMENTINE_HTTP_TIMEOUT_SECS",
            DEFAULT_HTTP_TIMEOUT_SECS,
        )?);
        let search_debounce = Duration::from_millis(parse_env_or_default(
            "CLEMENTINE_SEARCH_DEBOUNCE_MS",
            DEFAULT_SEARCH_DEBOUNCE_MS,
        )?);
        let search_limit = parse_env_or_default("CLEMENTINE_SEARCH_LIMIT", DEFAULT_SEARCH_LIMIT)?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            base_url,
            storage_path,
            http_timeout,
            search_debounce,
            search_limit,
            sentry_dsn,
        })
    }

    /// Build a configuration for a known backend origin with defaults
    /// everywhere else. Used by tests and embedding code.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the origin is not an absolute http(s) URL.
    pub fn for_base_url(base_url: &str) -> Result<Self, ConfigError> {
        let base_url = parse_base_url(base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("base_url".to_owned(), e))?;
        Ok(Self {
            base_url,
            storage_path: None,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            search_debounce: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
            search_limit: DEFAULT_SEARCH_LIMIT,
            sentry_dsn: None,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_owned()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable parsed into `T`, with a default.
fn parse_env_or_default<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(value) => value
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_owned(), e.to_string())),
        Err(_) => Ok(default),
    }
}

/// Parse and validate a backend origin URL.
///
/// Trailing slashes are stripped so `{base_url}/api/cart` joins cleanly.
fn parse_base_url(raw: &str) -> Result<Url, String> {
    let trimmed = raw.trim_end_matches('/');
    let url = Url::parse(trimmed).map_err(|e| e.to_string())?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err("URL must have a host".to_owned());
    }

    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url_strips_trailing_slash() {
        let url = parse_base_url("https://shop.example.com/").unwrap();
        assert_eq!(url.as_str(), "https://shop.example.com/");
        assert_eq!(url.host_str(), Some("shop.example.com"));
    }

    #[test]
    fn test_parse_base_url_rejects_bad_scheme() {
        assert!(parse_base_url("ftp://shop.example.com").is_err());
        assert!(parse_base_url("not a url").is_err());
    }

    #[test]
    fn test_for_base_url_defaults() {
        let config = ClientConfig::for_base_url("http://localhost:4000").unwrap();
        assert_eq!(config.search_debounce, Duration::from_millis(250));
        assert_eq!(config.search_limit, 8);
        assert!(config.storage_path.is_none());
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_for_base_url_invalid() {
        let result = ClientConfig::for_base_url("nonsense");
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }
}
