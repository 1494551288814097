//! REST API clients for the Clementine backend.
//!
//! # Architecture
//!
//! - One [`ApiClient`] wraps `reqwest` with the backend origin, the bearer
//!   token, and the shared response-envelope handling
//! - Per-resource modules (`auth`, `cart`, `favorites`, `products`) add the
//!   typed endpoint surface
//! - Every response follows `{ success, data?, message? }`; the body is
//!   parsed even on failure statuses so server-supplied messages survive
//! - Catalog reads are cached in-memory via `moka` (5 minute TTL); cart,
//!   favorites, and search are never cached
//!
//! # Example
//!
//! ```rust,ignore
//! use clementine_client::api::ApiClient;
//!
//! let api = ApiClient::new(&config)?;
//! let products = api.search_products("linen", 8).await?;
//! ```

pub mod auth;
pub mod cart;
pub mod favorites;
pub mod products;

use std::sync::{Arc, RwLock};
use std::time::Duration;

use moka::future::Cache;
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use clementine_core::ApiEnvelope;

use crate::config::ClientConfig;
use products::CatalogCacheValue;

/// Errors that can occur when talking to the backend API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP transport failed (connect, timeout, abort).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON body could not be parsed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The backend reported a failure (non-2xx or `success: false`).
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code of the response.
        status: u16,
        /// Server-supplied message, or a generic fallback.
        message: String,
    },

    /// The backend reported success but returned no data payload.
    #[error("API response had no data")]
    MissingData,
}

/// Client for the Clementine REST API.
///
/// Cheaply cloneable; all clones share the HTTP connection pool, the
/// bearer token, and the catalog cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    /// Backend API root, e.g. `https://shop.example.com/api`.
    endpoint: String,
    token: RwLock<Option<SecretString>>,
    catalog_cache: Cache<String, CatalogCacheValue>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        let catalog_cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        let endpoint = format!("{}/api", config.base_url.as_str().trim_end_matches('/'));

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                endpoint,
                token: RwLock::new(None),
                catalog_cache,
            }),
        })
    }

    /// Install or clear the bearer token used for authenticated requests.
    pub fn set_token(&self, token: Option<SecretString>) {
        if let Ok(mut slot) = self.inner.token.write() {
            *slot = token;
        }
    }

    /// Whether a bearer token is currently installed.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.inner
            .token
            .read()
            .map(|slot| slot.is_some())
            .unwrap_or(false)
    }

    pub(crate) fn catalog_cache(&self) -> &Cache<String, CatalogCacheValue> {
        &self.inner.catalog_cache
    }

    /// Execute a request and unwrap the response envelope.
    ///
    /// The body is read and parsed even on failure statuses: the backend
    /// puts its error message inside the same envelope, and that message
    /// is what callers surface to users.
    pub(crate) async fn execute<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{path}", self.inner.endpoint);

        let mut request = self.inner.http.request(method, &url);

        if let Ok(slot) = self.inner.token.read()
            && let Some(token) = slot.as_ref()
        {
            request = request.bearer_auth(token.expose_secret());
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let response_text = response.text().await?;

        let envelope: ApiEnvelope<T> = match serde_json::from_str(&response_text) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::error!(
                    status = %status,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse API response"
                );
                if status.is_success() {
                    return Err(ApiError::Parse(e));
                }
                // Non-JSON failure body (proxy error page, empty body)
                return Err(ApiError::Api {
                    status: status.as_u16(),
                    message: format!("Request failed with status {status}"),
                });
            }
        };

        if !status.is_success() || !envelope.success {
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: envelope.message_or("Request failed").to_owned(),
            });
        }

        envelope.data.ok_or(ApiError::MissingData)
    }

    /// Execute a request whose success payload is irrelevant.
    pub(crate) async fn execute_unit<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        // The envelope's data is optional for unit responses
        let url = format!("{}{path}", self.inner.endpoint);

        let mut request = self.inner.http.request(method, &url);

        if let Ok(slot) = self.inner.token.read()
            && let Some(token) = slot.as_ref()
        {
            request = request.bearer_auth(token.expose_secret());
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let response_text = response.text().await?;

        let envelope: ApiEnvelope<serde_json::Value> = match serde_json::from_str(&response_text) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(ApiError::Api {
                    status: status.as_u16(),
                    message: format!("Request failed with status {status}"),
                });
            }
            Err(e) => return Err(ApiError::Parse(e)),
        };

        if !status.is_success() || !envelope.success {
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: envelope.message_or("Request failed").to_owned(),
            });
        }

        Ok(())
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("endpoint", &self.inner.endpoint)
            .field("token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

/// Body type for requests that carry no payload.
///
/// `Option<&NoBody>::None` keeps the generic `execute` signature happy.
pub(crate) type NoBody = serde_json::Value;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_has_api_suffix() {
        let config = ClientConfig::for_base_url("http://localhost:4000").expect("config");
        let api = ApiClient::new(&config).expect("client");
        assert_eq!(api.inner.endpoint, "http://localhost:4000/api");
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = ClientConfig::for_base_url("http://localhost:4000").expect("config");
        let api = ApiClient::new(&config).expect("client");
        api.set_token(Some(SecretString::from("top-secret-token")));

        let debug_output = format!("{api:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("top-secret-token"));
    }

    #[test]
    fn test_has_token_tracks_install_and_clear() {
        let config = ClientConfig::for_base_url("http://localhost:4000").expect("config");
        let api = ApiClient::new(&config).expect("client");

        assert!(!api.has_token());
        api.set_token(Some(SecretString::from("t")));
        assert!(api.has_token());
        api.set_token(None);
        assert!(!api.has_token());
    }
}
