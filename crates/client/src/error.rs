//! Unified error handling.
//!
//! Each module has its own error enum; `ClientError` aggregates them for
//! callers (the CLI, embedding applications) that don't care which layer
//! failed. Handlers should surface `to_string()` as a user-facing banner,
//! never crash the view.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::services::auth::AuthError;
use crate::services::cart::CartError;
use crate::services::favorites::FavoriteError;
use crate::storage::StorageError;

/// Top-level error type for the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration loading failed.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Backend API call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Client storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Authentication failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Favorites operation failed.
    #[error("Favorites error: {0}")]
    Favorite(#[from] FavoriteError),
}

/// Result type alias for `ClientError`.
pub type Result<T> = std::result::Result<T, ClientError>;
