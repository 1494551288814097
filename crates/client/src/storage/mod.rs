//! Client-side key-value storage.
//!
//! Two scopes exist, mirroring a browser's storage model:
//!
//! - **Durable**: survives restarts. Holds the auth session and the guest
//!   cart. Backed by [`JsonFileStore`] (or [`MemoryStore`] when no storage
//!   path is configured).
//! - **Session**: lives for one process. Holds the login-detour favorite
//!   intent. Always a [`MemoryStore`].
//!
//! Values are JSON strings. A stored value that fails to parse is treated
//! as absent and the entry is deleted, so one corrupt write can never wedge
//! the client.

mod file;

pub use file::JsonFileStore;

use std::collections::HashMap;
use std::sync::Mutex;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Storage key constants.
///
/// These match the keys the shipped web client uses, so a migrated
/// storage file stays readable.
pub mod keys {
    /// Bearer token for the persisted session.
    pub const TOKEN: &str = "token";
    /// Serialized [`clementine_core::User`] for the persisted session.
    pub const USER: &str = "user";
    /// Guest cart with embedded TTL.
    pub const GUEST_CART: &str = "guest_cart_v1";
    /// Product the user tried to favorite before logging in.
    pub const PENDING_FAVORITE_PRODUCT_ID: &str = "pendingFavoriteProductId";
    /// Where to send the user back after the login detour.
    pub const PENDING_FAVORITE_RETURN: &str = "pendingFavoriteReturn";
}

/// Errors that can occur during storage access.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be serialized.
    #[error("storage serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The store's lock was poisoned by a panicking writer.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// A string key-value store.
///
/// Implementations must be safe to share across tasks; all methods take
/// `&self`.
pub trait KeyValueStore: Send + Sync {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Deleting an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Read a JSON value from a store.
///
/// A present-but-unparsable value is treated as absent: the entry is
/// deleted and `None` returned.
///
/// # Errors
///
/// Returns an error only for store access failures, never for malformed
/// content.
pub fn get_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::warn!(key, error = %e, "Discarding corrupt stored value");
            store.remove(key)?;
            Ok(None)
        }
    }
}

/// Write a JSON value to a store.
///
/// # Errors
///
/// Returns an error if serialization or the store write fails.
pub fn set_json<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

/// An in-memory store. Used for session-scoped state and for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}
