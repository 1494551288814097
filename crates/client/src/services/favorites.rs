//! Favorites service: optimistic updates with rollback, plus the
//! login-detour intent replay.
//!
//! Unlike the cart, favorites have no guest-mode storage: an
//! unauthenticated action is deferred through login instead of applied
//! locally. The intended product id and return path land in session
//! storage, the caller gets a [`FavoriteOutcome::LoginRequired`] carrying
//! the login URL, and the intent is replayed automatically once
//! authentication succeeds.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::instrument;

use clementine_core::{FavoriteEntry, ProductId, ProductSummary};

use crate::api::{ApiClient, ApiError};
use crate::storage::{KeyValueStore, StorageError, keys};

use super::auth::AuthService;

/// Errors that can occur in favorites operations.
#[derive(Debug, Error)]
pub enum FavoriteError {
    /// Neither a product nor an explicit id was supplied.
    #[error("no product id to favorite")]
    MissingProductId,

    /// Backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Client storage failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// What happened to a favorites request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoriteOutcome {
    /// The mutation was applied (and confirmed by the server).
    Applied,
    /// The caller must send the user through login first.
    ///
    /// The pending intent is already stored; after successful
    /// authentication it replays automatically.
    LoginRequired {
        /// Login URL with a `redirect` parameter back to `return_to`.
        redirect: String,
    },
}

/// The favorites service.
///
/// Cheaply cloneable; all clones share the same state.
#[derive(Clone)]
pub struct FavoriteService {
    inner: Arc<FavoriteInner>,
}

struct FavoriteInner {
    api: ApiClient,
    auth: AuthService,
    session_store: Arc<dyn KeyValueStore>,
    entries: Mutex<Vec<FavoriteEntry>>,
    last_error: Mutex<Option<String>>,
}

impl FavoriteService {
    /// Create a favorites service over the shared API client, auth
    /// service, and session-scoped store.
    #[must_use]
    pub fn new(api: ApiClient, auth: AuthService, session_store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            inner: Arc::new(FavoriteInner {
                api,
                auth,
                session_store,
                entries: Mutex::new(Vec::new()),
                last_error: Mutex::new(None),
            }),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Current favorites, in insertion order.
    #[must_use]
    pub fn favorites(&self) -> Vec<FavoriteEntry> {
        self.inner
            .entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Derived id set for O(1) membership checks.
    #[must_use]
    pub fn favorite_ids(&self) -> HashSet<ProductId> {
        self.favorites()
            .into_iter()
            .map(|entry| entry.product_id)
            .collect()
    }

    /// Whether `product_id` is currently favorited.
    #[must_use]
    pub fn is_favorite(&self, product_id: &ProductId) -> bool {
        self.favorites()
            .iter()
            .any(|entry| &entry.product_id == product_id)
    }

    /// The most recent sync failure message, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.inner
            .last_error
            .lock()
            .ok()
            .and_then(|slot| slot.clone())
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Favorite a product.
    ///
    /// The target id comes from `product_id` when given, otherwise from
    /// `product`. Unauthenticated calls store the intent and return
    /// [`FavoriteOutcome::LoginRequired`] without touching state.
    ///
    /// # Errors
    ///
    /// Returns an error if no id can be resolved, the backend rejects the
    /// add (after rolling back the optimistic append), or storage fails.
    #[instrument(skip(self, product, product_id, return_to))]
    pub async fn add_favorite(
        &self,
        product: Option<ProductSummary>,
        product_id: Option<ProductId>,
        return_to: &str,
    ) -> Result<FavoriteOutcome, FavoriteError> {
        let target = product_id
            .or_else(|| product.as_ref().map(|p| p.id.clone()))
            .ok_or(FavoriteError::MissingProductId)?;

        if !self.inner.auth.is_authenticated() {
            return Ok(self.defer_through_login(&target, return_to)?);
        }

        let snapshot = self.favorites();

        if !snapshot.iter().any(|entry| entry.product_id == target) {
            self.set_entries({
                let mut optimistic = snapshot.clone();
                optimistic.push(FavoriteEntry {
                    product_id: target.clone(),
                    product,
                });
                optimistic
            });
        }

        match self.inner.api.add_favorite(&target).await {
            Ok(confirmed) => {
                // Swap the optimistic entry for the server-confirmed one
                self.replace_entry(confirmed);
                self.record_error(None);
                Ok(FavoriteOutcome::Applied)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Favorite add failed, rolling back");
                self.set_entries(snapshot);
                self.record_error(Some(e.to_string()));
                Err(e.into())
            }
        }
    }

    /// Unfavorite a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the remove (after restoring
    /// the pre-mutation snapshot) or storage fails.
    #[instrument(skip(self, return_to), fields(product_id = %product_id))]
    pub async fn remove_favorite(
        &self,
        product_id: &ProductId,
        return_to: &str,
    ) -> Result<FavoriteOutcome, FavoriteError> {
        if !self.inner.auth.is_authenticated() {
            return Ok(self.defer_through_login(product_id, return_to)?);
        }

        let snapshot = self.favorites();
        self.set_entries(
            snapshot
                .iter()
                .filter(|entry| &entry.product_id != product_id)
                .cloned()
                .collect(),
        );

        match self.inner.api.remove_favorite(product_id).await {
            Ok(()) => {
                self.record_error(None);
                Ok(FavoriteOutcome::Applied)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Favorite remove failed, restoring snapshot");
                self.set_entries(snapshot);
                self.record_error(Some(e.to_string()));
                Err(e.into())
            }
        }
    }

    /// Favorite or unfavorite `product` depending on current membership.
    ///
    /// # Errors
    ///
    /// Propagates whichever operation runs.
    #[instrument(skip(self, product, return_to), fields(product_id = %product.id))]
    pub async fn toggle_favorite(
        &self,
        product: ProductSummary,
        return_to: &str,
    ) -> Result<FavoriteOutcome, FavoriteError> {
        if self.is_favorite(&product.id) {
            let id = product.id.clone();
            self.remove_favorite(&id, return_to).await
        } else {
            self.add_favorite(Some(product), None, return_to).await
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Refresh favorites after authentication, then replay any pending
    /// login-detour intent.
    ///
    /// # Errors
    ///
    /// Returns an error if the favorites fetch or storage access fails.
    /// A failing replay is logged, not propagated: the fetched list is
    /// still valid.
    #[instrument(skip(self))]
    pub async fn on_login(&self) -> Result<(), FavoriteError> {
        let entries = self.inner.api.get_favorites().await?;
        self.set_entries(entries);

        if let Some(pending) = self.take_pending_intent()? {
            tracing::debug!(product_id = %pending, "Replaying deferred favorite");
            if let Err(e) = self.add_favorite(None, Some(pending), "/").await {
                tracing::warn!(error = %e, "Deferred favorite replay failed");
            }
        }

        Ok(())
    }

    /// Clear favorites state on logout. Nothing is persisted for
    /// anonymous users.
    #[instrument(skip(self))]
    pub fn on_logout(&self) {
        self.set_entries(Vec::new());
        self.record_error(None);
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Store the intent and build the login redirect.
    fn defer_through_login(
        &self,
        product_id: &ProductId,
        return_to: &str,
    ) -> Result<FavoriteOutcome, StorageError> {
        self.inner
            .session_store
            .set(keys::PENDING_FAVORITE_PRODUCT_ID, product_id.as_str())?;
        self.inner
            .session_store
            .set(keys::PENDING_FAVORITE_RETURN, return_to)?;

        Ok(FavoriteOutcome::LoginRequired {
            redirect: format!("/login?redirect={}", urlencoding::encode(return_to)),
        })
    }

    /// Consume the pending intent, if one exists.
    fn take_pending_intent(&self) -> Result<Option<ProductId>, StorageError> {
        let pending = self
            .inner
            .session_store
            .get(keys::PENDING_FAVORITE_PRODUCT_ID)?;
        self.inner
            .session_store
            .remove(keys::PENDING_FAVORITE_PRODUCT_ID)?;
        self.inner
            .session_store
            .remove(keys::PENDING_FAVORITE_RETURN)?;
        Ok(pending.map(ProductId::new))
    }

    fn set_entries(&self, entries: Vec<FavoriteEntry>) {
        match self.inner.entries.lock() {
            Ok(mut slot) => *slot = entries,
            Err(poisoned) => *poisoned.into_inner() = entries,
        }
    }

    /// Replace the entry matching `confirmed.product_id`, or append.
    fn replace_entry(&self, confirmed: FavoriteEntry) {
        if let Ok(mut entries) = self.inner.entries.lock() {
            if let Some(slot) = entries
                .iter_mut()
                .find(|entry| entry.product_id == confirmed.product_id)
            {
                *slot = confirmed;
            } else {
                entries.push(confirmed);
            }
        }
    }

    fn record_error(&self, message: Option<String>) {
        if let Ok(mut slot) = self.inner.last_error.lock() {
            *slot = message;
        }
    }
}
