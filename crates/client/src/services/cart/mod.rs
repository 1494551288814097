//! Cart service: optimistic state machine with dual persistence.
//!
//! Every mutation runs in two phases:
//!
//! 1. The pure [`reducer`] transition is applied synchronously, so the new
//!    state is visible before any network activity.
//! 2. The resulting item list drives a sync step: authenticated carts are
//!    pushed wholesale via `PUT /cart`, guest carts are written to durable
//!    storage with a fresh 7-day TTL. Sync failures are logged and never
//!    roll the local state back; the next successful hydration reconciles.
//!
//! Callers wanting browser-style fire-and-forget spawn these futures;
//! tests await them for determinism.

pub mod guest;
pub mod merge;
pub mod reducer;

pub use guest::GuestCartStore;
pub use merge::merge_carts;
pub use reducer::{CartAction, reduce};

use std::sync::{Arc, Mutex};

use chrono::Utc;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::instrument;

use clementine_core::{CartItem, CartKey};

use crate::api::{ApiClient, ApiError};
use crate::storage::{KeyValueStore, StorageError};

use super::auth::AuthService;

/// Errors that can occur in cart operations that do propagate.
///
/// Sync failures are swallowed by design; this type covers hydration and
/// merge, where the caller decides how to surface the problem.
#[derive(Debug, Error)]
pub enum CartError {
    /// Backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Client storage failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// The cart state machine.
///
/// Cheaply cloneable; all clones share the same state.
#[derive(Clone)]
pub struct CartService {
    inner: Arc<CartInner>,
}

struct CartInner {
    api: ApiClient,
    auth: AuthService,
    guest: GuestCartStore,
    items: Mutex<Vec<CartItem>>,
}

impl CartService {
    /// Create a cart service over the shared API client, auth service, and
    /// durable store.
    #[must_use]
    pub fn new(api: ApiClient, auth: AuthService, durable: Arc<dyn KeyValueStore>) -> Self {
        Self {
            inner: Arc::new(CartInner {
                api,
                auth,
                guest: GuestCartStore::new(durable),
                items: Mutex::new(Vec::new()),
            }),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Current cart lines.
    #[must_use]
    pub fn items(&self) -> Vec<CartItem> {
        self.inner
            .items
            .lock()
            .map(|items| items.clone())
            .unwrap_or_default()
    }

    /// Sum of `unit_price * quantity` across all lines.
    ///
    /// No tax or shipping is applied at this layer.
    #[must_use]
    pub fn cart_total(&self) -> Decimal {
        self.items().iter().map(CartItem::line_total).sum()
    }

    /// Sum of quantities (units, not distinct lines).
    #[must_use]
    pub fn cart_items_count(&self) -> u32 {
        self.items().iter().map(|item| item.quantity).sum()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add one unit of `item`, appending or incrementing its line.
    #[instrument(skip(self, item), fields(product_id = %item.product_id))]
    pub async fn add_to_cart(&self, item: CartItem) {
        let next = self.apply(CartAction::Add(item));
        self.sync(next).await;
    }

    /// Remove the line with `key`.
    #[instrument(skip(self, key), fields(key = %key))]
    pub async fn remove_from_cart(&self, key: CartKey) {
        let next = self.apply(CartAction::Remove(key));
        self.sync(next).await;
    }

    /// Set the quantity of the line with `key`.
    ///
    /// A requested quantity of zero or less removes the line instead of
    /// reaching the reducer.
    #[instrument(skip(self, key), fields(key = %key, quantity))]
    pub async fn update_quantity(&self, key: CartKey, quantity: i64) {
        let next = if quantity <= 0 {
            self.apply(CartAction::Remove(key))
        } else {
            let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
            self.apply(CartAction::UpdateQuantity { key, quantity })
        };
        self.sync(next).await;
    }

    /// Empty the cart.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) {
        let next = self.apply(CartAction::Clear);
        self.sync(next).await;
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Load cart state for the current auth status.
    ///
    /// Authenticated: the server cart overwrites local state wholesale.
    /// Guest: the stored guest cart (if unexpired) becomes local state.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fetch or storage read fails; local
    /// state is left untouched in that case.
    #[instrument(skip(self))]
    pub async fn hydrate(&self) -> Result<(), CartError> {
        let items = if self.inner.auth.is_authenticated() {
            self.inner.api.get_cart().await?
        } else {
            self.inner.guest.load(Utc::now())?
        };

        self.apply(CartAction::Set(items));
        Ok(())
    }

    /// Reconcile the guest cart into the server cart after login.
    ///
    /// Runs exactly once per guest-to-authenticated transition (the
    /// composition root guards the flag flip). The guest storage entry is
    /// deleted unconditionally, even when the push fails: local state
    /// already holds the merged cart and the next successful sync carries
    /// it to the server.
    ///
    /// # Errors
    ///
    /// Returns an error only for storage access failures.
    #[instrument(skip(self))]
    pub async fn merge_guest_cart(&self) -> Result<(), CartError> {
        let guest_items = self.inner.guest.load(Utc::now())?;

        let server_items = match self.inner.api.get_cart().await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch server cart for merge, merging into empty");
                Vec::new()
            }
        };

        let merged = merge_carts(&server_items, &guest_items);

        if let Err(e) = self.inner.api.replace_cart(&merged).await {
            tracing::warn!(error = %e, "Failed to push merged cart");
        }

        self.apply(CartAction::Set(merged));
        self.inner.guest.clear()?;
        Ok(())
    }

    /// Tear down cart state on logout.
    ///
    /// The guest storage entry is deleted and local state emptied: the
    /// next anonymous session starts with a clean cart. Nothing is copied
    /// from the server side.
    #[instrument(skip(self))]
    pub fn on_logout(&self) {
        if let Err(e) = self.inner.guest.clear() {
            tracing::warn!(error = %e, "Failed to clear guest cart storage on logout");
        }
        self.apply(CartAction::Clear);
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Apply a reducer action and return the resulting item list.
    fn apply(&self, action: CartAction) -> Vec<CartItem> {
        let mut items = match self.inner.items.lock() {
            Ok(items) => items,
            Err(poisoned) => poisoned.into_inner(),
        };
        let next = reduce(&items, action);
        *items = next.clone();
        next
    }

    /// Push `next` to whichever side currently owns persistence.
    ///
    /// Failures are logged, never propagated: the optimistic local state
    /// stays authoritative until the next successful hydration.
    async fn sync(&self, next: Vec<CartItem>) {
        if self.inner.auth.is_authenticated() {
            if let Err(e) = self.inner.api.replace_cart(&next).await {
                tracing::warn!(error = %e, "Cart sync failed, keeping optimistic state");
            }
        } else if let Err(e) = self.inner.guest.save(next, Utc::now()) {
            tracing::warn!(error = %e, "Guest cart write failed, keeping optimistic state");
        }
    }
}
