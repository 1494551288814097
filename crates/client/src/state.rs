//! Application state: the composition root.
//!
//! `AppState` owns the API client, the two storage scopes, and the
//! services, and is the only place that observes authentication
//! transitions. Services never watch each other; the flag-flip hooks
//! (guest-cart merge, favorites fetch/replay, logout teardown) run here,
//! exactly once per actual transition.

use std::sync::Arc;

use tracing::instrument;

use clementine_core::User;

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::services::{AuthService, CartService, FavoriteService, ProductSearch};
use crate::storage::{JsonFileStore, KeyValueStore, MemoryStore};

/// Application state shared across the front end.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ClientConfig,
    api: ApiClient,
    auth: AuthService,
    cart: CartService,
    favorites: FavoriteService,
    search: ProductSearch,
}

impl AppState {
    /// Create application state from configuration.
    ///
    /// Durable storage is file-backed when `storage_path` is set, else
    /// in-memory. Session-scoped storage is always in-memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or storage file cannot be set
    /// up.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let durable: Arc<dyn KeyValueStore> = match &config.storage_path {
            Some(path) => Arc::new(JsonFileStore::open(path).map_err(ClientError::Storage)?),
            None => Arc::new(MemoryStore::new()),
        };
        Self::with_stores(config, durable, Arc::new(MemoryStore::new()))
    }

    /// Create application state over explicit stores. Used by tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_stores(
        config: ClientConfig,
        durable: Arc<dyn KeyValueStore>,
        session: Arc<dyn KeyValueStore>,
    ) -> Result<Self> {
        let api = ApiClient::new(&config).map_err(ClientError::Api)?;
        let auth = AuthService::new(api.clone(), Arc::clone(&durable));
        let cart = CartService::new(api.clone(), auth.clone(), durable);
        let favorites = FavoriteService::new(api.clone(), auth.clone(), session);
        let search = ProductSearch::new(api.clone(), config.search_debounce, config.search_limit);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                auth,
                cart,
                favorites,
                search,
            }),
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Get a reference to the API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Get a reference to the auth service.
    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }

    /// Get a reference to the cart service.
    #[must_use]
    pub fn cart(&self) -> &CartService {
        &self.inner.cart
    }

    /// Get a reference to the favorites service.
    #[must_use]
    pub fn favorites(&self) -> &FavoriteService {
        &self.inner.favorites
    }

    /// Get a reference to the product search.
    #[must_use]
    pub fn search(&self) -> &ProductSearch {
        &self.inner.search
    }

    // =========================================================================
    // Auth transitions
    // =========================================================================

    /// Restore state on startup.
    ///
    /// A persisted token is verified against the backend; success counts
    /// as a guest-to-authenticated transition (merge + favorites fetch),
    /// rejection falls back to a clean guest session with the stored
    /// session wiped.
    ///
    /// # Errors
    ///
    /// Returns an error for storage failures or a failed guest hydration.
    #[instrument(skip(self))]
    pub async fn bootstrap(&self) -> Result<()> {
        let was_authenticated = self.inner.auth.is_authenticated();
        let verified = self.inner.auth.verify_session().await?;

        if verified && !was_authenticated {
            self.on_authenticated().await;
        } else {
            self.inner.cart.hydrate().await.map_err(ClientError::Cart)?;
        }
        Ok(())
    }

    /// Login and run the guest-to-authenticated hooks.
    ///
    /// # Errors
    ///
    /// Returns an error if the login itself fails; post-login hook
    /// failures are logged, not propagated.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let was_authenticated = self.inner.auth.is_authenticated();
        let user = self.inner.auth.login(email, password).await?;

        if !was_authenticated {
            self.on_authenticated().await;
        }
        Ok(user)
    }

    /// Register and run the guest-to-authenticated hooks.
    ///
    /// # Errors
    ///
    /// Returns an error if the registration itself fails.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn register(&self, email: &str, password: &str, name: Option<&str>) -> Result<User> {
        let was_authenticated = self.inner.auth.is_authenticated();
        let user = self.inner.auth.register(email, password, name).await?;

        if !was_authenticated {
            self.on_authenticated().await;
        }
        Ok(user)
    }

    /// Logout and run the authenticated-to-guest hooks.
    ///
    /// # Errors
    ///
    /// Returns an error if stored session data cannot be deleted.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        let was_authenticated = self.inner.auth.is_authenticated();
        self.inner.auth.logout().map_err(ClientError::Auth)?;

        if was_authenticated {
            self.inner.cart.on_logout();
            self.inner.favorites.on_logout();
        }
        Ok(())
    }

    /// Guest-to-authenticated hooks: cart merge, favorites fetch, pending
    /// favorite replay. Failures here are logged rather than propagated -
    /// the session itself is valid and the next hydration reconciles.
    async fn on_authenticated(&self) {
        if let Err(e) = self.inner.cart.merge_guest_cart().await {
            tracing::warn!(error = %e, "Guest cart merge failed");
        }
        if let Err(e) = self.inner.favorites.on_login().await {
            tracing::warn!(error = %e, "Favorites refresh failed");
        }
    }
}
