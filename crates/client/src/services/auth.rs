//! Authentication service.
//!
//! Owns the current session (user + token), persists it to durable
//! storage under the `token` / `user` keys, and installs the bearer token
//! into the shared [`ApiClient`] so every other service's requests are
//! authenticated.

use std::sync::{Arc, RwLock};

use secrecy::SecretString;
use thiserror::Error;
use tracing::instrument;

use clementine_core::{AuthSession, User};

use crate::api::auth::{LoginRequest, RegisterRequest};
use crate::api::{ApiClient, ApiError};
use crate::storage::{self, KeyValueStore, StorageError, keys};

/// Errors that can occur during authentication.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Client storage failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Authentication service.
///
/// Cheaply cloneable; all clones share the same session.
#[derive(Clone)]
pub struct AuthService {
    inner: Arc<AuthInner>,
}

struct AuthInner {
    api: ApiClient,
    store: Arc<dyn KeyValueStore>,
    session: RwLock<Option<AuthSession>>,
}

impl AuthService {
    /// Create an auth service over the shared API client and durable store.
    #[must_use]
    pub fn new(api: ApiClient, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            inner: Arc::new(AuthInner {
                api,
                store,
                session: RwLock::new(None),
            }),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Whether a session is currently active.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner
            .session
            .read()
            .map(|session| session.is_some())
            .unwrap_or(false)
    }

    /// The current user, if authenticated.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.inner
            .session
            .read()
            .ok()
            .and_then(|session| session.as_ref().map(|s| s.user.clone()))
    }

    /// Whether the current user may use the admin console.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(|user| user.is_admin())
    }

    // =========================================================================
    // Session lifecycle
    // =========================================================================

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the credentials or the
    /// session cannot be persisted.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let session = self
            .inner
            .api
            .login(&LoginRequest { email, password })
            .await?;
        self.install(session)
    }

    /// Register a new account and start a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the registration or the
    /// session cannot be persisted.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<User, AuthError> {
        let session = self
            .inner
            .api
            .register(&RegisterRequest {
                email,
                password,
                name,
            })
            .await?;
        self.install(session)
    }

    /// Destroy the current session.
    ///
    /// # Errors
    ///
    /// Returns an error if stored session data cannot be deleted; the
    /// in-memory session and API token are cleared regardless.
    #[instrument(skip(self))]
    pub fn logout(&self) -> Result<(), AuthError> {
        if let Ok(mut session) = self.inner.session.write() {
            *session = None;
        }
        self.inner.api.set_token(None);

        // Attempt both removals even if the first fails; a token left in
        // storage would resurrect the session on the next bootstrap.
        let token = self.inner.store.remove(keys::TOKEN);
        let user = self.inner.store.remove(keys::USER);
        token?;
        user?;
        Ok(())
    }

    /// Verify a previously persisted session on startup.
    ///
    /// Returns `true` when a stored token exists and the backend confirms
    /// it. Any verification failure triggers a full logout rather than an
    /// ambiguous half-authenticated state.
    ///
    /// # Errors
    ///
    /// Returns an error only for storage access failures.
    #[instrument(skip(self))]
    pub async fn verify_session(&self) -> Result<bool, AuthError> {
        let Some(token) = self.inner.store.get(keys::TOKEN)? else {
            return Ok(false);
        };

        self.inner
            .api
            .set_token(Some(SecretString::from(token.clone())));

        match self.inner.api.current_user().await {
            Ok(user) => {
                // Refresh the stored user snapshot while we're at it
                storage::set_json(self.inner.store.as_ref(), keys::USER, &user)?;
                if let Ok(mut session) = self.inner.session.write() {
                    *session = Some(AuthSession { user, token });
                }
                Ok(true)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Stored token rejected, logging out");
                self.logout()?;
                Ok(false)
            }
        }
    }

    /// Persist a fresh session and install its token.
    fn install(&self, session: AuthSession) -> Result<User, AuthError> {
        self.inner.store.set(keys::TOKEN, &session.token)?;
        storage::set_json(self.inner.store.as_ref(), keys::USER, &session.user)?;

        self.inner
            .api
            .set_token(Some(SecretString::from(session.token.clone())));

        let user = session.user.clone();
        if let Ok(mut slot) = self.inner.session.write() {
            *slot = Some(session);
        }
        Ok(user)
    }
}
