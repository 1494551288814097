//! Auth endpoints: register, login, verify.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use clementine_core::{AuthSession, User};

use super::{ApiClient, ApiError, NoBody};

/// Credentials for `POST /auth/login`.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    /// Account email.
    pub email: &'a str,
    /// Account password.
    pub password: &'a str,
}

/// Payload for `POST /auth/register`.
#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    /// Account email.
    pub email: &'a str,
    /// Account password.
    pub password: &'a str,
    /// Display name, if provided at signup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
}

/// Session payload returned by login and register.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionResponse {
    /// The authenticated user.
    pub user: User,
    /// Bearer token for subsequent requests.
    pub token: String,
}

impl From<SessionResponse> for AuthSession {
    fn from(response: SessionResponse) -> Self {
        Self {
            user: response.user,
            token: response.token,
        }
    }
}

impl ApiClient {
    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects the
    /// registration (duplicate email, weak password).
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest<'_>) -> Result<AuthSession, ApiError> {
        let session: SessionResponse = self
            .execute(Method::POST, "/auth/register", Some(request))
            .await?;
        Ok(session.into())
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the credentials are wrong.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: &LoginRequest<'_>) -> Result<AuthSession, ApiError> {
        let session: SessionResponse = self
            .execute(Method::POST, "/auth/login", Some(request))
            .await?;
        Ok(session.into())
    }

    /// Verify the installed bearer token and fetch the current user.
    ///
    /// # Errors
    ///
    /// Returns an error if no valid session exists for the installed token.
    #[instrument(skip(self))]
    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.execute(Method::GET, "/auth/me", None::<&NoBody>).await
    }
}
