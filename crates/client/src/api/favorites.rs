//! Favorites endpoints.
//!
//! The backend is loose about payload shapes here (entries sometimes carry
//! a nested product object, sometimes arrive as a bare product), so every
//! response is normalized into [`FavoriteEntry`] before it leaves this
//! module.

use reqwest::Method;
use tracing::instrument;

use clementine_core::{FavoriteEntry, FavoritePayload, ProductId};

use super::{ApiClient, ApiError, NoBody};

impl ApiClient {
    /// Fetch the authenticated user's favorites.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_favorites(&self) -> Result<Vec<FavoriteEntry>, ApiError> {
        let payloads: Vec<FavoritePayload> = self
            .execute(Method::GET, "/favorites", None::<&NoBody>)
            .await?;
        Ok(payloads.into_iter().map(FavoriteEntry::from).collect())
    }

    /// Favorite a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_favorite(&self, product_id: &ProductId) -> Result<FavoriteEntry, ApiError> {
        let payload: FavoritePayload = self
            .execute(
                Method::POST,
                &format!("/favorites/{product_id}"),
                None::<&NoBody>,
            )
            .await?;
        Ok(payload.into())
    }

    /// Unfavorite a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_favorite(&self, product_id: &ProductId) -> Result<(), ApiError> {
        self.execute_unit(
            Method::DELETE,
            &format!("/favorites/{product_id}"),
            None::<&NoBody>,
        )
        .await
    }
}
