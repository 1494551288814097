//! Cart endpoints.
//!
//! The cart service uses the full-replace endpoint (`PUT /cart`) for
//! every sync: the whole post-mutation item list is pushed, never a diff.
//! The incremental endpoints are kept for callers that operate on single
//! lines without holding local cart state.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use clementine_core::{CartItem, ProductId};

use super::{ApiClient, ApiError, NoBody};

/// Wire shape of the server cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartBody {
    /// Cart lines.
    pub items: Vec<CartItem>,
}

/// Body for `PATCH /cart/item`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemUpdate<'a> {
    /// Product identifier.
    pub product_id: &'a ProductId,
    /// New quantity.
    pub quantity: u32,
    /// Size component of the line key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<&'a str>,
    /// Color component of the line key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'a str>,
}

/// Body for `DELETE /cart/item/:productId`.
#[derive(Debug, Serialize)]
pub struct CartItemSelector<'a> {
    /// Size component of the line key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<&'a str>,
    /// Color component of the line key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'a str>,
}

impl ApiClient {
    /// Fetch the authenticated user's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_cart(&self) -> Result<Vec<CartItem>, ApiError> {
        let body: CartBody = self.execute(Method::GET, "/cart", None::<&NoBody>).await?;
        Ok(body.items)
    }

    /// Replace the server cart wholesale with `items`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, items), fields(count = items.len()))]
    pub async fn replace_cart(&self, items: &[CartItem]) -> Result<Vec<CartItem>, ApiError> {
        let body = serde_json::json!({ "items": items });
        let response: CartBody = self.execute(Method::PUT, "/cart", Some(&body)).await?;
        Ok(response.items)
    }

    /// Add a single line to the server cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, item), fields(product_id = %item.product_id))]
    pub async fn add_cart_item(&self, item: &CartItem) -> Result<Vec<CartItem>, ApiError> {
        let response: CartBody = self.execute(Method::POST, "/cart/item", Some(item)).await?;
        Ok(response.items)
    }

    /// Update the quantity of a single server cart line.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, update), fields(product_id = %update.product_id))]
    pub async fn update_cart_item(
        &self,
        update: &CartItemUpdate<'_>,
    ) -> Result<Vec<CartItem>, ApiError> {
        let response: CartBody = self
            .execute(Method::PATCH, "/cart/item", Some(update))
            .await?;
        Ok(response.items)
    }

    /// Remove a single line from the server cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, selector), fields(product_id = %product_id))]
    pub async fn remove_cart_item(
        &self,
        product_id: &ProductId,
        selector: &CartItemSelector<'_>,
    ) -> Result<Vec<CartItem>, ApiError> {
        let response: CartBody = self
            .execute(
                Method::DELETE,
                &format!("/cart/item/{product_id}"),
                Some(selector),
            )
            .await?;
        Ok(response.items)
    }
}
