//! Favorite entries.
//!
//! The backend is inconsistent about favorites payloads: some endpoints
//! return `{ productId, product }`, others return a bare product object.
//! [`FavoritePayload`] absorbs both shapes at the wire boundary and
//! normalizes into the strict [`FavoriteEntry`] immediately.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::product::ProductSummary;

/// A favorited product.
///
/// `product_id` is the durable identity; `product` is an optional
/// denormalized snapshot used for optimistic UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteEntry {
    /// Product identifier.
    pub product_id: ProductId,
    /// Denormalized snapshot, if one was available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductSummary>,
}

impl FavoriteEntry {
    /// Create an entry with no product snapshot.
    #[must_use]
    pub const fn bare(product_id: ProductId) -> Self {
        Self {
            product_id,
            product: None,
        }
    }
}

/// Raw favorites payload as received from the backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FavoritePayload {
    /// The canonical `{ productId, product? }` shape.
    Entry {
        /// Product identifier.
        #[serde(rename = "productId")]
        product_id: ProductId,
        /// Optional denormalized snapshot.
        #[serde(default)]
        product: Option<ProductSummary>,
    },
    /// A bare product object standing in for its own favorite entry.
    Product(ProductSummary),
}

impl From<FavoritePayload> for FavoriteEntry {
    fn from(payload: FavoritePayload) -> Self {
        match payload {
            FavoritePayload::Entry {
                product_id,
                product,
            } => Self {
                product_id,
                product,
            },
            FavoritePayload::Product(product) => Self {
                product_id: product.id.clone(),
                product: Some(product),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_entry_shape() {
        let json = r#"{"productId":"p1","product":{"id":"p1","name":"Hat","price":"12.00"}}"#;
        let payload: FavoritePayload = serde_json::from_str(json).expect("deserialize");
        let entry = FavoriteEntry::from(payload);

        assert_eq!(entry.product_id.as_str(), "p1");
        assert_eq!(entry.product.expect("snapshot").name, "Hat");
    }

    #[test]
    fn test_normalize_entry_without_snapshot() {
        let json = r#"{"productId":"p2"}"#;
        let payload: FavoritePayload = serde_json::from_str(json).expect("deserialize");
        let entry = FavoriteEntry::from(payload);

        assert_eq!(entry.product_id.as_str(), "p2");
        assert!(entry.product.is_none());
    }

    #[test]
    fn test_normalize_bare_product_shape() {
        let json = r#"{"id":"p3","name":"Scarf","price":"24.00"}"#;
        let payload: FavoritePayload = serde_json::from_str(json).expect("deserialize");
        let entry = FavoriteEntry::from(payload);

        assert_eq!(entry.product_id.as_str(), "p3");
        assert_eq!(entry.product.expect("snapshot").name, "Scarf");
    }
}
