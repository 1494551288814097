//! Product summary type.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// A denormalized product snapshot carried alongside cart and favorite
/// entries for display purposes.
///
/// The backend remains the source of truth for product data; a summary is
/// only as fresh as the response it arrived in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    /// Product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Current unit price.
    pub price: Decimal,
    /// Primary image URL, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Stock across all variants, when the backend reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_stock: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{"id":"p1","name":"Linen Shirt","price":"49.50","availableStock":12}"#;
        let summary: ProductSummary = serde_json::from_str(json).expect("deserialize");
        assert_eq!(summary.id.as_str(), "p1");
        assert_eq!(summary.price, Decimal::new(4950, 2));
        assert_eq!(summary.available_stock, Some(12));
        assert!(summary.image.is_none());
    }
}
