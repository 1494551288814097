//! Cart line items and the guest cart envelope.
//!
//! A cart line is identified by the `(product, size, color)` triple: the
//! same product in two sizes is two distinct lines. Quantities are always
//! clamped into `[1, max_stock]`; a quantity that would reach zero removes
//! the line instead (enforced by the cart service, not here).

use core::fmt;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// How long a guest cart survives in client storage.
pub const GUEST_CART_TTL_DAYS: i64 = 7;

/// A single cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product identifier.
    pub product_id: ProductId,
    /// Selected size, if the product has sizes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Selected color, if the product has colors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Line quantity. Always at least 1.
    pub quantity: u32,
    /// Unit price captured when the line was added.
    pub unit_price: Decimal,
    /// Stock for the selected variant, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_stock: Option<u32>,
    /// Product-wide stock fallback, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_stock: Option<u32>,
}

impl CartItem {
    /// The identity key for this line.
    #[must_use]
    pub fn key(&self) -> CartKey {
        CartKey::from(self)
    }

    /// Upper quantity bound for this line.
    ///
    /// Variant stock wins over product-wide stock; `None` means unbounded.
    #[must_use]
    pub const fn max_stock(&self) -> Option<u32> {
        match self.variant_stock {
            Some(stock) => Some(stock),
            None => self.available_stock,
        }
    }

    /// Clamp a requested quantity into `[1, max_stock]`.
    #[must_use]
    pub fn clamp_quantity(&self, requested: u32) -> u32 {
        let bounded = self.max_stock().map_or(requested, |max| requested.min(max));
        bounded.max(1)
    }

    /// Price of the whole line (`unit_price * quantity`).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Identity key for a cart line: `(product, size, color)`.
///
/// Missing size/color components are represented as empty strings so the
/// key is stable regardless of which side (client or server) produced the
/// line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CartKey {
    /// Product identifier.
    pub product_id: ProductId,
    /// Size component, empty when absent.
    pub size: String,
    /// Color component, empty when absent.
    pub color: String,
}

impl CartKey {
    /// Build a key from raw components.
    #[must_use]
    pub fn new(product_id: ProductId, size: Option<&str>, color: Option<&str>) -> Self {
        Self {
            product_id,
            size: size.unwrap_or_default().to_owned(),
            color: color.unwrap_or_default().to_owned(),
        }
    }
}

impl From<&CartItem> for CartKey {
    fn from(item: &CartItem) -> Self {
        Self::new(
            item.product_id.clone(),
            item.size.as_deref(),
            item.color.as_deref(),
        )
    }
}

impl fmt::Display for CartKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.product_id, self.size, self.color)
    }
}

/// The guest cart as persisted in client storage.
///
/// The expiry window is fixed at creation; reads past `expires_at` must be
/// treated as absent and the stored entry purged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestCart {
    /// Cart lines.
    pub items: Vec<CartItem>,
    /// When this snapshot was written.
    pub created_at: DateTime<Utc>,
    /// When this snapshot stops being valid.
    pub expires_at: DateTime<Utc>,
}

impl GuestCart {
    /// Create a guest cart with a fresh TTL window starting at `now`.
    #[must_use]
    pub fn new(items: Vec<CartItem>, now: DateTime<Utc>) -> Self {
        Self {
            items,
            created_at: now,
            expires_at: now + Duration::days(GUEST_CART_TTL_DAYS),
        }
    }

    /// Whether this snapshot has passed its expiry.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn item(quantity: u32, variant_stock: Option<u32>, available_stock: Option<u32>) -> CartItem {
        CartItem {
            product_id: ProductId::new("p1"),
            size: Some("M".to_owned()),
            color: None,
            quantity,
            unit_price: Decimal::new(1999, 2),
            variant_stock,
            available_stock,
        }
    }

    #[test]
    fn test_max_stock_prefers_variant() {
        assert_eq!(item(1, Some(3), Some(10)).max_stock(), Some(3));
        assert_eq!(item(1, None, Some(10)).max_stock(), Some(10));
        assert_eq!(item(1, None, None).max_stock(), None);
    }

    #[test]
    fn test_clamp_quantity_bounds() {
        let bounded = item(1, Some(5), None);
        assert_eq!(bounded.clamp_quantity(0), 1);
        assert_eq!(bounded.clamp_quantity(3), 3);
        assert_eq!(bounded.clamp_quantity(99), 5);

        let unbounded = item(1, None, None);
        assert_eq!(unbounded.clamp_quantity(99), 99);
    }

    #[test]
    fn test_key_uses_empty_strings_for_missing_parts() {
        let key = item(1, None, None).key();
        assert_eq!(key.to_string(), "p1|M|");

        let bare = CartKey::new(ProductId::new("p2"), None, None);
        assert_eq!(bare.to_string(), "p2||");
    }

    #[test]
    fn test_keys_distinguish_variants() {
        let mut a = item(1, None, None);
        let mut b = a.clone();
        assert_eq!(a.key(), b.key());

        b.size = Some("L".to_owned());
        assert_ne!(a.key(), b.key());

        a.size = None;
        a.color = Some("red".to_owned());
        assert_ne!(a.key(), b.key());
    }

    #[test]
    fn test_line_total() {
        let line = item(3, None, None);
        assert_eq!(line.line_total(), Decimal::new(5997, 2));
    }

    #[test]
    fn test_guest_cart_ttl_window() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).single().expect("valid ts");
        let cart = GuestCart::new(vec![item(1, None, None)], now);

        assert_eq!(cart.expires_at, now + Duration::days(7));
        assert!(!cart.is_expired(now));
        assert!(!cart.is_expired(cart.expires_at));
        assert!(cart.is_expired(cart.expires_at + Duration::milliseconds(1)));
    }
}
