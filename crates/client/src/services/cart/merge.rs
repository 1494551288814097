//! Guest/server cart reconciliation.

use std::collections::HashMap;

use clementine_core::{CartItem, CartKey};

/// Merge the server cart with the guest cart by line key.
///
/// Server lines are inserted first, guest lines merged on top: when both
/// sides hold the same key, quantities are summed (clamped to that line's
/// own stock bound) and the guest line's non-quantity fields win.
///
/// NOTE: the guest-overwrites-server field precedence means a stale guest
/// snapshot (e.g. an old price) clobbers the fresher server copy. That is
/// the behavior the shipped web client has always had, and downstream
/// pricing is recomputed server-side at checkout, so it is preserved here
/// rather than silently changed.
#[must_use]
pub fn merge_carts(server: &[CartItem], guest: &[CartItem]) -> Vec<CartItem> {
    let mut merged: Vec<CartItem> = Vec::with_capacity(server.len() + guest.len());
    let mut index: HashMap<CartKey, usize> = HashMap::with_capacity(server.len() + guest.len());

    for item in server {
        let mut item = item.clone();
        item.quantity = item.clamp_quantity(item.quantity);
        index.insert(item.key(), merged.len());
        merged.push(item);
    }

    for item in guest {
        let key = item.key();
        if let Some(&slot) = index.get(&key) {
            if let Some(existing) = merged.get_mut(slot) {
                let summed = existing.quantity.saturating_add(item.quantity);
                let mut combined = item.clone();
                // Prefer the guest line's stock bound, falling back to the
                // server line's when the guest never saw one
                if combined.max_stock().is_none() {
                    combined.variant_stock = existing.variant_stock;
                    combined.available_stock = existing.available_stock;
                }
                combined.quantity = combined.clamp_quantity(summed);
                *existing = combined;
            }
        } else {
            let mut item = item.clone();
            item.quantity = item.clamp_quantity(item.quantity);
            index.insert(key, merged.len());
            merged.push(item);
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use clementine_core::ProductId;
    use rust_decimal::Decimal;

    fn item(id: &str, quantity: u32, price: i64, variant_stock: Option<u32>) -> CartItem {
        CartItem {
            product_id: ProductId::new(id),
            size: Some("M".to_owned()),
            color: Some("blue".to_owned()),
            quantity,
            unit_price: Decimal::new(price, 2),
            variant_stock,
            available_stock: None,
        }
    }

    #[test]
    fn test_merge_sums_and_clamps() {
        // Server [{A, qty 2, stock 5}] + guest [{A, qty 2}, {B, qty 1}]
        // => [{A, qty 4}, {B, qty 1}]
        let server = vec![item("A", 2, 1000, Some(5))];
        let guest = vec![item("A", 2, 1000, Some(5)), item("B", 1, 2000, None)];

        let merged = merge_carts(&server, &guest);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].product_id.as_str(), "A");
        assert_eq!(merged[0].quantity, 4);
        assert_eq!(merged[1].product_id.as_str(), "B");
        assert_eq!(merged[1].quantity, 1);
    }

    #[test]
    fn test_merge_clamps_summed_quantity() {
        let server = vec![item("A", 4, 1000, Some(5))];
        let guest = vec![item("A", 3, 1000, Some(5))];

        let merged = merge_carts(&server, &guest);
        assert_eq!(merged[0].quantity, 5);
    }

    #[test]
    fn test_guest_fields_win_on_duplicate_keys() {
        // The guest snapshot's price overwrites the server's
        let server = vec![item("A", 1, 1000, Some(5))];
        let guest = vec![item("A", 1, 1250, Some(5))];

        let merged = merge_carts(&server, &guest);
        assert_eq!(merged[0].unit_price, Decimal::new(1250, 2));
        assert_eq!(merged[0].quantity, 2);
    }

    #[test]
    fn test_guest_without_stock_inherits_server_bound() {
        let server = vec![item("A", 4, 1000, Some(5))];
        let guest = vec![item("A", 4, 1000, None)];

        let merged = merge_carts(&server, &guest);
        assert_eq!(merged[0].quantity, 5);
    }

    #[test]
    fn test_server_only_lines_pass_through() {
        let server = vec![item("A", 2, 1000, None)];
        let merged = merge_carts(&server, &[]);
        assert_eq!(merged, server);
    }

    #[test]
    fn test_order_is_server_then_new_guest_lines() {
        let server = vec![item("A", 1, 1000, None), item("B", 1, 1000, None)];
        let guest = vec![item("C", 1, 1000, None), item("A", 1, 1000, None)];

        let merged = merge_carts(&server, &guest);
        let ids: Vec<&str> = merged.iter().map(|i| i.product_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_different_variants_never_merge() {
        let server = vec![item("A", 1, 1000, None)];
        let mut other = item("A", 1, 1000, None);
        other.size = Some("L".to_owned());

        let merged = merge_carts(&server, &[other]);
        assert_eq!(merged.len(), 2);
    }
}
