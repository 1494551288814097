//! Pure cart state transitions.
//!
//! The reducer owns no I/O and no clock: it maps `(items, action)` to the
//! next item list. The service layer applies it synchronously for
//! optimistic updates, then reuses the result to drive the sync step.

use clementine_core::{CartItem, CartKey};

/// A cart state transition.
#[derive(Debug, Clone)]
pub enum CartAction {
    /// Replace the cart wholesale (hydration).
    Set(Vec<CartItem>),
    /// Add one unit of a line, appending or incrementing.
    Add(CartItem),
    /// Remove the line with this key.
    Remove(CartKey),
    /// Set the quantity of the line with this key.
    ///
    /// Quantities at or below zero never reach the reducer: the service
    /// routes them to [`CartAction::Remove`] first.
    UpdateQuantity {
        /// Line identity.
        key: CartKey,
        /// Requested quantity, clamped into `[1, max_stock]`.
        quantity: u32,
    },
    /// Empty the cart.
    Clear,
}

/// Apply an action to the current item list, producing the next one.
#[must_use]
pub fn reduce(items: &[CartItem], action: CartAction) -> Vec<CartItem> {
    match action {
        CartAction::Set(next) => next,
        CartAction::Add(incoming) => add(items, incoming),
        CartAction::Remove(key) => items
            .iter()
            .filter(|item| item.key() != key)
            .cloned()
            .collect(),
        CartAction::UpdateQuantity { key, quantity } => items
            .iter()
            .map(|item| {
                if item.key() == key {
                    let mut updated = item.clone();
                    updated.quantity = item.clamp_quantity(quantity);
                    updated
                } else {
                    item.clone()
                }
            })
            .collect(),
        CartAction::Clear => Vec::new(),
    }
}

fn add(items: &[CartItem], incoming: CartItem) -> Vec<CartItem> {
    let key = incoming.key();
    let mut next: Vec<CartItem> = Vec::with_capacity(items.len() + 1);
    let mut matched = false;

    for item in items {
        if item.key() == key {
            matched = true;
            let mut updated = item.clone();
            // The incoming payload has the freshest stock data
            if incoming.variant_stock.is_some() {
                updated.variant_stock = incoming.variant_stock;
            }
            if incoming.available_stock.is_some() {
                updated.available_stock = incoming.available_stock;
            }
            updated.quantity = updated.clamp_quantity(item.quantity.saturating_add(1));
            next.push(updated);
        } else {
            next.push(item.clone());
        }
    }

    if !matched {
        let mut appended = incoming;
        appended.quantity = appended.clamp_quantity(1);
        next.push(appended);
    }

    next
}
