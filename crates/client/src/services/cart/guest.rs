//! Guest cart persistence.
//!
//! The anonymous visitor's cart lives in durable client storage under
//! `guest_cart_v1`, wrapped in a 7-day TTL envelope. Every write starts a
//! fresh window; any read past expiry deletes the entry and reports an
//! empty cart.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use clementine_core::{CartItem, GuestCart};

use crate::storage::{self, KeyValueStore, StorageError, keys};

/// Durable guest-cart storage.
#[derive(Clone)]
pub struct GuestCartStore {
    store: Arc<dyn KeyValueStore>,
}

impl GuestCartStore {
    /// Wrap a durable store.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load the guest cart as of `now`.
    ///
    /// Expired or corrupt snapshots are purged and read as empty.
    ///
    /// # Errors
    ///
    /// Returns an error only for storage access failures.
    pub fn load(&self, now: DateTime<Utc>) -> Result<Vec<CartItem>, StorageError> {
        let Some(cart): Option<GuestCart> = storage::get_json(self.store.as_ref(), keys::GUEST_CART)?
        else {
            return Ok(Vec::new());
        };

        if cart.is_expired(now) {
            tracing::debug!(expired_at = %cart.expires_at, "Guest cart expired, purging");
            self.store.remove(keys::GUEST_CART)?;
            return Ok(Vec::new());
        }

        Ok(cart.items)
    }

    /// Persist `items` with a fresh TTL window starting at `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn save(&self, items: Vec<CartItem>, now: DateTime<Utc>) -> Result<(), StorageError> {
        let cart = GuestCart::new(items, now);
        storage::set_json(self.store.as_ref(), keys::GUEST_CART, &cart)
    }

    /// Delete the stored guest cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(keys::GUEST_CART)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::{Duration, TimeZone};
    use clementine_core::ProductId;
    use rust_decimal::Decimal;

    fn item() -> CartItem {
        CartItem {
            product_id: ProductId::new("p1"),
            size: None,
            color: None,
            quantity: 2,
            unit_price: Decimal::new(500, 2),
            variant_stock: None,
            available_stock: None,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).single().unwrap()
    }

    #[test]
    fn test_load_within_window() {
        let store = GuestCartStore::new(Arc::new(MemoryStore::new()));
        store.save(vec![item()], now()).unwrap();

        let items = store.load(now() + Duration::days(6)).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_load_past_expiry_purges() {
        let memory = Arc::new(MemoryStore::new());
        let store = GuestCartStore::new(Arc::clone(&memory) as Arc<dyn KeyValueStore>);
        store.save(vec![item()], now()).unwrap();

        let read_at = now() + Duration::days(7) + Duration::milliseconds(1);
        let items = store.load(read_at).unwrap();
        assert!(items.is_empty());

        // The entry is gone, not just ignored
        assert_eq!(memory.get(keys::GUEST_CART).unwrap(), None);
    }

    #[test]
    fn test_save_refreshes_window() {
        let memory = Arc::new(MemoryStore::new());
        let store = GuestCartStore::new(Arc::clone(&memory) as Arc<dyn KeyValueStore>);
        store.save(vec![item()], now()).unwrap();

        // A later write restarts the 7-day clock
        let later = now() + Duration::days(5);
        store.save(vec![item()], later).unwrap();

        let items = store.load(now() + Duration::days(11)).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_corrupt_snapshot_reads_empty() {
        let memory = Arc::new(MemoryStore::new());
        memory.set(keys::GUEST_CART, "{broken").unwrap();

        let store = GuestCartStore::new(Arc::clone(&memory) as Arc<dyn KeyValueStore>);
        assert!(store.load(now()).unwrap().is_empty());
        assert_eq!(memory.get(keys::GUEST_CART).unwrap(), None);
    }

    #[test]
    fn test_clear_removes_entry() {
        let memory = Arc::new(MemoryStore::new());
        let store = GuestCartStore::new(Arc::clone(&memory) as Arc<dyn KeyValueStore>);
        store.save(vec![item()], now()).unwrap();
        store.clear().unwrap();
        assert_eq!(memory.get(keys::GUEST_CART).unwrap(), None);
    }
}
