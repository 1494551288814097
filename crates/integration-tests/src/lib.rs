//! Integration test harness for the Clementine storefront client.
//!
//! Tests drive a real [`AppState`] against a [`wiremock`] backend, going
//! through the same composition root a front end uses. The harness keeps
//! the storage scopes accessible so a test can simulate a process restart
//! (new `AppState`, same durable store) or inspect persisted state.
//!
//! Run with `cargo test -p clementine-integration-tests`.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use wiremock::MockServer;

use clementine_client::storage::{KeyValueStore, MemoryStore};
use clementine_client::{AppState, ClientConfig};

/// A mock backend plus an `AppState` wired against it.
pub struct TestContext {
    /// The wiremock backend.
    pub server: MockServer,
    /// Application state under test.
    pub state: AppState,
    /// Durable storage scope, shared with `state`.
    pub durable: Arc<MemoryStore>,
    /// Session storage scope, shared with `state`.
    pub session: Arc<MemoryStore>,
}

impl TestContext {
    /// Start a mock backend and an `AppState` against it.
    pub async fn new() -> Self {
        Self::with_debounce(Duration::from_millis(250)).await
    }

    /// Like [`TestContext::new`] but with a custom typeahead debounce,
    /// for tests that exercise search timing.
    pub async fn with_debounce(debounce: Duration) -> Self {
        let server = MockServer::start().await;
        let mut config =
            ClientConfig::for_base_url(&server.uri()).expect("mock server URI is a valid base URL");
        config.search_debounce = debounce;

        let durable = Arc::new(MemoryStore::new());
        let session = Arc::new(MemoryStore::new());
        let state = AppState::with_stores(
            config,
            Arc::clone(&durable) as Arc<dyn KeyValueStore>,
            Arc::clone(&session) as Arc<dyn KeyValueStore>,
        )
        .expect("app state builds against the mock server");

        Self {
            server,
            state,
            durable,
            session,
        }
    }

    /// Build a fresh `AppState` over the same stores, simulating a
    /// process restart. The new state has not been bootstrapped.
    pub fn restart(&self) -> AppState {
        let config = ClientConfig::for_base_url(&self.server.uri())
            .expect("mock server URI is a valid base URL");
        AppState::with_stores(
            config,
            Arc::clone(&self.durable) as Arc<dyn KeyValueStore>,
            Arc::new(MemoryStore::new()),
        )
        .expect("app state builds against the mock server")
    }
}

// ============================================================================
// JSON Fixtures
// ============================================================================

/// Wrap a payload in the backend's success envelope.
#[must_use]
pub fn ok_envelope(data: Value) -> Value {
    json!({ "success": true, "data": data })
}

/// A failure envelope with a message and no data.
#[must_use]
pub fn error_envelope(message: &str) -> Value {
    json!({ "success": false, "message": message })
}

/// A product summary payload.
#[must_use]
pub fn product_json(id: &str, name: &str, price: &str) -> Value {
    json!({ "id": id, "name": name, "price": price })
}

/// A cart line payload. `variant_stock` is omitted when `None`, matching
/// what the backend sends for unlimited lines.
#[must_use]
pub fn cart_item_json(
    product_id: &str,
    quantity: u32,
    unit_price: &str,
    variant_stock: Option<u32>,
) -> Value {
    let mut item = json!({
        "productId": product_id,
        "quantity": quantity,
        "unitPrice": unit_price,
    });
    if let Some(stock) = variant_stock {
        item["variantStock"] = json!(stock);
    }
    item
}

/// A login/register session payload with a fresh random token.
#[must_use]
pub fn session_json(email: &str) -> Value {
    json!({
        "user": user_json(email),
        "token": uuid::Uuid::new_v4().to_string(),
    })
}

/// A user payload.
#[must_use]
pub fn user_json(email: &str) -> Value {
    json!({
        "id": uuid::Uuid::new_v4().to_string(),
        "email": email,
        "role": "customer",
    })
}
