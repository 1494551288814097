//! Favorites: optimistic updates, rollback, and the login-detour replay.

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use clementine_client::services::FavoriteOutcome;
use clementine_client::storage::{KeyValueStore, keys};
use clementine_core::ProductId;
use clementine_integration_tests::{TestContext, error_envelope, ok_envelope, session_json};

async fn mount_login(ctx: &TestContext, favorites: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok_envelope(session_json("shopper@example.com"))),
        )
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({"items": []}))))
        .mount(&ctx.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({"items": []}))))
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/favorites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(favorites)))
        .mount(&ctx.server)
        .await;
}

#[tokio::test]
async fn test_guest_favorite_defers_through_login() {
    let ctx = TestContext::new().await;

    let outcome = ctx
        .state
        .favorites()
        .add_favorite(None, Some(ProductId::new("B")), "/products/B")
        .await
        .expect("deferral is not an error");

    assert_eq!(
        outcome,
        FavoriteOutcome::LoginRequired {
            redirect: "/login?redirect=%2Fproducts%2FB".to_owned(),
        }
    );
    // Nothing applied locally, but the intent is parked in session storage.
    assert!(!ctx.state.favorites().is_favorite(&ProductId::new("B")));
    assert_eq!(
        ctx.session
            .get(keys::PENDING_FAVORITE_PRODUCT_ID)
            .expect("store readable")
            .as_deref(),
        Some("B")
    );
    assert_eq!(
        ctx.session
            .get(keys::PENDING_FAVORITE_RETURN)
            .expect("store readable")
            .as_deref(),
        Some("/products/B")
    );
}

#[tokio::test]
async fn test_pending_favorite_replays_after_login() {
    let ctx = TestContext::new().await;

    ctx.state
        .favorites()
        .add_favorite(None, Some(ProductId::new("B")), "/products/B")
        .await
        .expect("deferral is not an error");

    mount_login(&ctx, json!([])).await;
    Mock::given(method("POST"))
        .and(path("/api/favorites/B"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(ok_envelope(json!({"productId": "B"}))),
        )
        .expect(1)
        .mount(&ctx.server)
        .await;

    ctx.state
        .login("shopper@example.com", "hunter2")
        .await
        .expect("login succeeds");

    assert!(ctx.state.favorites().is_favorite(&ProductId::new("B")));
    assert!(
        ctx.session
            .get(keys::PENDING_FAVORITE_PRODUCT_ID)
            .expect("store readable")
            .is_none(),
        "pending intent should be consumed"
    );
}

#[tokio::test]
async fn test_add_favorite_rolls_back_on_rejection() {
    let ctx = TestContext::new().await;
    mount_login(&ctx, json!([])).await;
    ctx.state
        .login("shopper@example.com", "hunter2")
        .await
        .expect("login succeeds");

    Mock::given(method("POST"))
        .and(path("/api/favorites/B"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(error_envelope("Favorites are down")),
        )
        .mount(&ctx.server)
        .await;

    let result = ctx
        .state
        .favorites()
        .add_favorite(None, Some(ProductId::new("B")), "/")
        .await;

    assert!(result.is_err());
    assert!(!ctx.state.favorites().is_favorite(&ProductId::new("B")));
    let last = ctx.state.favorites().last_error().expect("error recorded");
    assert!(last.contains("Favorites are down"), "got: {last}");
}

#[tokio::test]
async fn test_remove_favorite_restores_snapshot_on_rejection() {
    let ctx = TestContext::new().await;
    mount_login(&ctx, json!([{"productId": "B"}])).await;
    ctx.state
        .login("shopper@example.com", "hunter2")
        .await
        .expect("login succeeds");
    assert!(ctx.state.favorites().is_favorite(&ProductId::new("B")));

    Mock::given(method("DELETE"))
        .and(path("/api/favorites/B"))
        .respond_with(ResponseTemplate::new(500).set_body_json(error_envelope("Nope")))
        .mount(&ctx.server)
        .await;

    let result = ctx
        .state
        .favorites()
        .remove_favorite(&ProductId::new("B"), "/")
        .await;

    assert!(result.is_err());
    assert!(
        ctx.state.favorites().is_favorite(&ProductId::new("B")),
        "the removed entry should be restored"
    );
}

#[tokio::test]
async fn test_logout_clears_favorites() {
    let ctx = TestContext::new().await;
    mount_login(&ctx, json!([{"productId": "B"}])).await;
    ctx.state
        .login("shopper@example.com", "hunter2")
        .await
        .expect("login succeeds");

    ctx.state.logout().await.expect("logout succeeds");
    assert!(ctx.state.favorites().favorites().is_empty());
}
