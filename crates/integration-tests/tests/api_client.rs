//! API client behavior: envelope handling, catalog caching, and the
//! incremental cart endpoints.

use rust_decimal::Decimal;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use clementine_client::api::ApiError;
use clementine_client::api::cart::{CartItemSelector, CartItemUpdate};
use clementine_core::{CartItem, ProductId};
use clementine_integration_tests::{TestContext, cart_item_json, error_envelope, ok_envelope, product_json};

#[tokio::test]
async fn test_success_false_maps_to_api_error_even_on_2xx() {
    let ctx = TestContext::new().await;
    Mock::given(method("GET"))
        .and(path("/api/products/P1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(error_envelope("Product not found")),
        )
        .mount(&ctx.server)
        .await;

    let err = ctx
        .state
        .api()
        .get_product(&ProductId::new("P1"))
        .await
        .expect_err("success=false must be an error");

    match err {
        ApiError::Api { status, message } => {
            assert_eq!(status, 200);
            assert_eq!(message, "Product not found");
        }
        other => panic!("expected ApiError::Api, got {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_failure_body_gets_generic_message() {
    let ctx = TestContext::new().await;
    Mock::given(method("GET"))
        .and(path("/api/products/P1"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&ctx.server)
        .await;

    let err = ctx
        .state
        .api()
        .get_product(&ProductId::new("P1"))
        .await
        .expect_err("502 must be an error");

    match err {
        ApiError::Api { status, message } => {
            assert_eq!(status, 502);
            assert!(message.contains("Request failed with status 502"), "got: {message}");
        }
        other => panic!("expected ApiError::Api, got {other:?}"),
    }
}

#[tokio::test]
async fn test_success_without_data_is_missing_data() {
    let ctx = TestContext::new().await;
    Mock::given(method("GET"))
        .and(path("/api/products/P1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&ctx.server)
        .await;

    let err = ctx
        .state
        .api()
        .get_product(&ProductId::new("P1"))
        .await
        .expect_err("missing data must be an error");
    assert!(matches!(err, ApiError::MissingData));
}

#[tokio::test]
async fn test_product_detail_is_cached() {
    let ctx = TestContext::new().await;
    Mock::given(method("GET"))
        .and(path("/api/products/P1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok_envelope(product_json("P1", "Linen Shirt", "25.00"))),
        )
        .expect(1)
        .mount(&ctx.server)
        .await;

    let first = ctx
        .state
        .api()
        .get_product(&ProductId::new("P1"))
        .await
        .expect("first fetch succeeds");
    let second = ctx
        .state
        .api()
        .get_product(&ProductId::new("P1"))
        .await
        .expect("second fetch served from cache");

    assert_eq!(first, second);
    assert_eq!(first.price, Decimal::new(2500, 2));
}

#[tokio::test]
async fn test_search_encodes_query() {
    let ctx = TestContext::new().await;
    Mock::given(method("GET"))
        .and(path("/api/products/search"))
        .and(query_param("query", "linen shirt"))
        .and(query_param("limit", "8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([
            product_json("P1", "Linen Shirt", "25.00"),
        ]))))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let products = ctx
        .state
        .api()
        .search_products("linen shirt", 8)
        .await
        .expect("search succeeds");
    assert_eq!(products.len(), 1);
}

#[tokio::test]
async fn test_incremental_cart_endpoints() {
    let ctx = TestContext::new().await;
    let item = CartItem {
        product_id: ProductId::new("A"),
        size: Some("M".to_owned()),
        color: None,
        quantity: 1,
        unit_price: Decimal::new(1000, 2),
        variant_stock: None,
        available_stock: None,
    };

    Mock::given(method("POST"))
        .and(path("/api/cart/item"))
        .and(body_json(json!({
            "productId": "A", "size": "M", "quantity": 1, "unitPrice": "10.00",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(
            json!({"items": [cart_item_json("A", 1, "10.00", None)]}),
        )))
        .expect(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/cart/item"))
        .and(body_json(json!({"productId": "A", "quantity": 3, "size": "M"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(
            json!({"items": [cart_item_json("A", 3, "10.00", None)]}),
        )))
        .expect(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/cart/item/A"))
        .and(body_json(json!({"size": "M"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(ok_envelope(json!({"items": []}))),
        )
        .expect(1)
        .mount(&ctx.server)
        .await;

    let after_add = ctx
        .state
        .api()
        .add_cart_item(&item)
        .await
        .expect("add succeeds");
    assert_eq!(after_add.len(), 1);

    let after_update = ctx
        .state
        .api()
        .update_cart_item(&CartItemUpdate {
            product_id: &item.product_id,
            quantity: 3,
            size: Some("M"),
            color: None,
        })
        .await
        .expect("update succeeds");
    assert_eq!(after_update[0].quantity, 3);

    let after_remove = ctx
        .state
        .api()
        .remove_cart_item(
            &item.product_id,
            &CartItemSelector {
                size: Some("M"),
                color: None,
            },
        )
        .await
        .expect("remove succeeds");
    assert!(after_remove.is_empty());
}
