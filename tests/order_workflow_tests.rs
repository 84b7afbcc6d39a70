use axum::http::StatusCode;
use serde_json::json;

use storefront::product::repository::ProductRepository;

mod utils;

use utils::*;

fn storefront_setup() -> TestSetup {
    TestSetupBuilder::new()
        .with_default_customers()
        .with_products(12)
        .with_default_addresses()
        .build()
}

#[tokio::test]
async fn test_place_order_prices_lines_and_starts_pending() {
    let setup = storefront_setup();
    let authorization = setup.login_as("alice", "correct").await;

    let response = setup
        .place_order(
            json!({
                "addressId": 1,
                "items": [
                    { "productId": 2, "quantity": 3 },
                    { "productId": 5, "quantity": 1 }
                ]
            }),
            Some(&authorization),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.success());

    let order = &response.body["data"];
    assert_eq!(order["customerId"], 1);
    assert_eq!(order["addressId"], 1);
    assert_eq!(order["status"], "PENDING");
    // 3 x 20_000 + 1 x 50_000
    assert_eq!(order["total"], 110_000);
    assert_eq!(order["lines"].as_array().unwrap().len(), 2);
    assert_eq!(order["lines"][0]["unitPrice"], 20_000);
    assert!(order["code"].as_str().is_some());
    assert_eq!(setup.order_repository.order_count(), 1);
}

#[tokio::test]
async fn test_orders_require_a_session() {
    let setup = storefront_setup();

    let response = setup
        .place_order(
            json!({ "addressId": 1, "items": [{ "productId": 1, "quantity": 1 }] }),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = setup.list_orders(Some("Bearer not-a-session")).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    assert_eq!(setup.order_repository.order_count(), 0);
}

#[tokio::test]
async fn test_logged_out_session_cannot_place_orders() {
    let setup = storefront_setup();
    let authorization = setup.login_as("alice", "correct").await;
    setup.logout(Some(&authorization)).await;

    let response = setup
        .place_order(
            json!({ "addressId": 1, "items": [{ "productId": 1, "quantity": 1 }] }),
            Some(&authorization),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(setup.order_repository.order_count(), 0);
}

#[tokio::test]
async fn test_unknown_product_rejects_whole_order() {
    let setup = storefront_setup();
    let authorization = setup.login_as("alice", "correct").await;

    let response = setup
        .place_order(
            json!({
                "addressId": 1,
                "items": [
                    { "productId": 1, "quantity": 1 },
                    { "productId": 999, "quantity": 1 }
                ]
            }),
            Some(&authorization),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.message(), "Product 999 not found");
    assert_eq!(setup.order_repository.order_count(), 0);
}

#[tokio::test]
async fn test_unknown_address_is_not_found() {
    let setup = storefront_setup();
    let authorization = setup.login_as("alice", "correct").await;

    let response = setup
        .place_order(
            json!({ "addressId": 42, "items": [{ "productId": 1, "quantity": 1 }] }),
            Some(&authorization),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.message(), "Address not found");
}

#[tokio::test]
async fn test_empty_order_is_a_validation_error() {
    let setup = storefront_setup();
    let authorization = setup.login_as("alice", "correct").await;

    let response = setup
        .place_order(json!({ "addressId": 1, "items": [] }), Some(&authorization))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.message(),
        &json!(["Order must contain at least one item"])
    );
}

#[tokio::test]
async fn test_item_quantity_out_of_range_is_a_validation_error() {
    let setup = storefront_setup();
    let authorization = setup.login_as("alice", "correct").await;

    let response = setup
        .place_order(
            json!({ "addressId": 1, "items": [{ "productId": 1, "quantity": 0 }] }),
            Some(&authorization),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.message(),
        &json!(["Quantity must be between 1 and 1000"])
    );
}

#[tokio::test]
async fn test_order_history_is_per_customer_and_newest_first() {
    let setup = storefront_setup();
    let alice = setup.login_as("alice", "correct").await;
    let bob = setup.login_as("bob", "hunter22").await;

    for product_id in [1, 2] {
        let response = setup
            .place_order(
                json!({ "addressId": 2, "items": [{ "productId": product_id, "quantity": 1 }] }),
                Some(&alice),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }
    setup
        .place_order(
            json!({ "addressId": 1, "items": [{ "productId": 3, "quantity": 2 }] }),
            Some(&bob),
        )
        .await;

    let response = setup.list_orders(Some(&alice)).await;
    assert_eq!(response.status, StatusCode::OK);
    let orders = response.body["data"].as_array().unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0]["lines"][0]["productId"], 2);
    assert_eq!(orders[1]["lines"][0]["productId"], 1);
    assert!(orders.iter().all(|order| order["customerId"] == 1));

    let response = setup.list_orders(Some(&bob)).await;
    let orders = response.body["data"].as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["total"], 60_000);
}

#[tokio::test]
async fn test_catalog_browsing_is_public() {
    let setup = storefront_setup();

    let latest = setup
        .send("GET", "/api/v1/products/latest", None, None)
        .await;
    assert_eq!(latest.status, StatusCode::OK);
    let products = latest.body["data"].as_array().unwrap();
    assert_eq!(products.len(), 8);
    assert_eq!(products[0]["id"], 12);

    let page = setup
        .send(
            "GET",
            "/api/v1/products?perPage=5&currentPage=3",
            None,
            None,
        )
        .await;
    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(page.body["data"]["total"], 12);
    assert_eq!(page.body["data"]["products"].as_array().unwrap().len(), 2);

    let addresses = setup.send("GET", "/api/v1/addresses", None, None).await;
    assert_eq!(addresses.status, StatusCode::OK);
    assert_eq!(addresses.body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_product_update_requires_a_session() {
    let setup = storefront_setup();
    let update = json!({
        "name": "Renamed",
        "description": "Fresh stock",
        "price": 12_345,
        "quantity": 7
    });

    let response = setup
        .send("PUT", "/api/v1/products/3", Some(update.clone()), None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let authorization = setup.login_as("alice", "correct").await;
    let response = setup
        .send(
            "PUT",
            "/api/v1/products/3",
            Some(update),
            Some(&authorization),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.success());

    let product = setup
        .product_repository
        .get_product(3)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(product.name, "Renamed");
    assert_eq!(product.price, 12_345);

    let detail = setup
        .send("GET", "/api/v1/products/3", None, None)
        .await;
    assert_eq!(detail.body["data"]["quantity"], 7);
}

#[tokio::test]
async fn test_order_uses_price_at_time_of_purchase() {
    let setup = storefront_setup();
    let authorization = setup.login_as("alice", "correct").await;

    setup
        .place_order(
            json!({ "addressId": 1, "items": [{ "productId": 4, "quantity": 1 }] }),
            Some(&authorization),
        )
        .await;
    setup
        .send(
            "PUT",
            "/api/v1/products/4",
            Some(json!({ "name": "Product 4", "price": 1, "quantity": 1 })),
            Some(&authorization),
        )
        .await;

    let response = setup.list_orders(Some(&authorization)).await;
    let orders = response.body["data"].as_array().unwrap();
    assert_eq!(orders[0]["total"], 40_000);
    assert_eq!(orders[0]["lines"][0]["unitPrice"], 40_000);
}

#[tokio::test]
async fn test_order_total_beyond_range_is_a_validation_error() {
    let setup = storefront_setup();
    let authorization = setup.login_as("alice", "correct").await;

    let response = setup
        .send(
            "PUT",
            "/api/v1/products/1",
            Some(json!({ "name": "Gold bar", "price": 9_000_000_000_000_000_000i64, "quantity": 5 })),
            Some(&authorization),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = setup
        .place_order(
            json!({ "addressId": 1, "items": [{ "productId": 1, "quantity": 2 }] }),
            Some(&authorization),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), &json!(["Order total is too large"]));
    assert_eq!(setup.order_repository.order_count(), 0);
}

#[tokio::test]
async fn test_order_without_body_is_a_validation_error() {
    let setup = storefront_setup();
    let authorization = setup.login_as("alice", "correct").await;

    let response = setup
        .send("POST", "/api/v1/orders", None, Some(&authorization))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(!response.success());
    assert_eq!(response.message().as_array().unwrap().len(), 1);
}
