//! Order lifecycle tests: checkout, tracking, and status transitions.

use gearshop_integration_tests::{
    admin_token, base_url, client, create_test_product, register_customer,
};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

fn checkout_body(product_id: i64, quantity: i64) -> Value {
    json!({
        "customer_name": "Trần Thị C",
        "customer_phone": "0912345678",
        "customer_email": "tran.c@gearshop.test",
        "shipping_address": "45 Nguyễn Huệ, Quận 1, TP.HCM",
        "items": [{ "product_id": product_id, "quantity": quantity }],
    })
}

async fn checkout(client: &Client, token: Option<&str>, body: &Value) -> reqwest::Response {
    let mut req = client.post(format!("{}/api/orders", base_url())).json(body);
    if let Some(token) = token {
        req = req.bearer_auth(token);
    }
    req.send().await.expect("Failed to send checkout request")
}

// ==== Checkout ====

#[tokio::test]
#[ignore = "Requires running gearshop-api server and database"]
async fn guest_checkout_and_tracking() {
    let client = client();
    let admin = admin_token(&client).await;
    let product = create_test_product(&client, &admin, 5_000_000, 10).await;
    let product_id = product["id"].as_i64().expect("missing id");

    let resp = checkout(&client, None, &checkout_body(product_id, 2)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let order: Value = resp.json().await.expect("Failed to parse order");
    let code = order["code"].as_str().expect("missing order code");
    assert!(code.starts_with("GS-"));
    assert_eq!(order["status"], "pending");
    assert_eq!(order["subtotal"], 10_000_000);

    // Anyone holding the code can track it.
    let resp = client
        .get(format!("{}/api/orders/track/{code}", base_url()))
        .send()
        .await
        .expect("Failed to send track request");
    assert_eq!(resp.status(), StatusCode::OK);

    let tracked: Value = resp.json().await.expect("Failed to parse tracked order");
    assert_eq!(tracked["code"], code);
    assert_eq!(tracked["items"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
#[ignore = "Requires running gearshop-api server and database"]
async fn checkout_decrements_stock() {
    let client = client();
    let admin = admin_token(&client).await;
    let product = create_test_product(&client, &admin, 1_500_000, 8).await;
    let product_id = product["id"].as_i64().expect("missing id");

    let resp = checkout(&client, None, &checkout_body(product_id, 3)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = client
        .get(format!("{}/api/products/{product_id}", base_url()))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["stock"], 5);
    assert_eq!(body["sold"], 3);
}

#[tokio::test]
#[ignore = "Requires running gearshop-api server and database"]
async fn checkout_beyond_stock_is_conflict() {
    let client = client();
    let admin = admin_token(&client).await;
    let product = create_test_product(&client, &admin, 900_000, 2).await;
    let product_id = product["id"].as_i64().expect("missing id");

    let resp = checkout(&client, None, &checkout_body(product_id, 5)).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running gearshop-api server and database"]
async fn duplicate_lines_count_against_stock_together() {
    let client = client();
    let admin = admin_token(&client).await;
    let product = create_test_product(&client, &admin, 1_000_000, 5).await;
    let product_id = product["id"].as_i64().expect("missing id");

    // Each line fits the stock on its own; together they do not.
    let body = json!({
        "customer_name": "Trần Thị C",
        "customer_phone": "0912345678",
        "shipping_address": "45 Nguyễn Huệ, Quận 1, TP.HCM",
        "items": [
            { "product_id": product_id, "quantity": 4 },
            { "product_id": product_id, "quantity": 4 },
        ],
    });
    let resp = checkout(&client, None, &body).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let error: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(error["error"]["code"], "conflict");

    // The rejected order left the stock untouched.
    let resp = client
        .get(format!("{}/api/products/{product_id}", base_url()))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["stock"], 5);
}

#[tokio::test]
#[ignore = "Requires running gearshop-api server and database"]
async fn duplicate_lines_are_merged_at_checkout() {
    let client = client();
    let admin = admin_token(&client).await;
    let product = create_test_product(&client, &admin, 1_000_000, 10).await;
    let product_id = product["id"].as_i64().expect("missing id");

    let body = json!({
        "customer_name": "Trần Thị C",
        "customer_phone": "0912345678",
        "shipping_address": "45 Nguyễn Huệ, Quận 1, TP.HCM",
        "items": [
            { "product_id": product_id, "quantity": 2 },
            { "product_id": product_id, "quantity": 4 },
        ],
    });
    let resp = checkout(&client, None, &body).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let order: Value = resp.json().await.expect("Failed to parse order");
    assert_eq!(order["subtotal"], 6_000_000);
    let items = order["items"].as_array().expect("items should be an array");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], 6);

    let resp = client
        .get(format!("{}/api/products/{product_id}", base_url()))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["stock"], 4);
    assert_eq!(body["sold"], 6);
}

#[tokio::test]
#[ignore = "Requires running gearshop-api server and database"]
async fn empty_cart_checkout_is_rejected() {
    let client = client();
    let resp = checkout(
        &client,
        None,
        &json!({
            "customer_name": "Trần Thị C",
            "customer_phone": "0912345678",
            "shipping_address": "45 Nguyễn Huệ, Quận 1, TP.HCM",
            "items": [],
        }),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running gearshop-api server and database"]
async fn account_checkout_appears_in_history() {
    let client = client();
    let admin = admin_token(&client).await;
    let (_email, token) = register_customer(&client).await;
    let product = create_test_product(&client, &admin, 4_000_000, 5).await;
    let product_id = product["id"].as_i64().expect("missing id");

    let resp = checkout(&client, Some(&token), &checkout_body(product_id, 1)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let order: Value = resp.json().await.expect("Failed to parse order");

    let resp = client
        .get(format!("{}/api/orders", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::OK);

    let history: Value = resp.json().await.expect("Failed to parse history");
    let codes: Vec<&str> = history["data"]
        .as_array()
        .expect("data should be an array")
        .iter()
        .filter_map(|o| o["code"].as_str())
        .collect();
    assert!(codes.contains(&order["code"].as_str().expect("missing code")));
}

#[tokio::test]
#[ignore = "Requires running gearshop-api server and database"]
async fn customers_cannot_read_others_orders() {
    let client = client();
    let admin = admin_token(&client).await;
    let (_owner_email, owner) = register_customer(&client).await;
    let (_other_email, other) = register_customer(&client).await;
    let product = create_test_product(&client, &admin, 700_000, 5).await;
    let product_id = product["id"].as_i64().expect("missing id");

    let resp = checkout(&client, Some(&owner), &checkout_body(product_id, 1)).await;
    let order: Value = resp.json().await.expect("Failed to parse order");
    let order_id = order["id"].as_i64().expect("missing id");

    // Another customer gets a 404, not a 403, so order IDs cannot be probed.
    let resp = client
        .get(format!("{}/api/orders/{order_id}", base_url()))
        .bearer_auth(&other)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ==== Status Transitions ====

async fn set_status(client: &Client, admin: &str, order_id: i64, status: &str) -> reqwest::Response {
    client
        .put(format!("{}/api/orders/{order_id}/status", base_url()))
        .bearer_auth(admin)
        .json(&json!({ "status": status }))
        .send()
        .await
        .expect("Failed to send status update")
}

#[tokio::test]
#[ignore = "Requires running gearshop-api server and database"]
async fn full_lifecycle_to_delivered() {
    let client = client();
    let admin = admin_token(&client).await;
    let product = create_test_product(&client, &admin, 6_000_000, 4).await;
    let product_id = product["id"].as_i64().expect("missing id");

    let resp = checkout(&client, None, &checkout_body(product_id, 1)).await;
    let order: Value = resp.json().await.expect("Failed to parse order");
    let order_id = order["id"].as_i64().expect("missing id");

    for status in ["confirmed", "shipping", "delivered"] {
        let resp = set_status(&client, &admin, order_id, status).await;
        assert_eq!(resp.status(), StatusCode::OK, "transition to {status}");
        let body: Value = resp.json().await.expect("Failed to parse body");
        assert_eq!(body["status"], status);
    }

    // Delivered is terminal.
    let resp = set_status(&client, &admin, order_id, "cancelled").await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
#[ignore = "Requires running gearshop-api server and database"]
async fn skipping_a_state_is_unprocessable() {
    let client = client();
    let admin = admin_token(&client).await;
    let product = create_test_product(&client, &admin, 2_200_000, 4).await;
    let product_id = product["id"].as_i64().expect("missing id");

    let resp = checkout(&client, None, &checkout_body(product_id, 1)).await;
    let order: Value = resp.json().await.expect("Failed to parse order");
    let order_id = order["id"].as_i64().expect("missing id");

    // pending -> delivered skips confirmed and shipping.
    let resp = set_status(&client, &admin, order_id, "delivered").await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["error"]["code"], "unprocessable");
}

#[tokio::test]
#[ignore = "Requires running gearshop-api server and database"]
async fn cancel_restores_stock() {
    let client = client();
    let admin = admin_token(&client).await;
    let product = create_test_product(&client, &admin, 3_300_000, 6).await;
    let product_id = product["id"].as_i64().expect("missing id");

    let resp = checkout(&client, None, &checkout_body(product_id, 4)).await;
    let order: Value = resp.json().await.expect("Failed to parse order");
    let order_id = order["id"].as_i64().expect("missing id");

    let resp = set_status(&client, &admin, order_id, "cancelled").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{}/api/products/{product_id}", base_url()))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["stock"], 6);
    assert_eq!(body["sold"], 0);
}

#[tokio::test]
#[ignore = "Requires running gearshop-api server and database"]
async fn status_update_on_unknown_order_is_not_found() {
    let client = client();
    let admin = admin_token(&client).await;

    let resp = set_status(&client, &admin, 999_999_999, "confirmed").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running gearshop-api server and database"]
async fn status_update_requires_admin() {
    let client = client();
    let admin = admin_token(&client).await;
    let (_email, customer) = register_customer(&client).await;
    let product = create_test_product(&client, &admin, 800_000, 2).await;
    let product_id = product["id"].as_i64().expect("missing id");

    let resp = checkout(&client, Some(&customer), &checkout_body(product_id, 1)).await;
    let order: Value = resp.json().await.expect("Failed to parse order");
    let order_id = order["id"].as_i64().expect("missing id");

    let resp = set_status(&client, &customer, order_id, "confirmed").await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
