//! PC builder compatibility check tests.

use gearshop_integration_tests::{admin_token, base_url, client};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

/// Create a component product with specifications; returns its id.
async fn create_component(
    client: &Client,
    token: &str,
    kind: &str,
    price: i64,
    specs: Value,
) -> i64 {
    let code = format!("PC-{}", uuid::Uuid::new_v4());
    let resp = client
        .post(format!("{}/api/products", base_url()))
        .bearer_auth(token)
        .json(&json!({
            "product_code": code,
            "name": format!("Linh kiện {kind} {code}"),
            "slug": format!("linh-kien-{}", code.to_lowercase()),
            "price": price,
            "stock": 10,
            "component_kind": kind,
            "specifications": specs,
        }))
        .send()
        .await
        .expect("Failed to create component");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.expect("Failed to parse component");
    body["id"].as_i64().expect("missing id")
}

async fn check(client: &Client, product_ids: &[i64]) -> Value {
    let resp = client
        .post(format!("{}/api/pc-builder/check", base_url()))
        .json(&json!({ "product_ids": product_ids }))
        .send()
        .await
        .expect("Failed to send build check");
    assert_eq!(resp.status(), StatusCode::OK);
    resp.json().await.expect("Failed to parse build report")
}

#[tokio::test]
#[ignore = "Requires running gearshop-api server and database"]
async fn matching_sockets_are_compatible() {
    let client = client();
    let admin = admin_token(&client).await;

    let cpu = create_component(
        &client,
        &admin,
        "cpu",
        5_000_000,
        json!([
            { "name": "Socket", "value": "AM5" },
            { "name": "TDP", "value": "105W" },
        ]),
    )
    .await;
    let mainboard = create_component(
        &client,
        &admin,
        "motherboard",
        3_000_000,
        json!([
            { "name": "Socket", "value": "AM5" },
            { "name": "Bộ nhớ", "value": "DDR5" },
        ]),
    )
    .await;

    let report = check(&client, &[cpu, mainboard]).await;
    assert_eq!(report["compatible"], true);
    assert_eq!(report["issues"].as_array().map(Vec::len), Some(0));
    assert_eq!(report["total_price"], 8_000_000);
}

#[tokio::test]
#[ignore = "Requires running gearshop-api server and database"]
async fn mismatched_sockets_are_flagged() {
    let client = client();
    let admin = admin_token(&client).await;

    let cpu = create_component(
        &client,
        &admin,
        "cpu",
        8_000_000,
        json!([{ "name": "Socket", "value": "LGA1700" }]),
    )
    .await;
    let mainboard = create_component(
        &client,
        &admin,
        "motherboard",
        2_500_000,
        json!([{ "name": "Socket", "value": "AM5" }]),
    )
    .await;

    let report = check(&client, &[cpu, mainboard]).await;
    assert_eq!(report["compatible"], false);
    assert!(report["issues"].as_array().is_some_and(|i| !i.is_empty()));
}

#[tokio::test]
#[ignore = "Requires running gearshop-api server and database"]
async fn psu_recommendation_includes_headroom() {
    let client = client();
    let admin = admin_token(&client).await;

    let cpu = create_component(
        &client,
        &admin,
        "cpu",
        4_000_000,
        json!([{ "name": "TDP", "value": "125W" }]),
    )
    .await;
    let gpu = create_component(
        &client,
        &admin,
        "gpu",
        15_000_000,
        json!([{ "name": "TDP", "value": "220W" }]),
    )
    .await;

    let report = check(&client, &[cpu, gpu]).await;
    assert_eq!(report["estimated_draw_w"], 345);
    assert!(
        report["recommended_psu_w"]
            .as_u64()
            .is_some_and(|w| w > 345)
    );
}

#[tokio::test]
#[ignore = "Requires running gearshop-api server and database"]
async fn non_component_product_is_rejected() {
    let client = client();
    let admin = admin_token(&client).await;
    let plain =
        gearshop_integration_tests::create_test_product(&client, &admin, 1_000_000, 5).await;
    let plain_id = plain["id"].as_i64().expect("missing id");

    let resp = client
        .post(format!("{}/api/pc-builder/check", base_url()))
        .json(&json!({ "product_ids": [plain_id] }))
        .send()
        .await
        .expect("Failed to send build check");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running gearshop-api server and database"]
async fn empty_build_is_rejected() {
    let client = client();
    let resp = client
        .post(format!("{}/api/pc-builder/check", base_url()))
        .json(&json!({ "product_ids": [] }))
        .send()
        .await
        .expect("Failed to send build check");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running gearshop-api server and database"]
async fn unknown_component_is_not_found() {
    let client = client();
    let resp = client
        .post(format!("{}/api/pc-builder/check", base_url()))
        .json(&json!({ "product_ids": [999_999_999] }))
        .send()
        .await
        .expect("Failed to send build check");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
