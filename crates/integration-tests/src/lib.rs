//! Integration tests for GearShop.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! gearshop-cli migrate
//!
//! # Create an admin account for the admin tests
//! gearshop-cli admin create -e admin@gearshop.test -n "Admin" -p "admin-password-123"
//!
//! # Start the API server
//! cargo run -p gearshop-api
//!
//! # Run the ignored end-to-end tests
//! cargo test -p gearshop-integration-tests -- --ignored
//! ```
//!
//! Tests are `#[ignore]`d by default because they need a running server
//! and a migrated database.

use reqwest::Client;
use serde_json::Value;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("GEARSHOP_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Admin credentials used by the admin-side tests. The account must exist
/// (see crate docs).
#[must_use]
pub fn admin_credentials() -> (String, String) {
    let email = std::env::var("GEARSHOP_TEST_ADMIN_EMAIL")
        .unwrap_or_else(|_| "admin@gearshop.test".to_string());
    let password = std::env::var("GEARSHOP_TEST_ADMIN_PASSWORD")
        .unwrap_or_else(|_| "admin-password-123".to_string());
    (email, password)
}

/// A plain HTTP client.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .build()
        .expect("Failed to create HTTP client")
}

/// Log in and return the bearer token.
///
/// # Panics
///
/// Panics when the login request fails or returns no token.
pub async fn login(client: &Client, email: &str, password: &str) -> String {
    let resp = client
        .post(format!("{}/api/auth/login", base_url()))
        .json(&serde_json::json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to send login request");
    assert!(
        resp.status().is_success(),
        "login failed with {}",
        resp.status()
    );

    let body: Value = resp.json().await.expect("Failed to parse login response");
    body["token"]
        .as_str()
        .expect("login response has no token")
        .to_string()
}

/// Log in as the test admin and return the bearer token.
pub async fn admin_token(client: &Client) -> String {
    let (email, password) = admin_credentials();
    login(client, &email, &password).await
}

/// Register a throwaway customer account; returns (email, token).
pub async fn register_customer(client: &Client) -> (String, String) {
    let email = format!("khach-{}@gearshop.test", uuid::Uuid::new_v4());
    let resp = client
        .post(format!("{}/api/auth/register", base_url()))
        .json(&serde_json::json!({
            "email": email,
            "password": "customer-password-123",
            "full_name": "Khách kiểm thử",
        }))
        .send()
        .await
        .expect("Failed to send register request");
    assert_eq!(resp.status(), 201, "register failed");

    let body: Value = resp.json().await.expect("Failed to parse register response");
    let token = body["token"]
        .as_str()
        .expect("register response has no token")
        .to_string();
    (email, token)
}

/// Create a product via the admin API; returns the response body.
pub async fn create_test_product(client: &Client, token: &str, price: i64, stock: i64) -> Value {
    let code = format!("TEST-{}", uuid::Uuid::new_v4());
    let resp = client
        .post(format!("{}/api/products", base_url()))
        .bearer_auth(token)
        .json(&serde_json::json!({
            "product_code": code,
            "name": format!("Sản phẩm kiểm thử {code}"),
            "slug": format!("san-pham-{}", code.to_lowercase()),
            "price": price,
            "stock": stock,
        }))
        .send()
        .await
        .expect("Failed to create test product");
    assert_eq!(resp.status(), 201, "product create failed");
    resp.json().await.expect("Failed to parse product response")
}
