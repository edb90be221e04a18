//! Authentication and account tests.

use gearshop_integration_tests::{base_url, client, login, register_customer};
use reqwest::StatusCode;
use serde_json::{Value, json};

// ==== Registration & Login ====

#[tokio::test]
#[ignore = "Requires running gearshop-api server and database"]
async fn register_then_me_returns_profile() {
    let client = client();
    let (email, token) = register_customer(&client).await;

    let resp = client
        .get(format!("{}/api/auth/me", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["email"], email.as_str());
    assert_eq!(body["role"], "customer");
    // The password hash must never leak into API responses.
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
#[ignore = "Requires running gearshop-api server and database"]
async fn duplicate_email_is_conflict() {
    let client = client();
    let (email, _token) = register_customer(&client).await;

    let resp = client
        .post(format!("{}/api/auth/register", base_url()))
        .json(&json!({
            "email": email,
            "password": "another-password-123",
            "full_name": "Người trùng email",
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["error"]["code"], "conflict");
}

#[tokio::test]
#[ignore = "Requires running gearshop-api server and database"]
async fn login_with_wrong_password_is_unauthorized() {
    let client = client();
    let (email, _token) = register_customer(&client).await;

    let resp = client
        .post(format!("{}/api/auth/login", base_url()))
        .json(&json!({ "email": email, "password": "wrong-password-123" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running gearshop-api server and database"]
async fn short_password_is_rejected() {
    let client = client();
    let resp = client
        .post(format!("{}/api/auth/register", base_url()))
        .json(&json!({
            "email": format!("ngan-{}@gearshop.test", uuid::Uuid::new_v4()),
            "password": "ngan",
            "full_name": "Mật khẩu ngắn",
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ==== Sessions ====

#[tokio::test]
#[ignore = "Requires running gearshop-api server and database"]
async fn logout_revokes_token() {
    let client = client();
    let (_email, token) = register_customer(&client).await;

    let resp = client
        .post(format!("{}/api/auth/logout", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .get(format!("{}/api/auth/me", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running gearshop-api server and database"]
async fn missing_token_is_unauthorized() {
    let client = client();
    let resp = client
        .get(format!("{}/api/auth/me", base_url()))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["error"]["code"], "unauthorized");
}

#[tokio::test]
#[ignore = "Requires running gearshop-api server and database"]
async fn garbage_token_is_unauthorized() {
    let client = client();
    let resp = client
        .get(format!("{}/api/auth/me", base_url()))
        .bearer_auth("khong-phai-token")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["error"]["code"], "unauthorized");
}

// ==== Profile & Password ====

#[tokio::test]
#[ignore = "Requires running gearshop-api server and database"]
async fn profile_update_persists() {
    let client = client();
    let (_email, token) = register_customer(&client).await;

    let resp = client
        .put(format!("{}/api/auth/me", base_url()))
        .bearer_auth(&token)
        .json(&json!({
            "full_name": "Nguyễn Văn B",
            "phone": "0909123456",
            "address": "123 Lê Lợi, Quận 1, TP.HCM",
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["full_name"], "Nguyễn Văn B");
    assert_eq!(body["phone"], "0909123456");
}

#[tokio::test]
#[ignore = "Requires running gearshop-api server and database"]
async fn password_change_revokes_other_sessions() {
    let client = client();
    let (email, token) = register_customer(&client).await;
    let other_token = login(&client, &email, "customer-password-123").await;

    let resp = client
        .put(format!("{}/api/auth/password", base_url()))
        .bearer_auth(&token)
        .json(&json!({
            "current_password": "customer-password-123",
            "new_password": "new-password-456",
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // All previously issued tokens stop working.
    let resp = client
        .get(format!("{}/api/auth/me", base_url()))
        .bearer_auth(&other_token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // The new password logs in.
    let _new_token = login(&client, &email, "new-password-456").await;
}

#[tokio::test]
#[ignore = "Requires running gearshop-api server and database"]
async fn password_change_with_wrong_current_fails() {
    let client = client();
    let (_email, token) = register_customer(&client).await;

    let resp = client
        .put(format!("{}/api/auth/password", base_url()))
        .bearer_auth(&token)
        .json(&json!({
            "current_password": "sai-mat-khau-roi",
            "new_password": "new-password-456",
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
