//! Bearer token middleware integration tests.
//!
//! Run with: `cargo test -p vidrop-api --test auth_test`
//! Requires Docker for testcontainers (Postgres).

mod helpers;

use helpers::auth::{create_test_user, TEST_JWT_SECRET};
use helpers::{api_path, setup_test_app};
use vidrop_api::auth::JwtService;

#[tokio::test]
async fn test_rejects_malformed_authorization_header() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client
        .get(&api_path("/video"))
        .add_header("Authorization", "Token abc123")
        .await;
    assert_eq!(response.status_code(), 401);
    let data: serde_json::Value = response.json();
    assert_eq!(data["error"], "Invalid authorization header format");

    let response = client
        .get(&api_path("/video"))
        .add_header("Authorization", "Bearer")
        .await;
    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn test_rejects_invalid_token() {
    let app = setup_test_app().await;
    let client = app.client();
    let user = create_test_user(app.pool()).await;

    let response = client
        .get(&api_path("/video"))
        .add_header("Authorization", "Bearer not.a.jwt")
        .await;
    assert_eq!(response.status_code(), 401);
    let data: serde_json::Value = response.json();
    assert_eq!(data["error"], "Invalid or expired token");

    // Well-formed token signed with the wrong secret.
    let forged = JwtService::new("wrong-secret-but-still-32-characters-long", 24)
        .issue(user.user_id, &user.email)
        .expect("issue forged token");
    let response = client
        .get(&api_path("/video"))
        .add_header("Authorization", format!("Bearer {}", forged))
        .await;
    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn test_rejects_expired_token() {
    let app = setup_test_app().await;
    let client = app.client();
    let user = create_test_user(app.pool()).await;

    let expired = JwtService::new(TEST_JWT_SECRET, -1)
        .issue(user.user_id, &user.email)
        .expect("issue expired token");

    let response = client
        .get(&api_path("/video"))
        .add_header("Authorization", format!("Bearer {}", expired))
        .await;

    assert_eq!(response.status_code(), 401);
    let data: serde_json::Value = response.json();
    assert_eq!(data["error"], "Token has expired");
}
