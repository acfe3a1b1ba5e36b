//! Upload credential API integration tests.
//!
//! Run with: `cargo test -p vidrop-api --test presigned_url_test`
//! Requires Docker for testcontainers (Postgres).

mod helpers;

use helpers::auth::{create_test_user, token_for_unknown_user};
use helpers::{api_path, setup_test_app};
use serde_json::json;

#[tokio::test]
async fn test_presigned_url_issues_scoped_put_url() {
    let app = setup_test_app().await;
    let client = app.client();
    let user = create_test_user(app.pool()).await;

    let response = client
        .post(&api_path("/video/presigned_url"))
        .add_header("Authorization", format!("Bearer {}", user.token))
        .json(&json!({ "filePath": "ride.mp4" }))
        .await;

    assert_eq!(response.status_code(), 200);
    let data: serde_json::Value = response.json();

    let file_name = data["fileName"].as_str().expect("fileName present");
    let (timestamp, original) = file_name
        .split_once('_')
        .expect("fileName should be {timestamp}_{filePath}");
    assert!(timestamp.parse::<i64>().is_ok(), "bad prefix: {}", timestamp);
    assert_eq!(original, "ride.mp4");

    let presigned_url = data["presignedUrl"].as_str().expect("presignedUrl present");
    assert!(
        presigned_url.contains(&format!("/users/{}/uploads/", user.user_id)),
        "URL should target the caller's upload prefix: {}",
        presigned_url
    );
    assert!(presigned_url.ends_with(file_name));
}

#[tokio::test]
async fn test_presigned_url_filenames_unique_across_requests() {
    let app = setup_test_app().await;
    let client = app.client();
    let user = create_test_user(app.pool()).await;

    let mut file_names = Vec::new();
    for _ in 0..2 {
        let response = client
            .post(&api_path("/video/presigned_url"))
            .add_header("Authorization", format!("Bearer {}", user.token))
            .json(&json!({ "filePath": "ride.mp4" }))
            .await;
        assert_eq!(response.status_code(), 200);
        let data: serde_json::Value = response.json();
        file_names.push(data["fileName"].as_str().unwrap().to_string());
        // The timestamp prefix has millisecond resolution.
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    assert_ne!(file_names[0], file_names[1]);
}

#[tokio::test]
async fn test_presigned_url_missing_file_path() {
    let app = setup_test_app().await;
    let client = app.client();
    let user = create_test_user(app.pool()).await;

    let response = client
        .post(&api_path("/video/presigned_url"))
        .add_header("Authorization", format!("Bearer {}", user.token))
        .json(&json!({}))
        .await;

    assert_eq!(response.status_code(), 400);
    let data: serde_json::Value = response.json();
    assert_eq!(data["error"], "File path is required");
}

#[tokio::test]
async fn test_presigned_url_empty_file_path() {
    let app = setup_test_app().await;
    let client = app.client();
    let user = create_test_user(app.pool()).await;

    let response = client
        .post(&api_path("/video/presigned_url"))
        .add_header("Authorization", format!("Bearer {}", user.token))
        .json(&json!({ "filePath": "" }))
        .await;

    assert_eq!(response.status_code(), 400);
    let data: serde_json::Value = response.json();
    assert_eq!(data["error"], "File path is required");
}

#[tokio::test]
async fn test_presigned_url_unknown_user() {
    let app = setup_test_app().await;
    let client = app.client();

    // Valid token, but the subject was never provisioned in the users table.
    let response = client
        .post(&api_path("/video/presigned_url"))
        .add_header("Authorization", format!("Bearer {}", token_for_unknown_user()))
        .json(&json!({ "filePath": "ride.mp4" }))
        .await;

    assert_eq!(response.status_code(), 404);
    let data: serde_json::Value = response.json();
    assert_eq!(data["error"], "User not found");
}

#[tokio::test]
async fn test_presigned_url_requires_auth() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client
        .post(&api_path("/video/presigned_url"))
        .json(&json!({ "filePath": "ride.mp4" }))
        .await;

    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn test_legacy_presigned_url_uses_exact_key() {
    let app = setup_test_app().await;
    let client = app.client();
    let user = create_test_user(app.pool()).await;

    let response = client
        .get(&api_path("/video/presigned_url"))
        .add_query_param("filePath", "intro.mp4")
        .add_header("Authorization", format!("Bearer {}", user.token))
        .await;

    assert_eq!(response.status_code(), 200);
    let data: serde_json::Value = response.json();

    let presigned_url = data["presignedUrl"].as_str().expect("presignedUrl present");
    assert!(
        presigned_url.ends_with(&format!("/users/{}/intro.mp4", user.user_id)),
        "URL should address the exact key with no timestamp: {}",
        presigned_url
    );
    assert!(!presigned_url.contains("/uploads/"));
    assert!(data.get("fileName").is_none());
}

#[tokio::test]
async fn test_legacy_presigned_url_requires_file_path() {
    let app = setup_test_app().await;
    let client = app.client();
    let user = create_test_user(app.pool()).await;

    let response = client
        .get(&api_path("/video/presigned_url"))
        .add_header("Authorization", format!("Bearer {}", user.token))
        .await;

    assert_eq!(response.status_code(), 400);
    let data: serde_json::Value = response.json();
    assert_eq!(data["error"], "File path is required");
}

#[tokio::test]
async fn test_legacy_presigned_url_unknown_user() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client
        .get(&api_path("/video/presigned_url"))
        .add_query_param("filePath", "intro.mp4")
        .add_header("Authorization", format!("Bearer {}", token_for_unknown_user()))
        .await;

    assert_eq!(response.status_code(), 404);
    let data: serde_json::Value = response.json();
    assert_eq!(data["error"], "User not found");
}
