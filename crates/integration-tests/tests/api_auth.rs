//! Registration, login, and token handling over HTTP.

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;

use integration_tests::api::{app, get, post};
use integration_tests::{block_user, memory_store, seed_user, token_for, TEST_PASSWORD};

#[tokio::test]
async fn register_then_me_round_trip() {
    let store = Arc::new(memory_store().await);
    let app = app(store);

    let (status, body) = post(
        &app,
        "/api/auth/register",
        None,
        Some(json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": "password123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["user"]["username"], json!("alice"));
    assert!(body["user"]["password"].is_null(), "hash must never serialize");

    let token = body["token"].as_str().expect("token").to_string();
    let (status, body) = get(&app, "/api/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], json!("alice@example.com"));
}

#[tokio::test]
async fn duplicate_username_conflicts() {
    let store = Arc::new(memory_store().await);
    seed_user(&store, "alice").await;
    let app = app(store);

    let (status, body) = post(
        &app,
        "/api/auth/register",
        None,
        Some(json!({
            "username": "alice",
            "email": "other@example.com",
            "password": "password123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn register_validates_shape() {
    let store = Arc::new(memory_store().await);
    let app = app(store);

    let (status, body) = post(
        &app,
        "/api/auth/register",
        None,
        Some(json!({
            "username": "al",
            "email": "not-an-email",
            "password": "x",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert!(body["errors"].as_array().is_some_and(|e| !e.is_empty()));
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let store = Arc::new(memory_store().await);
    seed_user(&store, "alice").await;
    let app = app(store);

    let (status, _) = post(
        &app,
        "/api/auth/login",
        None,
        Some(json!({ "email": "alice@example.com", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = post(
        &app,
        "/api/auth/login",
        None,
        Some(json!({ "email": "alice@example.com", "password": TEST_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].as_str().is_some());
}

#[tokio::test]
async fn blocked_accounts_cannot_authenticate() {
    let store = Arc::new(memory_store().await);
    let alice = seed_user(&store, "alice").await;
    block_user(&store, &alice).await;
    let token = token_for(&alice);
    let app = app(store);

    let (status, _) = post(
        &app,
        "/api/auth/login",
        None,
        Some(json!({ "email": "alice@example.com", "password": TEST_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // An existing token stops working too.
    let (status, _) = get(&app, "/api/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn missing_or_garbage_tokens_are_rejected() {
    let store = Arc::new(memory_store().await);
    let app = app(store);

    let (status, _) = get(&app, "/api/auth/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = get(&app, "/api/auth/me", Some("not-a-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
