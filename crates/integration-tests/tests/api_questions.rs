//! Question endpoints over HTTP.

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;

use integration_tests::api::{app, get, post};
use integration_tests::{memory_store, seed_user, token_for};

fn valid_question() -> serde_json::Value {
    json!({
        "title": "How do borrow checker errors work?",
        "description": "<p>This description is definitely long enough to pass.</p>",
        "tags": ["Rust", "borrow-checker"],
    })
}

#[tokio::test]
async fn creating_requires_authentication() {
    let store = Arc::new(memory_store().await);
    let app = app(store);

    let (status, _) = post(&app, "/api/questions", None, Some(valid_question())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_normalizes_tags_and_reports_the_question() {
    let store = Arc::new(memory_store().await);
    let alice = seed_user(&store, "alice").await;
    let token = token_for(&alice);
    let app = app(store);

    let (status, body) = post(&app, "/api/questions", Some(&token), Some(valid_question())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["question"]["tags"], json!(["rust", "borrow-checker"]));
    assert_eq!(body["question"]["author"]["username"], json!("alice"));
    assert_eq!(body["question"]["voteCount"], json!(0));
}

#[tokio::test]
async fn create_rejects_a_short_title_with_field_errors() {
    let store = Arc::new(memory_store().await);
    let alice = seed_user(&store, "alice").await;
    let token = token_for(&alice);
    let app = app(store);

    let mut body = valid_question();
    body["title"] = json!("short");
    let (status, body) = post(&app, "/api/questions", Some(&token), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert!(body["errors"].as_array().is_some_and(|e| !e.is_empty()));
}

#[tokio::test]
async fn listing_paginates_and_previews() {
    let store = Arc::new(memory_store().await);
    let alice = seed_user(&store, "alice").await;
    let token = token_for(&alice);
    let app = app(store);

    for i in 0..3 {
        let mut q = valid_question();
        q["title"] = json!(format!("A sufficiently long title number {i}"));
        let (status, _) = post(&app, "/api/questions", Some(&token), Some(q)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = get(&app, "/api/questions?page=1&limit=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["questions"].as_array().unwrap().len(), 2);
    assert_eq!(body["pagination"]["totalItems"], json!(3));
    assert_eq!(body["pagination"]["totalPages"], json!(2));
    assert_eq!(body["pagination"]["hasNext"], json!(true));
    assert_eq!(body["pagination"]["hasPrev"], json!(false));

    let preview = body["questions"][0]["description"].as_str().unwrap();
    assert!(preview.ends_with("..."));
}

#[tokio::test]
async fn listing_filters_by_tag_and_search() {
    let store = Arc::new(memory_store().await);
    let alice = seed_user(&store, "alice").await;
    let token = token_for(&alice);
    let app = app(store);

    let (_, _) = post(&app, "/api/questions", Some(&token), Some(valid_question())).await;
    let mut other = valid_question();
    other["title"] = json!("Completely different topic title");
    other["tags"] = json!(["sqlite"]);
    other["description"] = json!("<p>All about database indexing strategies.</p>");
    post(&app, "/api/questions", Some(&token), Some(other)).await;

    let (_, body) = get(&app, "/api/questions?tags=sqlite", None).await;
    assert_eq!(body["questions"].as_array().unwrap().len(), 1);
    assert_eq!(body["questions"][0]["tags"], json!(["sqlite"]));

    let (_, body) = get(&app, "/api/questions?search=indexing", None).await;
    assert_eq!(body["questions"].as_array().unwrap().len(), 1);

    let (_, body) = get(&app, "/api/questions?sort=unanswered", None).await;
    assert_eq!(body["questions"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn invalid_sort_is_a_validation_error() {
    let store = Arc::new(memory_store().await);
    let app = app(store);

    let (status, body) = get(&app, "/api/questions?sort=hottest", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn detail_counts_views_and_shows_the_viewers_vote() {
    let store = Arc::new(memory_store().await);
    let alice = seed_user(&store, "alice").await;
    let bob = seed_user(&store, "bob").await;
    let alice_token = token_for(&alice);
    let bob_token = token_for(&bob);
    let app = app(store);

    let (_, created) = post(&app, "/api/questions", Some(&alice_token), Some(valid_question())).await;
    let id = created["question"]["id"].as_str().unwrap().to_string();

    let (status, body) = get(&app, &format!("/api/questions/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["question"]["viewCount"], json!(1));
    assert!(body["question"].get("userVote").is_none(), "anonymous viewers get no vote field");

    // Bob upvotes, then loads the page: his vote is echoed back.
    let (status, vote) = post(
        &app,
        &format!("/api/questions/{id}/vote"),
        Some(&bob_token),
        Some(json!({ "type": "up" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(vote["voteCount"], json!(1));
    assert_eq!(vote["userVote"], json!("up"));

    let (_, body) = get(&app, &format!("/api/questions/{id}"), Some(&bob_token)).await;
    assert_eq!(body["question"]["viewCount"], json!(2));
    assert_eq!(body["question"]["userVote"], json!("up"));
    assert_eq!(body["question"]["voteCount"], json!(1));
}

#[tokio::test]
async fn missing_question_is_404() {
    let store = Arc::new(memory_store().await);
    let app = app(store);

    let id = uuid::Uuid::now_v7();
    let (status, body) = get(&app, &format!("/api/questions/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], json!(false));
}
