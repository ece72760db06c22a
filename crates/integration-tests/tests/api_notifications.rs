//! The notification feed over HTTP.

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;

use integration_tests::api::{app, get, post};
use integration_tests::{memory_store, seed_user, token_for};

async fn seed_question_and_answer(
    app: &axum::Router,
    owner_token: &str,
    answerer_token: &str,
) -> (String, String) {
    let (_, body) = post(
        app,
        "/api/questions",
        Some(owner_token),
        Some(json!({
            "title": "A sufficiently long question title",
            "description": "<p>This description is definitely long enough.</p>",
            "tags": ["rust"],
        })),
    )
    .await;
    let question_id = body["question"]["id"].as_str().unwrap().to_string();

    let (_, body) = post(
        app,
        &format!("/api/questions/{question_id}/answers"),
        Some(answerer_token),
        Some(json!({ "content": "a perfectly valid answer" })),
    )
    .await;
    let answer_id = body["answer"]["id"].as_str().unwrap().to_string();
    (question_id, answer_id)
}

#[tokio::test]
async fn answering_creates_an_unread_notification_for_the_owner() {
    let store = Arc::new(memory_store().await);
    let owner = seed_user(&store, "owner").await;
    let answerer = seed_user(&store, "answerer").await;
    let app = app(store);

    let owner_token = token_for(&owner);
    seed_question_and_answer(&app, &owner_token, &token_for(&answerer)).await;

    let (status, body) = get(&app, "/api/notifications", Some(&owner_token)).await;
    assert_eq!(status, StatusCode::OK);
    let notifications = body["notifications"].as_array().unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0]["type"], json!("answer"));
    assert_eq!(notifications[0]["isRead"], json!(false));
    assert_eq!(notifications[0]["sender"]["username"], json!("answerer"));
    assert_eq!(
        notifications[0]["relatedQuestion"]["title"],
        json!("A sufficiently long question title")
    );
    assert_eq!(body["pagination"]["unreadCount"], json!(1));

    // The answerer has no notifications; they acted, they weren't acted on.
    let (_, body) = get(&app, "/api/notifications", Some(&token_for(&answerer))).await;
    assert!(body["notifications"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn upvote_and_accept_notify_the_answer_author() {
    let store = Arc::new(memory_store().await);
    let owner = seed_user(&store, "owner").await;
    let answerer = seed_user(&store, "answerer").await;
    let app = app(store);

    let owner_token = token_for(&owner);
    let answerer_token = token_for(&answerer);
    let (_, answer_id) = seed_question_and_answer(&app, &owner_token, &answerer_token).await;

    // Owner upvotes, then accepts.
    post(
        &app,
        &format!("/api/answers/{answer_id}/vote"),
        Some(&owner_token),
        Some(json!({"type": "up"})),
    )
    .await;
    post(&app, &format!("/api/answers/{answer_id}/accept"), Some(&owner_token), None).await;

    let (_, body) = get(&app, "/api/notifications", Some(&answerer_token)).await;
    let kinds: Vec<&str> = body["notifications"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["type"].as_str().unwrap())
        .collect();
    assert!(kinds.contains(&"vote"));
    assert!(kinds.contains(&"accept"));

    // Toggling the vote off and on again does not re-notify per the
    // fresh-upvote rule... the off-toggle:
    post(
        &app,
        &format!("/api/answers/{answer_id}/vote"),
        Some(&owner_token),
        Some(json!({"type": "up"})),
    )
    .await;
    let (_, body) = get(&app, "/api/notifications", Some(&answerer_token)).await;
    let vote_count = body["notifications"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|n| n["type"] == json!("vote"))
        .count();
    assert_eq!(vote_count, 1);
}

#[tokio::test]
async fn marking_read_is_scoped_to_the_recipient() {
    let store = Arc::new(memory_store().await);
    let owner = seed_user(&store, "owner").await;
    let answerer = seed_user(&store, "answerer").await;
    let stranger = seed_user(&store, "stranger").await;
    let app = app(store);

    let owner_token = token_for(&owner);
    seed_question_and_answer(&app, &owner_token, &token_for(&answerer)).await;

    let (_, body) = get(&app, "/api/notifications", Some(&owner_token)).await;
    let id = body["notifications"][0]["id"].as_str().unwrap().to_string();

    // A stranger cannot read someone else's notification.
    let (status, _) = post(
        &app,
        &format!("/api/notifications/{id}/read"),
        Some(&token_for(&stranger)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post(&app, &format!("/api/notifications/{id}/read"), Some(&owner_token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = get(&app, "/api/notifications", Some(&owner_token)).await;
    assert_eq!(body["notifications"][0]["isRead"], json!(true));
    assert_eq!(body["pagination"]["unreadCount"], json!(0));
}

#[tokio::test]
async fn mark_all_read_clears_the_counter() {
    let store = Arc::new(memory_store().await);
    let owner = seed_user(&store, "owner").await;
    let a = seed_user(&store, "first").await;
    let b = seed_user(&store, "second").await;
    let app = app(store);

    let owner_token = token_for(&owner);
    let (question_id, _) = seed_question_and_answer(&app, &owner_token, &token_for(&a)).await;
    post(
        &app,
        &format!("/api/questions/{question_id}/answers"),
        Some(&token_for(&b)),
        Some(json!({ "content": "another perfectly valid answer" })),
    )
    .await;

    let (_, body) = get(&app, "/api/notifications", Some(&owner_token)).await;
    assert_eq!(body["pagination"]["unreadCount"], json!(2));

    let (status, _) = post(&app, "/api/notifications/mark-all-read", Some(&owner_token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = get(&app, "/api/notifications", Some(&owner_token)).await;
    assert_eq!(body["pagination"]["unreadCount"], json!(0));
}
