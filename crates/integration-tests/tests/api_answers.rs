//! Answer posting, voting, and acceptance over HTTP — the full §scenarios.

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;

use integration_tests::api::{app, get, post};
use integration_tests::{memory_store, seed_user, token_for};

/// Creates a question as `owner_token` and returns its id.
async fn create_question(app: &axum::Router, owner_token: &str) -> String {
    let (status, body) = post(
        app,
        "/api/questions",
        Some(owner_token),
        Some(json!({
            "title": "How do borrow checker errors work?",
            "description": "<p>This description is definitely long enough.</p>",
            "tags": ["rust"],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["question"]["id"].as_str().unwrap().to_string()
}

async fn add_answer(app: &axum::Router, question_id: &str, token: &str, text: &str) -> String {
    let (status, body) = post(
        app,
        &format!("/api/questions/{question_id}/answers"),
        Some(token),
        Some(json!({ "content": text })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["answer"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn vote_toggle_scenario_up_up_down() {
    let store = Arc::new(memory_store().await);
    let owner = seed_user(&store, "owner").await;
    let answerer = seed_user(&store, "answerer").await;
    let voter = seed_user(&store, "voter").await;
    let app = app(store);

    let question_id = create_question(&app, &token_for(&owner)).await;
    let answer_id = add_answer(&app, &question_id, &token_for(&answerer), "a valid answer body").await;
    let voter_token = token_for(&voter);
    let uri = format!("/api/answers/{answer_id}/vote");

    let (status, body) = post(&app, &uri, Some(&voter_token), Some(json!({"type": "up"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["voteCount"], json!(1));
    assert_eq!(body["userVote"], json!("up"));

    let (_, body) = post(&app, &uri, Some(&voter_token), Some(json!({"type": "up"}))).await;
    assert_eq!(body["voteCount"], json!(0));
    assert_eq!(body["userVote"], json!(null));

    let (_, body) = post(&app, &uri, Some(&voter_token), Some(json!({"type": "down"}))).await;
    assert_eq!(body["voteCount"], json!(-1));
    assert_eq!(body["userVote"], json!("down"));
}

#[tokio::test]
async fn self_votes_and_bad_directions_are_rejected() {
    let store = Arc::new(memory_store().await);
    let owner = seed_user(&store, "owner").await;
    let answerer = seed_user(&store, "answerer").await;
    let app = app(store);

    let answerer_token = token_for(&answerer);
    let question_id = create_question(&app, &token_for(&owner)).await;
    let answer_id = add_answer(&app, &question_id, &answerer_token, "a valid answer body").await;
    let uri = format!("/api/answers/{answer_id}/vote");

    let (status, body) = post(&app, &uri, Some(&answerer_token), Some(json!({"type": "up"}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], json!(false));

    let (status, _) = post(&app, &uri, Some(&token_for(&owner)), Some(json!({"type": "sideways"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(&app, &uri, None, Some(json!({"type": "up"}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn acceptance_scenario_two_answers() {
    let store = Arc::new(memory_store().await);
    let owner = seed_user(&store, "owner").await;
    let a1_author = seed_user(&store, "first").await;
    let a2_author = seed_user(&store, "second").await;
    let app = app(store);

    let owner_token = token_for(&owner);
    let question_id = create_question(&app, &owner_token).await;
    let a1 = add_answer(&app, &question_id, &token_for(&a1_author), "the first answer body").await;
    let a2 = add_answer(&app, &question_id, &token_for(&a2_author), "the second answer body").await;

    // accept(A1)
    let (status, body) = post(&app, &format!("/api/answers/{a1}/accept"), Some(&owner_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isAccepted"], json!(true));

    // accept(A2): acceptance moves
    let (_, body) = post(&app, &format!("/api/answers/{a2}/accept"), Some(&owner_token), None).await;
    assert_eq!(body["isAccepted"], json!(true));

    let (_, detail) = get(&app, &format!("/api/questions/{question_id}"), None).await;
    let answers = detail["question"]["answers"].as_array().unwrap();
    let accepted: Vec<_> = answers
        .iter()
        .filter(|a| a["isAccepted"] == json!(true))
        .collect();
    assert_eq!(accepted.len(), 1, "at most one accepted answer");
    assert_eq!(accepted[0]["id"].as_str().unwrap(), a2);
    // Accepted answer sorts first even though A1 is older.
    assert_eq!(answers[0]["id"].as_str().unwrap(), a2);

    // accept(A2) again: the toggle clears it
    let (_, body) = post(&app, &format!("/api/answers/{a2}/accept"), Some(&owner_token), None).await;
    assert_eq!(body["isAccepted"], json!(false));

    let (_, detail) = get(&app, &format!("/api/questions/{question_id}"), None).await;
    let none_accepted = detail["question"]["answers"]
        .as_array()
        .unwrap()
        .iter()
        .all(|a| a["isAccepted"] == json!(false));
    assert!(none_accepted);
}

#[tokio::test]
async fn only_the_owner_accepts_over_http() {
    let store = Arc::new(memory_store().await);
    let owner = seed_user(&store, "owner").await;
    let answerer = seed_user(&store, "answerer").await;
    let app = app(store);

    let question_id = create_question(&app, &token_for(&owner)).await;
    let answer_id = add_answer(&app, &question_id, &token_for(&answerer), "a valid answer body").await;

    let (status, body) = post(
        &app,
        &format!("/api/answers/{answer_id}/accept"),
        Some(&token_for(&answerer)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], json!(false));

    // And the state did not move.
    let (_, detail) = get(&app, &format!("/api/questions/{question_id}"), None).await;
    assert!(detail["question"]["acceptedAnswerId"].is_null());
}

#[tokio::test]
async fn answer_count_tracks_additions() {
    let store = Arc::new(memory_store().await);
    let owner = seed_user(&store, "owner").await;
    let answerer = seed_user(&store, "answerer").await;
    let app = app(store);

    let question_id = create_question(&app, &token_for(&owner)).await;
    add_answer(&app, &question_id, &token_for(&answerer), "a valid answer body").await;

    let (_, body) = get(&app, "/api/questions", None).await;
    assert_eq!(body["questions"][0]["answerCount"], json!(1));
}
