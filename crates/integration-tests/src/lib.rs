//! Shared fixtures for the integration test targets.
//!
//! Tests run against an in-memory SQLite database (single connection, so
//! every query sees the same store) and, for the API targets, a full router
//! wired exactly like the binary wires it.

use std::sync::Arc;

use domains::{
    AccountStatus, PasswordHasher as _, Role, TokenService as _, User, UserRepo,
};
use storage_adapters::SqliteStore;

pub const TEST_JWT_SECRET: &[u8] = b"integration-test-secret";
pub const TEST_PASSWORD: &str = "password123";

/// A fresh, fully migrated in-memory store.
pub async fn memory_store() -> SqliteStore {
    storage_adapters::connect("sqlite::memory:", 1)
        .await
        .expect("in-memory store")
}

pub async fn seed_user(store: &SqliteStore, username: &str) -> User {
    seed_user_with_role(store, username, Role::User).await
}

pub async fn seed_admin(store: &SqliteStore, username: &str) -> User {
    seed_user_with_role(store, username, Role::Admin).await
}

pub async fn seed_user_with_role(store: &SqliteStore, username: &str, role: Role) -> User {
    let hasher = auth_adapters::Argon2PasswordHasher::new();
    let mut user = User::new(
        username.to_string(),
        format!("{username}@example.com"),
        hasher.hash(TEST_PASSWORD).expect("hash"),
    );
    user.role = role;
    UserRepo::insert(store, &user).await.expect("seed user");
    user
}

pub async fn block_user(store: &SqliteStore, user: &User) {
    UserRepo::set_status(store, user.id, AccountStatus::Blocked)
        .await
        .expect("block user");
}

/// A bearer token the test router will accept for this user.
pub fn token_for(user: &User) -> String {
    auth_adapters::JwtTokenService::new(TEST_JWT_SECRET, 24)
        .issue(user.id)
        .expect("token")
}

#[cfg(feature = "web-axum")]
pub mod api {
    use super::*;

    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    use api_adapters::AppState;
    use domains::{
        AnswerRepo, NotificationRepo, PasswordHasher, QuestionRepo, StatsRepo, TagRepo,
        TokenService, VoteStore,
    };
    use services::{
        AcceptanceService, AccountService, ModerationService, NotificationService,
        QuestionService, TagService, VoteService,
    };

    /// Wires the services the same way `cmd/stackit` does, over one store.
    pub fn app(store: Arc<SqliteStore>) -> axum::Router {
        let hasher: Arc<dyn PasswordHasher> = Arc::new(auth_adapters::Argon2PasswordHasher::new());
        let tokens: Arc<dyn TokenService> =
            Arc::new(auth_adapters::JwtTokenService::new(TEST_JWT_SECRET, 24));

        let users: Arc<dyn UserRepo> = store.clone();
        let questions: Arc<dyn QuestionRepo> = store.clone();
        let answers: Arc<dyn AnswerRepo> = store.clone();
        let votes: Arc<dyn VoteStore> = store.clone();
        let tags: Arc<dyn TagRepo> = store.clone();
        let notifications: Arc<dyn NotificationRepo> = store.clone();
        let stats: Arc<dyn StatsRepo> = store;

        let state = AppState {
            accounts: Arc::new(AccountService::new(users.clone(), hasher, tokens)),
            questions: Arc::new(QuestionService::new(
                questions.clone(),
                answers.clone(),
                votes.clone(),
                notifications.clone(),
                users.clone(),
            )),
            votes: Arc::new(VoteService::new(
                questions.clone(),
                answers.clone(),
                votes,
                notifications.clone(),
            )),
            acceptance: Arc::new(AcceptanceService::new(
                questions.clone(),
                answers.clone(),
                notifications.clone(),
            )),
            notifications: Arc::new(NotificationService::new(
                notifications,
                users.clone(),
                questions.clone(),
            )),
            tags: Arc::new(TagService::new(tags.clone())),
            moderation: Arc::new(ModerationService::new(
                users, questions, answers, tags, stats,
            )),
        };
        api_adapters::router(state)
    }

    /// Sends one request and returns (status, parsed JSON body).
    pub async fn send(
        app: &axum::Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string()))
                .expect("request"),
            None => builder.body(Body::empty()).expect("request"),
        };

        let response = app.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, value)
    }

    pub async fn get(app: &axum::Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        send(app, Method::GET, uri, token, None).await
    }

    pub async fn post(
        app: &axum::Router,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        send(app, Method::POST, uri, token, body).await
    }
}
