//! The web routing and orchestration layer for StackIt.

#[cfg(feature = "web-axum")]
pub mod dto;
#[cfg(feature = "web-axum")]
pub mod error;
#[cfg(feature = "web-axum")]
pub mod extract;
#[cfg(feature = "web-axum")]
pub mod handlers;
#[cfg(feature = "web-axum")]
pub mod middleware;

#[cfg(feature = "web-axum")]
pub use state::AppState;

#[cfg(feature = "web-axum")]
mod state {
    use std::sync::Arc;

    use services::{
        AcceptanceService, AccountService, ModerationService, NotificationService,
        QuestionService, TagService, VoteService,
    };

    /// State shared across all request handlers.
    #[derive(Clone)]
    pub struct AppState {
        pub accounts: Arc<AccountService>,
        pub questions: Arc<QuestionService>,
        pub votes: Arc<VoteService>,
        pub acceptance: Arc<AcceptanceService>,
        pub notifications: Arc<NotificationService>,
        pub tags: Arc<TagService>,
        pub moderation: Arc<ModerationService>,
    }
}

#[cfg(feature = "web-axum")]
pub fn router(state: AppState) -> axum::Router {
    use axum::routing::{delete, get, patch, post};

    axum::Router::new()
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/me", get(handlers::auth::me))
        .route(
            "/api/questions",
            get(handlers::questions::list).post(handlers::questions::create),
        )
        .route("/api/questions/{id}", get(handlers::questions::detail))
        .route("/api/questions/{id}/answers", post(handlers::questions::add_answer))
        .route("/api/questions/{id}/vote", post(handlers::questions::vote))
        .route("/api/answers/{id}/vote", post(handlers::answers::vote))
        .route("/api/answers/{id}/accept", post(handlers::answers::accept))
        .route("/api/notifications", get(handlers::notifications::list))
        .route("/api/notifications/{id}/read", post(handlers::notifications::mark_read))
        .route(
            "/api/notifications/mark-all-read",
            post(handlers::notifications::mark_all_read),
        )
        .route("/api/tags", get(handlers::tags::list))
        .route("/api/tags/popular", get(handlers::tags::popular))
        .route("/api/admin/users", get(handlers::admin::list_users))
        .route("/api/admin/users/{id}/status", patch(handlers::admin::set_user_status))
        .route("/api/admin/questions", get(handlers::admin::list_questions))
        .route("/api/admin/questions/{id}", delete(handlers::admin::delete_question))
        .route("/api/admin/answers/{id}", delete(handlers::admin::delete_answer))
        .route("/api/admin/stats", get(handlers::admin::stats))
        .route("/api/admin/tags", post(handlers::admin::create_tag))
        .with_state(state)
}
