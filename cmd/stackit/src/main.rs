//! The entry point that assembles the application.

use std::sync::Arc;

use secrecy::ExposeSecret;
use tracing_subscriber::EnvFilter;

use api_adapters::{middleware, router, AppState};
use auth_adapters::{Argon2PasswordHasher, JwtTokenService};
use configs::AppConfig;
use domains::{
    AnswerRepo, NotificationRepo, PasswordHasher, QuestionRepo, StatsRepo, TagRepo,
    TokenService, UserRepo, VoteStore,
};
use services::{
    AcceptanceService, AccountService, ModerationService, NotificationService, QuestionService,
    TagService, VoteService,
};
use storage_adapters::SqliteStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;

    // 1. Storage
    let store = Arc::new(
        storage_adapters::connect(&config.database.url, config.database.max_connections).await?,
    );

    // 2. Auth
    let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher::new());
    let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(
        config.auth.jwt_secret.expose_secret().as_bytes(),
        config.auth.token_ttl_hours,
    ));

    // 3. Services over the ports
    let state = app_state(store, hasher, tokens);

    // 4. Serve
    let app = router(state)
        .layer(middleware::trace_layer())
        .layer(middleware::cors_policy());

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "stackit listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn app_state(
    store: Arc<SqliteStore>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
) -> AppState {
    let users: Arc<dyn UserRepo> = store.clone();
    let questions: Arc<dyn QuestionRepo> = store.clone();
    let answers: Arc<dyn AnswerRepo> = store.clone();
    let votes: Arc<dyn VoteStore> = store.clone();
    let tags: Arc<dyn TagRepo> = store.clone();
    let notifications: Arc<dyn NotificationRepo> = store.clone();
    let stats: Arc<dyn StatsRepo> = store;

    AppState {
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
        moderation: Arc::new(ModerationService::new(users, questions, answers, tags, stats)),
    }
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown signal received, draining connections");
}
