//! Layered application configuration.
//!
//! Values come from built-in defaults, then an optional `stackit.toml`, then
//! environment variables prefixed `STACKIT__` (double underscore separating
//! nesting, e.g. `STACKIT__SERVER__PORT=8080`). A `.env` file is honored
//! before the environment is read.

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// sqlx connection URL, e.g. `sqlite:stackit.db`.
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for session tokens. Wrapped so it never lands in logs.
    pub jwt_secret: SecretString,
    pub token_ttl_hours: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Absence of a .env file is fine; a malformed one is not worth
        // failing startup over either, the variables just won't be set.
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("database.url", "sqlite:stackit.db")?
            .set_default("database.max_connections", 5)?
            .set_default("auth.jwt_secret", "change-me-in-production")?
            .set_default("auth.token_ttl_hours", 24 * 7)?
            .add_source(config::File::with_name("stackit").required(false))
            .add_source(
                config::Environment::with_prefix("STACKIT")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        let app: AppConfig = config.try_deserialize()?;
        tracing::debug!(
            host = %app.server.host,
            port = app.server.port,
            "configuration loaded"
        );
        Ok(app)
    }
}
