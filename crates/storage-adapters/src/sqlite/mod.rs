//! The SQLite store.
//!
//! One [`SqliteStore`] implements every persistence port over a shared
//! connection pool. Uses WAL mode with foreign keys on; UUIDs are stored as
//! 16-byte blobs and timestamps as RFC 3339 text, which is what sqlx's
//! `uuid`/`chrono` codecs emit for SQLite.

mod answers;
mod notifications;
mod questions;
mod rows;
mod schema;
mod stats;
mod tags;
mod users;
mod votes;

pub use schema::initialize_database;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

use domains::{DomainError, Result};

use crate::db_err;

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Opens a pool against `url` (e.g. `sqlite:stackit.db` or
/// `sqlite::memory:`) and brings the schema up to date.
pub async fn connect(url: &str, max_connections: u32) -> Result<SqliteStore> {
    let options = SqliteConnectOptions::from_str(url)
        .map_err(|e| DomainError::internal(format!("invalid database url: {e}")))?
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(5))
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .map_err(db_err)?;

    initialize_database(&pool).await?;
    Ok(SqliteStore::new(pool))
}
