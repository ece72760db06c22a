//! Storage adapters: SQLite implementations of the persistence ports.
//!
//! Everything multi-row the ports promise to be atomic (vote application,
//! acceptance toggling, creation with counter bumps, soft-deletes with
//! counter decrements) runs inside a single transaction here. SQLite's
//! single-writer model then serializes concurrent voters and concurrent
//! accept calls for us.

#[cfg(feature = "db-sqlite")]
pub mod sqlite;

#[cfg(feature = "db-sqlite")]
pub use sqlite::{connect, SqliteStore};

use domains::DomainError;

/// Maps a database failure onto the domain taxonomy. Unique-constraint hits
/// become conflicts; everything else is an infrastructure failure.
pub(crate) fn db_err(err: sqlx::Error) -> DomainError {
    match &err {
        sqlx::Error::Database(db) if db.kind() == sqlx::error::ErrorKind::UniqueViolation => {
            DomainError::conflict(format!("already exists: {}", db.message()))
        }
        _ => DomainError::internal(err.to_string()),
    }
}
