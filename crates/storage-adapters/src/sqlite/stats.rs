//! `StatsRepo` on SQLite.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;

use domains::{PlatformStats, Result, StatsRepo};

use super::SqliteStore;
use crate::db_err;

#[async_trait]
impl StatsRepo for SqliteStore {
    async fn platform_stats(&self, recent_since: DateTime<Utc>) -> Result<PlatformStats> {
        let row = sqlx::query(
            "SELECT \
             (SELECT COUNT(*) FROM users) AS total_users, \
             (SELECT COUNT(*) FROM users WHERE status = 'active') AS active_users, \
             (SELECT COUNT(*) FROM users WHERE status = 'blocked') AS blocked_users, \
             (SELECT COUNT(*) FROM users WHERE created_at >= ?1) AS recent_users, \
             (SELECT COUNT(*) FROM questions) AS total_questions, \
             (SELECT COUNT(*) FROM questions WHERE is_deleted = 1) AS deleted_questions, \
             (SELECT COUNT(*) FROM questions WHERE created_at >= ?1 AND is_deleted = 0) \
                 AS recent_questions, \
             (SELECT COUNT(*) FROM answers) AS total_answers, \
             (SELECT COUNT(*) FROM answers WHERE is_deleted = 1) AS deleted_answers, \
             (SELECT COUNT(*) FROM answers WHERE created_at >= ?1 AND is_deleted = 0) \
                 AS recent_answers, \
             (SELECT COUNT(*) FROM tags WHERE is_active = 1) AS total_tags",
        )
        .bind(recent_since)
        .fetch_one(self.pool())
        .await
        .map_err(db_err)?;

        Ok(PlatformStats {
            total_users: row.get("total_users"),
            active_users: row.get("active_users"),
            blocked_users: row.get("blocked_users"),
            recent_users: row.get("recent_users"),
            total_questions: row.get("total_questions"),
            deleted_questions: row.get("deleted_questions"),
            recent_questions: row.get("recent_questions"),
            total_answers: row.get("total_answers"),
            deleted_answers: row.get("deleted_answers"),
            recent_answers: row.get("recent_answers"),
            total_tags: row.get("total_tags"),
        })
    }
}
