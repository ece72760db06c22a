//! `NotificationRepo` on SQLite.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use domains::{Notification, NotificationFeed, NotificationRepo, Page, Result};

use super::rows::NotificationRow;
use super::SqliteStore;
use crate::db_err;

const NOTIFICATION_COLUMNS: &str = "id, recipient_id, sender_id, kind, message, question_id, \
     answer_id, is_read, read_at, created_at";

#[async_trait]
impl NotificationRepo for SqliteStore {
    async fn insert(&self, notification: &Notification) -> Result<()> {
        sqlx::query(
            "INSERT INTO notifications (id, recipient_id, sender_id, kind, message, \
             question_id, answer_id, is_read, read_at, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(notification.id)
        .bind(notification.recipient_id)
        .bind(notification.sender_id)
        .bind(notification.kind.as_str())
        .bind(&notification.message)
        .bind(notification.question_id)
        .bind(notification.answer_id)
        .bind(notification.is_read)
        .bind(notification.read_at)
        .bind(notification.created_at)
        .execute(self.pool())
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn list_for(
        &self,
        recipient_id: Uuid,
        page: i64,
        limit: i64,
    ) -> Result<NotificationFeed> {
        let counts = sqlx::query(
            "SELECT COUNT(*) AS total, \
             COALESCE(SUM(CASE WHEN is_read = 0 THEN 1 ELSE 0 END), 0) AS unread \
             FROM notifications WHERE recipient_id = ?",
        )
        .bind(recipient_id)
        .fetch_one(self.pool())
        .await
        .map_err(db_err)?;
        let total: i64 = counts.get("total");
        let unread: i64 = counts.get("unread");

        let rows = sqlx::query_as::<_, NotificationRow>(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE recipient_id = ? \
             ORDER BY created_at DESC LIMIT ? OFFSET ?"
        ))
        .bind(recipient_id)
        .bind(limit)
        .bind((page - 1) * limit)
        .fetch_all(self.pool())
        .await
        .map_err(db_err)?;

        let items = rows
            .into_iter()
            .map(Notification::try_from)
            .collect::<Result<Vec<_>>>()?;

        Ok(NotificationFeed {
            page: Page { items, total, page, limit },
            unread,
        })
    }

    async fn find_for(&self, id: Uuid, recipient_id: Uuid) -> Result<Option<Notification>> {
        let row = sqlx::query_as::<_, NotificationRow>(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications \
             WHERE id = ? AND recipient_id = ?"
        ))
        .bind(id)
        .bind(recipient_id)
        .fetch_optional(self.pool())
        .await
        .map_err(db_err)?;
        row.map(Notification::try_from).transpose()
    }

    async fn mark_read(&self, id: Uuid, recipient_id: Uuid, at: DateTime<Utc>) -> Result<()> {
        sqlx::query(
            "UPDATE notifications SET is_read = 1, read_at = ? \
             WHERE id = ? AND recipient_id = ? AND is_read = 0",
        )
        .bind(at)
        .bind(id)
        .bind(recipient_id)
        .execute(self.pool())
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn mark_all_read(&self, recipient_id: Uuid, at: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = 1, read_at = ? \
             WHERE recipient_id = ? AND is_read = 0",
        )
        .bind(at)
        .bind(recipient_id)
        .execute(self.pool())
        .await
        .map_err(db_err)?;
        Ok(result.rows_affected())
    }
}
