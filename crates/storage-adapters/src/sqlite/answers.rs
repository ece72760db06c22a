//! `AnswerRepo` on SQLite.

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use domains::{Answer, AnswerRepo, DomainError, Result};

use super::rows::AnswerRow;
use super::SqliteStore;
use crate::db_err;

const ANSWER_COLUMNS: &str = "id, question_id, author_id, content, vote_count, accepted_at, \
     accepted_by, is_deleted, deleted_at, deleted_by, created_at, updated_at";

#[async_trait]
impl AnswerRepo for SqliteStore {
    async fn create(&self, answer: &Answer) -> Result<()> {
        let mut tx = self.pool().begin().await.map_err(db_err)?;
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO answers (id, question_id, author_id, content, vote_count, \
             accepted_at, accepted_by, is_deleted, deleted_at, deleted_by, created_at, \
             updated_at) VALUES (?, ?, ?, ?, 0, NULL, NULL, 0, NULL, NULL, ?, ?)",
        )
        .bind(answer.id)
        .bind(answer.question_id)
        .bind(answer.author_id)
        .bind(&answer.content)
        .bind(answer.created_at)
        .bind(answer.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        sqlx::query(
            "UPDATE questions SET answer_count = answer_count + 1, updated_at = ? WHERE id = ?",
        )
        .bind(now)
        .bind(answer.question_id)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        sqlx::query(
            "UPDATE users SET answers_count = answers_count + 1, updated_at = ? WHERE id = ?",
        )
        .bind(now)
        .bind(answer.author_id)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        tx.commit().await.map_err(db_err)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Answer>> {
        let row = sqlx::query_as::<_, AnswerRow>(&format!(
            "SELECT {ANSWER_COLUMNS} FROM answers WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(db_err)?;
        Ok(row.map(Answer::from))
    }

    async fn list_for_question(&self, question_id: Uuid) -> Result<Vec<Answer>> {
        let rows = sqlx::query_as::<_, AnswerRow>(&format!(
            "SELECT a.{} FROM answers a \
             JOIN questions q ON q.id = a.question_id \
             WHERE a.question_id = ? AND a.is_deleted = 0 \
             ORDER BY CASE WHEN q.accepted_answer_id IS NOT NULL \
                  AND a.id = q.accepted_answer_id THEN 1 ELSE 0 END DESC, \
                  a.vote_count DESC, a.created_at ASC",
            ANSWER_COLUMNS.replace(", ", ", a.")
        ))
        .bind(question_id)
        .fetch_all(self.pool())
        .await
        .map_err(db_err)?;
        Ok(rows.into_iter().map(Answer::from).collect())
    }

    async fn soft_delete(&self, id: Uuid, deleted_by: Uuid) -> Result<()> {
        let mut tx = self.pool().begin().await.map_err(db_err)?;
        let now = Utc::now();

        let question_id: Option<Uuid> = sqlx::query_scalar(
            "SELECT question_id FROM answers WHERE id = ? AND is_deleted = 0",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err)?;
        let question_id = question_id.ok_or_else(|| DomainError::not_found("Answer", id))?;

        sqlx::query(
            "UPDATE answers SET is_deleted = 1, deleted_at = ?, deleted_by = ?, updated_at = ? \
             WHERE id = ?",
        )
        .bind(now)
        .bind(deleted_by)
        .bind(now)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        sqlx::query(
            "UPDATE questions SET answer_count = MAX(answer_count - 1, 0), updated_at = ? \
             WHERE id = ?",
        )
        .bind(now)
        .bind(question_id)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        tx.commit().await.map_err(db_err)
    }
}
