//! `QuestionRepo` on SQLite.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Row, Sqlite};
use std::collections::HashMap;
use uuid::Uuid;

use domains::{
    AcceptOutcome, DomainError, Page, Question, QuestionFilter, QuestionRepo, QuestionSort,
    Result, Tag, ACCEPT_REPUTATION,
};

use super::rows::QuestionRow;
use super::SqliteStore;
use crate::db_err;

const QUESTION_COLUMNS: &str = "id, title, description, author_id, vote_count, answer_count, \
     view_count, accepted_answer_id, is_deleted, deleted_at, deleted_by, created_at, updated_at";

impl SqliteStore {
    /// Tags for a set of questions, in the order their authors wrote them.
    async fn tags_for(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<String>>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT question_id, tag_name FROM question_tags WHERE question_id IN (",
        );
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        builder.push(") ORDER BY position");

        let rows = builder
            .build()
            .fetch_all(self.pool())
            .await
            .map_err(db_err)?;

        let mut by_question: HashMap<Uuid, Vec<String>> = HashMap::new();
        for row in rows {
            let question_id: Uuid = row.get("question_id");
            let tag_name: String = row.get("tag_name");
            by_question.entry(question_id).or_default().push(tag_name);
        }
        Ok(by_question)
    }
}

#[async_trait]
impl QuestionRepo for SqliteStore {
    async fn create(&self, question: &Question) -> Result<()> {
        let mut tx = self.pool().begin().await.map_err(db_err)?;

        sqlx::query(
            "INSERT INTO questions (id, title, description, author_id, vote_count, \
             answer_count, view_count, accepted_answer_id, is_deleted, deleted_at, \
             deleted_by, created_at, updated_at) \
             VALUES (?, ?, ?, ?, 0, 0, 0, NULL, 0, NULL, NULL, ?, ?)",
        )
        .bind(question.id)
        .bind(&question.title)
        .bind(&question.description)
        .bind(question.author_id)
        .bind(question.created_at)
        .bind(question.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        for (position, tag) in question.tags.iter().enumerate() {
            sqlx::query(
                "INSERT INTO question_tags (question_id, tag_name, position) VALUES (?, ?, ?)",
            )
            .bind(question.id)
            .bind(tag)
            .bind(position as i64)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

            sqlx::query(
                "INSERT INTO tags (id, name, description, question_count, color, is_active, \
                 created_by, created_at) VALUES (?, ?, '', 1, ?, 1, NULL, ?) \
                 ON CONFLICT(name) DO UPDATE SET question_count = question_count + 1",
            )
            .bind(Uuid::now_v7())
            .bind(tag)
            .bind(Tag::DEFAULT_COLOR)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        }

        sqlx::query(
            "UPDATE users SET questions_count = questions_count + 1, updated_at = ? WHERE id = ?",
        )
        .bind(Utc::now())
        .bind(question.author_id)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        tx.commit().await.map_err(db_err)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Question>> {
        let row = sqlx::query_as::<_, QuestionRow>(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(db_err)?;

        match row {
            Some(row) => {
                let tags = self
                    .tags_for(&[id])
                    .await?
                    .remove(&id)
                    .unwrap_or_default();
                Ok(Some(row.into_question(tags)))
            }
            None => Ok(None),
        }
    }

    async fn list(&self, filter: QuestionFilter) -> Result<Page<Question>> {
        let push_conditions = |builder: &mut QueryBuilder<Sqlite>| {
            builder.push(" WHERE 1 = 1");
            if !filter.include_deleted {
                builder.push(" AND q.is_deleted = 0");
            }
            if filter.sort == QuestionSort::Unanswered {
                builder.push(" AND q.answer_count = 0");
            }
            if !filter.tags.is_empty() {
                builder.push(
                    " AND EXISTS (SELECT 1 FROM question_tags qt \
                     WHERE qt.question_id = q.id AND qt.tag_name IN (",
                );
                let mut separated = builder.separated(", ");
                for tag in &filter.tags {
                    separated.push_bind(tag.clone());
                }
                builder.push("))");
            }
            if let Some(term) = &filter.search {
                let pattern = format!("%{}%", term.to_lowercase());
                builder.push(" AND (LOWER(q.title) LIKE ");
                builder.push_bind(pattern.clone());
                builder.push(" OR LOWER(q.description) LIKE ");
                builder.push_bind(pattern);
                builder.push(")");
            }
        };

        let mut count_builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT COUNT(*) FROM questions q");
        push_conditions(&mut count_builder);
        let total: i64 = count_builder
            .build()
            .fetch_one(self.pool())
            .await
            .map_err(db_err)?
            .get(0);

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {QUESTION_COLUMNS} FROM questions q"
        ));
        push_conditions(&mut builder);
        builder.push(match filter.sort {
            QuestionSort::Newest | QuestionSort::Unanswered => " ORDER BY q.created_at DESC",
            QuestionSort::Votes => " ORDER BY q.vote_count DESC, q.created_at DESC",
        });
        builder.push(" LIMIT ");
        builder.push_bind(filter.limit);
        builder.push(" OFFSET ");
        builder.push_bind((filter.page - 1) * filter.limit);

        let rows: Vec<QuestionRow> = builder
            .build_query_as()
            .fetch_all(self.pool())
            .await
            .map_err(db_err)?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut tags = self.tags_for(&ids).await?;
        let items = rows
            .into_iter()
            .map(|row| {
                let row_tags = tags.remove(&row.id).unwrap_or_default();
                row.into_question(row_tags)
            })
            .collect();

        Ok(Page { items, total, page: filter.page, limit: filter.limit })
    }

    async fn record_view(&self, id: Uuid) -> Result<()> {
        sqlx::query("UPDATE questions SET view_count = view_count + 1 WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn soft_delete(&self, id: Uuid, deleted_by: Uuid) -> Result<()> {
        let mut tx = self.pool().begin().await.map_err(db_err)?;
        let now = Utc::now();

        let updated = sqlx::query(
            "UPDATE questions SET is_deleted = 1, deleted_at = ?, deleted_by = ?, \
             updated_at = ? WHERE id = ? AND is_deleted = 0",
        )
        .bind(now)
        .bind(deleted_by)
        .bind(now)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;
        if updated.rows_affected() == 0 {
            return Err(DomainError::not_found("Question", id));
        }

        // The tag counters track live questions only.
        sqlx::query(
            "UPDATE tags SET question_count = MAX(question_count - 1, 0) \
             WHERE name IN (SELECT tag_name FROM question_tags WHERE question_id = ?)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        tx.commit().await.map_err(db_err)
    }

    async fn toggle_accepted(
        &self,
        question_id: Uuid,
        answer_id: Uuid,
        accepted_by: Uuid,
    ) -> Result<AcceptOutcome> {
        let mut tx = self.pool().begin().await.map_err(db_err)?;
        let now = Utc::now();

        let question_row = sqlx::query(
            "SELECT accepted_answer_id FROM questions WHERE id = ? AND is_deleted = 0",
        )
        .bind(question_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err)?
        .ok_or_else(|| DomainError::not_found("Question", question_id))?;
        let current: Option<Uuid> = question_row.get("accepted_answer_id");

        let answer_row = sqlx::query(
            "SELECT author_id FROM answers WHERE id = ? AND question_id = ? AND is_deleted = 0",
        )
        .bind(answer_id)
        .bind(question_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err)?
        .ok_or_else(|| DomainError::not_found("Answer", answer_id))?;
        let answer_author: Uuid = answer_row.get("author_id");

        let accepted = if current == Some(answer_id) {
            // Toggle off: acceptance removed, bonus taken back.
            sqlx::query(
                "UPDATE questions SET accepted_answer_id = NULL, updated_at = ? WHERE id = ?",
            )
            .bind(now)
            .bind(question_id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

            sqlx::query(
                "UPDATE answers SET accepted_at = NULL, accepted_by = NULL, updated_at = ? \
                 WHERE id = ?",
            )
            .bind(now)
            .bind(answer_id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

            sqlx::query("UPDATE users SET reputation = reputation - ? WHERE id = ?")
                .bind(ACCEPT_REPUTATION)
                .bind(answer_author)
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;

            false
        } else {
            // Displace whatever was accepted before, then accept the target.
            if let Some(previous_id) = current {
                sqlx::query(
                    "UPDATE users SET reputation = reputation - ? \
                     WHERE id = (SELECT author_id FROM answers WHERE id = ?)",
                )
                .bind(ACCEPT_REPUTATION)
                .bind(previous_id)
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;

                sqlx::query(
                    "UPDATE answers SET accepted_at = NULL, accepted_by = NULL, updated_at = ? \
                     WHERE id = ?",
                )
                .bind(now)
                .bind(previous_id)
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
            }

            sqlx::query(
                "UPDATE questions SET accepted_answer_id = ?, updated_at = ? WHERE id = ?",
            )
            .bind(answer_id)
            .bind(now)
            .bind(question_id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

            sqlx::query(
                "UPDATE answers SET accepted_at = ?, accepted_by = ?, updated_at = ? WHERE id = ?",
            )
            .bind(now)
            .bind(accepted_by)
            .bind(now)
            .bind(answer_id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

            sqlx::query("UPDATE users SET reputation = reputation + ? WHERE id = ?")
                .bind(ACCEPT_REPUTATION)
                .bind(answer_author)
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;

            true
        };

        tx.commit().await.map_err(db_err)?;
        Ok(AcceptOutcome { accepted })
    }
}
