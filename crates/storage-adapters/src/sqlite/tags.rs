//! `TagRepo` on SQLite.

use async_trait::async_trait;

use domains::{Result, Tag, TagRepo, TagSort};

use super::rows::TagRow;
use super::SqliteStore;
use crate::db_err;

const TAG_COLUMNS: &str =
    "id, name, description, question_count, color, is_active, created_by, created_at";

#[async_trait]
impl TagRepo for SqliteStore {
    async fn list(&self, sort: TagSort, limit: i64, only_used: bool) -> Result<Vec<Tag>> {
        let used = if only_used { " AND question_count > 0" } else { "" };
        let order = match sort {
            TagSort::Popular => "question_count DESC",
            TagSort::Alphabetical => "name ASC",
            TagSort::Newest => "created_at DESC",
        };
        let rows = sqlx::query_as::<_, TagRow>(&format!(
            "SELECT {TAG_COLUMNS} FROM tags WHERE is_active = 1{used} \
             ORDER BY {order} LIMIT ?"
        ))
        .bind(limit)
        .fetch_all(self.pool())
        .await
        .map_err(db_err)?;
        Ok(rows.into_iter().map(Tag::from).collect())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Tag>> {
        let row = sqlx::query_as::<_, TagRow>(&format!(
            "SELECT {TAG_COLUMNS} FROM tags WHERE name = ?"
        ))
        .bind(name)
        .fetch_optional(self.pool())
        .await
        .map_err(db_err)?;
        Ok(row.map(Tag::from))
    }

    async fn insert(&self, tag: &Tag) -> Result<()> {
        sqlx::query(
            "INSERT INTO tags (id, name, description, question_count, color, is_active, \
             created_by, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(tag.id)
        .bind(&tag.name)
        .bind(&tag.description)
        .bind(tag.question_count)
        .bind(&tag.color)
        .bind(tag.is_active)
        .bind(tag.created_by)
        .bind(tag.created_at)
        .execute(self.pool())
        .await
        .map_err(db_err)?;
        Ok(())
    }
}
