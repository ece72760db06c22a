//! `UserRepo` on SQLite.

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use domains::{AccountStatus, DomainError, Page, Result, User, UserFilter, UserRepo};
use sqlx::Row;

use super::rows::UserRow;
use super::SqliteStore;
use crate::db_err;

const USER_COLUMNS: &str = "id, username, email, password_hash, avatar_url, role, status, \
     bio, location, website, reputation, questions_count, answers_count, upvotes_received, \
     created_at, updated_at";

#[async_trait]
impl UserRepo for SqliteStore {
    async fn insert(&self, user: &User) -> Result<()> {
        sqlx::query(
            "INSERT INTO users (id, username, email, password_hash, avatar_url, role, status, \
             bio, location, website, reputation, questions_count, answers_count, \
             upvotes_received, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.avatar_url)
        .bind(user.role.as_str())
        .bind(user.status.as_str())
        .bind(&user.bio)
        .bind(&user.location)
        .bind(&user.website)
        .bind(user.reputation)
        .bind(user.questions_count)
        .bind(user.answers_count)
        .bind(user.upvotes_received)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(self.pool())
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(db_err)?;
        row.map(User::try_from).transpose()
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut builder: sqlx::QueryBuilder<sqlx::Sqlite> = sqlx::QueryBuilder::new(format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id IN ("
        ));
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        builder.push(")");

        let rows: Vec<UserRow> = builder
            .build_query_as()
            .fetch_all(self.pool())
            .await
            .map_err(db_err)?;
        rows.into_iter().map(User::try_from).collect()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(self.pool())
        .await
        .map_err(db_err)?;
        row.map(User::try_from).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(self.pool())
        .await
        .map_err(db_err)?;
        row.map(User::try_from).transpose()
    }

    async fn search(&self, filter: UserFilter) -> Result<Page<User>> {
        let pattern = filter
            .search
            .as_deref()
            .map(|term| format!("%{}%", term.to_lowercase()));

        let (where_clause, total) = match &pattern {
            Some(p) => {
                let total: i64 = sqlx::query(
                    "SELECT COUNT(*) FROM users \
                     WHERE LOWER(username) LIKE ? OR LOWER(email) LIKE ?",
                )
                .bind(p)
                .bind(p)
                .fetch_one(self.pool())
                .await
                .map_err(db_err)?
                .get(0);
                ("WHERE LOWER(username) LIKE ? OR LOWER(email) LIKE ?", total)
            }
            None => {
                let total: i64 = sqlx::query("SELECT COUNT(*) FROM users")
                    .fetch_one(self.pool())
                    .await
                    .map_err(db_err)?
                    .get(0);
                ("", total)
            }
        };

        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users {where_clause} \
             ORDER BY created_at DESC LIMIT ? OFFSET ?"
        );
        let mut query = sqlx::query_as::<_, UserRow>(&sql);
        if let Some(p) = &pattern {
            query = query.bind(p).bind(p);
        }
        let rows = query
            .bind(filter.limit)
            .bind((filter.page - 1) * filter.limit)
            .fetch_all(self.pool())
            .await
            .map_err(db_err)?;

        let items = rows
            .into_iter()
            .map(User::try_from)
            .collect::<Result<Vec<_>>>()?;

        Ok(Page { items, total, page: filter.page, limit: filter.limit })
    }

    async fn set_status(&self, id: Uuid, status: AccountStatus) -> Result<User> {
        let updated = sqlx::query("UPDATE users SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(Utc::now())
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(db_err)?;
        if updated.rows_affected() == 0 {
            return Err(DomainError::not_found("User", id));
        }
        self.find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))
    }
}
