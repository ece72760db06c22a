//! `VoteStore` on SQLite.
//!
//! One vote is one row keyed (target_kind, target_id, voter_id). Applying a
//! vote is a conditional upsert against that key plus a recount of the
//! target's aggregate, all inside a single transaction, so concurrent voters
//! serialize instead of overwriting each other's ledger entries.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Row, Sqlite};
use uuid::Uuid;

use domains::{
    reputation_delta, resolve_vote, upvotes_received_delta, Result, VoteApplied, VoteDirection,
    VoteMutation, VoteStore, VoteTargetKind,
};

use super::SqliteStore;
use crate::db_err;

fn target_table(kind: VoteTargetKind) -> &'static str {
    match kind {
        VoteTargetKind::Question => "questions",
        VoteTargetKind::Answer => "answers",
    }
}

#[async_trait]
impl VoteStore for SqliteStore {
    async fn find(
        &self,
        kind: VoteTargetKind,
        target_id: Uuid,
        voter_id: Uuid,
    ) -> Result<Option<VoteDirection>> {
        let direction: Option<String> = sqlx::query_scalar(
            "SELECT direction FROM votes \
             WHERE target_kind = ? AND target_id = ? AND voter_id = ?",
        )
        .bind(kind.as_str())
        .bind(target_id)
        .bind(voter_id)
        .fetch_optional(self.pool())
        .await
        .map_err(db_err)?;
        direction.map(|d| d.parse()).transpose()
    }

    async fn find_for_voter(
        &self,
        kind: VoteTargetKind,
        target_ids: &[Uuid],
        voter_id: Uuid,
    ) -> Result<Vec<(Uuid, VoteDirection)>> {
        if target_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT target_id, direction FROM votes WHERE target_kind = ",
        );
        builder.push_bind(kind.as_str());
        builder.push(" AND voter_id = ");
        builder.push_bind(voter_id);
        builder.push(" AND target_id IN (");
        let mut separated = builder.separated(", ");
        for id in target_ids {
            separated.push_bind(*id);
        }
        builder.push(")");

        let rows = builder
            .build()
            .fetch_all(self.pool())
            .await
            .map_err(db_err)?;

        rows.into_iter()
            .map(|row| {
                let id: Uuid = row.get("target_id");
                let direction: String = row.get("direction");
                Ok((id, direction.parse()?))
            })
            .collect()
    }

    async fn apply(
        &self,
        kind: VoteTargetKind,
        target_id: Uuid,
        target_author_id: Uuid,
        voter_id: Uuid,
        requested: VoteDirection,
    ) -> Result<VoteApplied> {
        let mut tx = self.pool().begin().await.map_err(db_err)?;

        let previous: Option<VoteDirection> = sqlx::query_scalar::<_, String>(
            "SELECT direction FROM votes \
             WHERE target_kind = ? AND target_id = ? AND voter_id = ?",
        )
        .bind(kind.as_str())
        .bind(target_id)
        .bind(voter_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err)?
        .map(|d| d.parse())
        .transpose()?;

        let (mutation, current) = resolve_vote(previous, requested);
        match mutation {
            VoteMutation::Insert => {
                sqlx::query(
                    "INSERT INTO votes (target_kind, target_id, voter_id, direction, created_at) \
                     VALUES (?, ?, ?, ?, ?)",
                )
                .bind(kind.as_str())
                .bind(target_id)
                .bind(voter_id)
                .bind(requested.as_str())
                .bind(Utc::now())
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
            }
            VoteMutation::Remove => {
                sqlx::query(
                    "DELETE FROM votes \
                     WHERE target_kind = ? AND target_id = ? AND voter_id = ?",
                )
                .bind(kind.as_str())
                .bind(target_id)
                .bind(voter_id)
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
            }
            VoteMutation::Replace => {
                sqlx::query(
                    "UPDATE votes SET direction = ?, created_at = ? \
                     WHERE target_kind = ? AND target_id = ? AND voter_id = ?",
                )
                .bind(requested.as_str())
                .bind(Utc::now())
                .bind(kind.as_str())
                .bind(target_id)
                .bind(voter_id)
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
            }
        }

        // Recount from the rows rather than trusting a delta; the stored
        // aggregate can then never drift from the ledger.
        let vote_count: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(CASE direction WHEN 'up' THEN 1 ELSE -1 END), 0) \
             FROM votes WHERE target_kind = ? AND target_id = ?",
        )
        .bind(kind.as_str())
        .bind(target_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err)?;

        sqlx::query(&format!(
            "UPDATE {} SET vote_count = ?, updated_at = ? WHERE id = ?",
            target_table(kind)
        ))
        .bind(vote_count)
        .bind(Utc::now())
        .bind(target_id)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        let reputation = reputation_delta(previous, current);
        let upvotes = upvotes_received_delta(previous, current);
        if reputation != 0 || upvotes != 0 {
            sqlx::query(
                "UPDATE users SET reputation = reputation + ?, \
                 upvotes_received = upvotes_received + ? WHERE id = ?",
            )
            .bind(reputation)
            .bind(upvotes)
            .bind(target_author_id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        }

        tx.commit().await.map_err(db_err)?;
        Ok(VoteApplied { previous, current, vote_count })
    }
}
