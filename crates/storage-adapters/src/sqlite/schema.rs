//! Schema bootstrap and versioned migrations.

use sqlx::{Row, SqlitePool};

use domains::Result;

use crate::db_err;

/// Creates the migrations ledger and applies any pending migrations.
pub async fn initialize_database(pool: &SqlitePool) -> Result<()> {
    tracing::info!("initializing database schema");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(db_err)?;

    let current_version: i64 = sqlx::query("SELECT COALESCE(MAX(version), 0) FROM migrations")
        .fetch_one(pool)
        .await
        .map_err(db_err)?
        .get(0);

    for (version, sql) in migrations() {
        if version <= current_version {
            continue;
        }
        tracing::info!(version, "applying migration");

        let mut tx = pool.begin().await.map_err(db_err)?;
        for statement in sql.split(';').filter(|s| !s.trim().is_empty()) {
            sqlx::query(statement).execute(&mut *tx).await.map_err(db_err)?;
        }
        sqlx::query("INSERT INTO migrations (version) VALUES (?)")
            .bind(version)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        tx.commit().await.map_err(db_err)?;
    }

    Ok(())
}

fn migrations() -> Vec<(i64, &'static str)> {
    vec![(
        1,
        r#"
        CREATE TABLE users (
            id BLOB PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            avatar_url TEXT NOT NULL DEFAULT '',
            role TEXT NOT NULL DEFAULT 'user' CHECK (role IN ('user', 'admin')),
            status TEXT NOT NULL DEFAULT 'active' CHECK (status IN ('active', 'blocked')),
            bio TEXT NOT NULL DEFAULT '',
            location TEXT NOT NULL DEFAULT '',
            website TEXT NOT NULL DEFAULT '',
            reputation INTEGER NOT NULL DEFAULT 0,
            questions_count INTEGER NOT NULL DEFAULT 0,
            answers_count INTEGER NOT NULL DEFAULT 0,
            upvotes_received INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE questions (
            id BLOB PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            author_id BLOB NOT NULL REFERENCES users(id),
            vote_count INTEGER NOT NULL DEFAULT 0,
            answer_count INTEGER NOT NULL DEFAULT 0,
            view_count INTEGER NOT NULL DEFAULT 0,
            accepted_answer_id BLOB,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            deleted_at TEXT,
            deleted_by BLOB,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE INDEX idx_questions_author ON questions(author_id);
        CREATE INDEX idx_questions_created ON questions(created_at DESC);
        CREATE INDEX idx_questions_votes ON questions(vote_count DESC);
        CREATE INDEX idx_questions_answer_count ON questions(answer_count);

        CREATE TABLE question_tags (
            question_id BLOB NOT NULL REFERENCES questions(id),
            tag_name TEXT NOT NULL,
            position INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (question_id, tag_name)
        );
        CREATE INDEX idx_question_tags_tag ON question_tags(tag_name);

        CREATE TABLE answers (
            id BLOB PRIMARY KEY,
            question_id BLOB NOT NULL REFERENCES questions(id),
            author_id BLOB NOT NULL REFERENCES users(id),
            content TEXT NOT NULL,
            vote_count INTEGER NOT NULL DEFAULT 0,
            accepted_at TEXT,
            accepted_by BLOB,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            deleted_at TEXT,
            deleted_by BLOB,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE INDEX idx_answers_question ON answers(question_id);
        CREATE INDEX idx_answers_author ON answers(author_id);

        CREATE TABLE votes (
            target_kind TEXT NOT NULL CHECK (target_kind IN ('question', 'answer')),
            target_id BLOB NOT NULL,
            voter_id BLOB NOT NULL REFERENCES users(id),
            direction TEXT NOT NULL CHECK (direction IN ('up', 'down')),
            created_at TEXT NOT NULL,
            PRIMARY KEY (target_kind, target_id, voter_id)
        );
        CREATE INDEX idx_votes_voter ON votes(voter_id);

        CREATE TABLE tags (
            id BLOB PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            description TEXT NOT NULL DEFAULT '',
            question_count INTEGER NOT NULL DEFAULT 0,
            color TEXT NOT NULL DEFAULT '#3B82F6',
            is_active INTEGER NOT NULL DEFAULT 1,
            created_by BLOB,
            created_at TEXT NOT NULL
        );
        CREATE INDEX idx_tags_question_count ON tags(question_count DESC);

        CREATE TABLE notifications (
            id BLOB PRIMARY KEY,
            recipient_id BLOB NOT NULL REFERENCES users(id),
            sender_id BLOB,
            kind TEXT NOT NULL CHECK (kind IN ('answer', 'comment', 'mention', 'vote', 'accept')),
            message TEXT NOT NULL,
            question_id BLOB,
            answer_id BLOB,
            is_read INTEGER NOT NULL DEFAULT 0,
            read_at TEXT,
            created_at TEXT NOT NULL
        );
        CREATE INDEX idx_notifications_recipient ON notifications(recipient_id, is_read);
        CREATE INDEX idx_notifications_created ON notifications(created_at DESC)
        "#,
    )]
}
