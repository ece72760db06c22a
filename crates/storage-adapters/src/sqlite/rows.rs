//! Row structs mapping SQLite columns back onto domain models.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domains::{
    Answer, DomainError, Notification, Question, Result, Tag, User,
};

#[derive(FromRow)]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub avatar_url: String,
    pub role: String,
    pub status: String,
    pub bio: String,
    pub location: String,
    pub website: String,
    pub reputation: i64,
    pub questions_count: i64,
    pub answers_count: i64,
    pub upvotes_received: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self> {
        Ok(User {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            avatar_url: row.avatar_url,
            role: row.role.parse()?,
            status: row.status.parse()?,
            bio: row.bio,
            location: row.location,
            website: row.website,
            reputation: row.reputation,
            questions_count: row.questions_count,
            answers_count: row.answers_count,
            upvotes_received: row.upvotes_received,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
pub(crate) struct QuestionRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub author_id: Uuid,
    pub vote_count: i64,
    pub answer_count: i64,
    pub view_count: i64,
    pub accepted_answer_id: Option<Uuid>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QuestionRow {
    /// Tags live in their own table; the caller fetches and attaches them.
    pub(crate) fn into_question(self, tags: Vec<String>) -> Question {
        Question {
            id: self.id,
            title: self.title,
            description: self.description,
            tags,
            author_id: self.author_id,
            vote_count: self.vote_count,
            answer_count: self.answer_count,
            view_count: self.view_count,
            accepted_answer_id: self.accepted_answer_id,
            is_deleted: self.is_deleted,
            deleted_at: self.deleted_at,
            deleted_by: self.deleted_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(FromRow)]
pub(crate) struct AnswerRow {
    pub id: Uuid,
    pub question_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub vote_count: i64,
    pub accepted_at: Option<DateTime<Utc>>,
    pub accepted_by: Option<Uuid>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AnswerRow> for Answer {
    fn from(row: AnswerRow) -> Self {
        Answer {
            id: row.id,
            question_id: row.question_id,
            author_id: row.author_id,
            content: row.content,
            vote_count: row.vote_count,
            accepted_at: row.accepted_at,
            accepted_by: row.accepted_by,
            is_deleted: row.is_deleted,
            deleted_at: row.deleted_at,
            deleted_by: row.deleted_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
pub(crate) struct TagRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub question_count: i64,
    pub color: String,
    pub is_active: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<TagRow> for Tag {
    fn from(row: TagRow) -> Self {
        Tag {
            id: row.id,
            name: row.name,
            description: row.description,
            question_count: row.question_count,
            color: row.color,
            is_active: row.is_active,
            created_by: row.created_by,
            created_at: row.created_at,
        }
    }
}

#[derive(FromRow)]
pub(crate) struct NotificationRow {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub sender_id: Option<Uuid>,
    pub kind: String,
    pub message: String,
    pub question_id: Option<Uuid>,
    pub answer_id: Option<Uuid>,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = DomainError;

    fn try_from(row: NotificationRow) -> Result<Self> {
        Ok(Notification {
            id: row.id,
            recipient_id: row.recipient_id,
            sender_id: row.sender_id,
            kind: row.kind.parse()?,
            message: row.message,
            question_id: row.question_id,
            answer_id: row.answer_id,
            is_read: row.is_read,
            read_at: row.read_at,
            created_at: row.created_at,
        })
    }
}
