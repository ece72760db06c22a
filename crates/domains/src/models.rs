//! Domain models.
//!
//! These structs represent the core entities of the Q&A forum.
//! We use UUID v7 for time-ordered, globally unique identification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::error::DomainError;

/// Account role. Admins get the moderation surface on top of normal usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(DomainError::validation(format!("unknown role `{other}`"))),
        }
    }
}

/// Whether the account may authenticate. Blocked accounts keep their data
/// but every credential check fails until an admin unblocks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Blocked,
}

impl AccountStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Blocked => "blocked",
        }
    }
}

impl FromStr for AccountStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(AccountStatus::Active),
            "blocked" => Ok(AccountStatus::Blocked),
            other => Err(DomainError::validation(format!(
                "unknown account status `{other}`"
            ))),
        }
    }
}

/// A registered account. `reputation` and `upvotes_received` are derived
/// counters mutated only by vote/accept side effects; accounts are never
/// hard-deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// Argon2 PHC string. Never serialized out of the process.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub avatar_url: String,
    pub role: Role,
    pub status: AccountStatus,
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

impl User {
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            username,
            email,
            password_hash,
            avatar_url: String::new(),
            role: Role::User,
            status: AccountStatus::Active,
            bio: String::new(),
            location: String::new(),
            website: String::new(),
            reputation: 0,
            questions_count: 0,
            answers_count: 0,
            upvotes_received: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_blocked(&self) -> bool {
        self.status == AccountStatus::Blocked
    }
}

/// A question. Acceptance state lives here: `accepted_answer_id` is the
/// single source of truth, so "at most one accepted answer" holds by
/// construction rather than by convention across sibling rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    pub title: String,
    /// Sanitized HTML. Raw input never reaches storage.
    pub description: String,
    /// Normalized (lowercase, trimmed) tag names, 1 to 5 of them.
    pub tags: Vec<String>,
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

impl Question {
    pub fn new(author_id: Uuid, title: String, description: String, tags: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            title,
            description,
            tags,
            author_id,
            vote_count: 0,
            answer_count: 0,
            view_count: 0,
            accepted_answer_id: None,
            is_deleted: false,
            deleted_at: None,
            deleted_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_accepted(&self, answer_id: Uuid) -> bool {
        self.accepted_answer_id == Some(answer_id)
    }
}

/// An answer to a question. Whether it is accepted is decided by the parent
/// question's `accepted_answer_id`; the fields here are the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub id: Uuid,
    pub question_id: Uuid,
    pub author_id: Uuid,
    /// Sanitized HTML.
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

impl Answer {
    pub fn new(question_id: Uuid, author_id: Uuid, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            question_id,
            author_id,
            content,
            vote_count: 0,
            accepted_at: None,
            accepted_by: None,
            is_deleted: false,
            deleted_at: None,
            deleted_by: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A tag. `question_count` counts live (non-deleted) questions carrying it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub question_count: i64,
    pub color: String,
    pub is_active: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Tag {
    pub const DEFAULT_COLOR: &'static str = "#3B82F6";

    pub fn new(name: String, description: String, color: Option<String>, created_by: Option<Uuid>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name,
            description,
            question_count: 0,
            color: color.unwrap_or_else(|| Self::DEFAULT_COLOR.to_string()),
            is_active: true,
            created_by,
            created_at: Utc::now(),
        }
    }
}

/// What triggered a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Answer,
    Comment,
    Mention,
    Vote,
    Accept,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Answer => "answer",
            NotificationKind::Comment => "comment",
            NotificationKind::Mention => "mention",
            NotificationKind::Vote => "vote",
            NotificationKind::Accept => "accept",
        }
    }
}

impl FromStr for NotificationKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "answer" => Ok(NotificationKind::Answer),
            "comment" => Ok(NotificationKind::Comment),
            "mention" => Ok(NotificationKind::Mention),
            "vote" => Ok(NotificationKind::Vote),
            "accept" => Ok(NotificationKind::Accept),
            other => Err(DomainError::validation(format!(
                "unknown notification kind `{other}`"
            ))),
        }
    }
}

/// A message delivered to a user as a side effect of someone else's action.
/// Only the read flag is ever updated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub sender_id: Option<Uuid>,
    pub kind: NotificationKind,
    pub message: String,
    pub question_id: Option<Uuid>,
    pub answer_id: Option<Uuid>,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        recipient_id: Uuid,
        sender_id: Option<Uuid>,
        kind: NotificationKind,
        message: String,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            recipient_id,
            sender_id,
            kind,
            message,
            question_id: None,
            answer_id: None,
            is_read: false,
            read_at: None,
            created_at: Utc::now(),
        }
    }

    pub fn about_question(mut self, question_id: Uuid) -> Self {
        self.question_id = Some(question_id);
        self
    }

    pub fn about_answer(mut self, answer_id: Uuid) -> Self {
        self.answer_id = Some(answer_id);
        self
    }
}

/// A page of results plus the bookkeeping the list endpoints report.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> i64 {
        if self.limit == 0 {
            0
        } else {
            (self.total + self.limit - 1) / self.limit
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}
