//! Core port traits.
//!
//! Any adapter must implement these traits to be used by the binary. The
//! multi-row mutations (vote application, acceptance toggling, creation with
//! counter bumps) are single port methods so an adapter can make each one
//! atomic in its own storage engine.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{DomainError, Result};
use crate::models::{
    AccountStatus, Answer, Notification, Page, Question, Tag, User,
};
use crate::votes::{VoteApplied, VoteDirection, VoteTargetKind};

/// Sort orders for the public question listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuestionSort {
    #[default]
    Newest,
    Unanswered,
    Votes,
}

impl FromStr for QuestionSort {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "newest" => Ok(QuestionSort::Newest),
            "unanswered" => Ok(QuestionSort::Unanswered),
            "votes" => Ok(QuestionSort::Votes),
            other => Err(DomainError::validation(format!(
                "invalid sort option `{other}`"
            ))),
        }
    }
}

/// Sort orders for the tag listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagSort {
    #[default]
    Popular,
    Alphabetical,
    Newest,
}

impl FromStr for TagSort {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "popular" => Ok(TagSort::Popular),
            "alphabetical" => Ok(TagSort::Alphabetical),
            "newest" => Ok(TagSort::Newest),
            other => Err(DomainError::validation(format!(
                "invalid sort option `{other}`"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionFilter {
    pub page: i64,
    pub limit: i64,
    pub sort: QuestionSort,
    pub tags: Vec<String>,
    pub search: Option<String>,
    pub include_deleted: bool,
}

impl Default for QuestionFilter {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            sort: QuestionSort::Newest,
            tags: Vec::new(),
            search: None,
            include_deleted: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserFilter {
    pub page: i64,
    pub limit: i64,
    pub search: Option<String>,
}

impl Default for UserFilter {
    fn default() -> Self {
        Self { page: 1, limit: 20, search: None }
    }
}

/// Result of the atomic acceptance toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcceptOutcome {
    /// True if the answer ended up accepted, false if acceptance was removed.
    pub accepted: bool,
}

/// A page of notifications plus the recipient's unread total.
#[derive(Debug, Clone)]
pub struct NotificationFeed {
    pub page: Page<Notification>,
    pub unread: i64,
}

/// Counts backing the admin stats endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlatformStats {
    pub total_users: i64,
    pub active_users: i64,
    pub blocked_users: i64,
    pub recent_users: i64,
    pub total_questions: i64,
    pub deleted_questions: i64,
    pub recent_questions: i64,
    pub total_answers: i64,
    pub deleted_answers: i64,
    pub recent_answers: i64,
    pub total_tags: i64,
}

/// Persistence contract for accounts.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Fails with `Conflict` when the username or email is already taken.
    async fn insert(&self, user: &User) -> Result<()>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
    /// Bulk lookup for decorating listings with author details. Missing ids
    /// are simply absent from the result.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
    /// Admin listing: username/email substring search, newest first.
    async fn search(&self, filter: UserFilter) -> Result<Page<User>>;
    async fn set_status(&self, id: Uuid, status: AccountStatus) -> Result<User>;
}

/// Persistence contract for questions, including acceptance state.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait QuestionRepo: Send + Sync {
    /// Inserts the question, bumps the author's `questions_count`, and
    /// upserts/increments every tag, all atomically.
    async fn create(&self, question: &Question) -> Result<()>;
    /// Returns the row regardless of its soft-delete flag; callers decide
    /// what deleted rows mean for them.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Question>>;
    async fn list(&self, filter: QuestionFilter) -> Result<Page<Question>>;
    async fn record_view(&self, id: Uuid) -> Result<()>;
    /// Marks deleted and decrements each of its tags' live counts atomically.
    async fn soft_delete(&self, id: Uuid, deleted_by: Uuid) -> Result<()>;
    /// The acceptance state machine, serialized per question by running as
    /// one transaction: clears any currently accepted answer, then either
    /// accepts the target (stamping audit fields and granting reputation) or
    /// removes acceptance if the target was the one accepted (taking the
    /// reputation back).
    async fn toggle_accepted(
        &self,
        question_id: Uuid,
        answer_id: Uuid,
        accepted_by: Uuid,
    ) -> Result<AcceptOutcome>;
}

/// Persistence contract for answers.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait AnswerRepo: Send + Sync {
    /// Inserts the answer, bumps the question's `answer_count` and the
    /// author's `answers_count`, all atomically.
    async fn create(&self, answer: &Answer) -> Result<()>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Answer>>;
    /// Live answers for a question: accepted first, then by votes
    /// descending, then oldest first.
    async fn list_for_question(&self, question_id: Uuid) -> Result<Vec<Answer>>;
    /// Marks deleted and decrements the question's `answer_count` atomically.
    async fn soft_delete(&self, id: Uuid, deleted_by: Uuid) -> Result<()>;
}

/// Persistence contract for the vote ledger.
///
/// The ledger is keyed per (target kind, target id, voter), so applying a
/// vote is a conditional per-voter upsert rather than a whole-document
/// read-modify-write.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait VoteStore: Send + Sync {
    async fn find(
        &self,
        kind: VoteTargetKind,
        target_id: Uuid,
        voter_id: Uuid,
    ) -> Result<Option<VoteDirection>>;

    /// The voter's current directions across many targets of one kind, for
    /// decorating listings with per-caller vote state.
    async fn find_for_voter(
        &self,
        kind: VoteTargetKind,
        target_ids: &[Uuid],
        voter_id: Uuid,
    ) -> Result<Vec<(Uuid, VoteDirection)>>;

    /// Applies one vote request atomically: mutates the voter's row per
    /// [`crate::votes::resolve_vote`], recounts the target's `vote_count`
    /// from the rows, and applies the author's reputation and
    /// `upvotes_received` deltas, all in one transaction.
    async fn apply(
        &self,
        kind: VoteTargetKind,
        target_id: Uuid,
        target_author_id: Uuid,
        voter_id: Uuid,
        requested: VoteDirection,
    ) -> Result<VoteApplied>;
}

/// Persistence contract for tags.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait TagRepo: Send + Sync {
    /// Active tags; `only_used` drops tags with no live questions.
    async fn list(&self, sort: TagSort, limit: i64, only_used: bool) -> Result<Vec<Tag>>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Tag>>;
    /// Fails with `Conflict` when the name is already taken.
    async fn insert(&self, tag: &Tag) -> Result<()>;
}

/// Persistence contract for notifications.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait NotificationRepo: Send + Sync {
    async fn insert(&self, notification: &Notification) -> Result<()>;
    async fn list_for(&self, recipient_id: Uuid, page: i64, limit: i64)
        -> Result<NotificationFeed>;
    /// Scoped to the recipient so one user can never read another's feed.
    async fn find_for(&self, id: Uuid, recipient_id: Uuid) -> Result<Option<Notification>>;
    async fn mark_read(&self, id: Uuid, recipient_id: Uuid, at: DateTime<Utc>) -> Result<()>;
    /// Returns how many notifications were flipped to read.
    async fn mark_all_read(&self, recipient_id: Uuid, at: DateTime<Utc>) -> Result<u64>;
}

/// Read-only counts for the admin dashboard.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait StatsRepo: Send + Sync {
    async fn platform_stats(&self, recent_since: DateTime<Utc>) -> Result<PlatformStats>;
}

/// Credential hashing contract.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String>;
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Signed-token contract: issue a token for a user, or resolve a presented
/// token back to the user id it was issued for.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait TokenService: Send + Sync {
    fn issue(&self, user_id: Uuid) -> Result<String>;
    fn verify(&self, token: &str) -> Result<Uuid>;
}
