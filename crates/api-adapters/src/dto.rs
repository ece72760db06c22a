//! Wire types. Requests validate shape with `validator`; deeper rules
//! (sanitization, tag normalization, uniqueness) live in the services.
//! Responses use the camelCase keys the client expects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use domains::{Notification, PlatformStats, Question, Tag, User};
use services::{AnswerView, AuthorBrief, NotificationView, QuestionListing};

// ── Requests ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 30, message = "username must be 3-30 characters"))]
    pub username: String,
    #[validate(email(message = "please provide a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "please provide a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 10, max = 200, message = "title must be between 10 and 200 characters"))]
    pub title: String,
    #[validate(length(min = 20, message = "description must be at least 20 characters"))]
    pub description: String,
    #[validate(length(min = 1, max = 5, message = "you must provide 1-5 tags"))]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddAnswerRequest {
    #[validate(length(min = 10, message = "answer content must be at least 10 characters"))]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    /// "up" or "down"; parsed into a direction by the handler.
    #[serde(rename = "type")]
    pub vote_type: String,
}

#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTagRequest {
    #[validate(length(min = 2, max = 30, message = "tag name must be between 2 and 30 characters"))]
    pub name: String,
    #[validate(length(max = 200, message = "description cannot exceed 200 characters"))]
    pub description: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuestionsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort: Option<String>,
    /// Comma-separated tag names.
    pub tags: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminQuestionsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub include_deleted: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct TagsQuery {
    pub limit: Option<i64>,
    pub sort: Option<String>,
}

// ── Responses ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: Uuid,
    pub username: String,
    pub email: String,
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
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            avatar_url: user.avatar_url.clone(),
            role: user.role.as_str().to_string(),
            status: user.status.as_str().to_string(),
            bio: user.bio.clone(),
            location: user.location.clone(),
            website: user.website.clone(),
            reputation: user.reputation,
            questions_count: user.questions_count,
            answers_count: user.answers_count,
            upvotes_received: user.upvotes_received,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDto {
    pub id: Uuid,
    pub username: String,
    pub avatar_url: String,
}

impl From<&AuthorBrief> for AuthorDto {
    fn from(author: &AuthorBrief) -> Self {
        Self {
            id: author.id,
            username: author.username.clone(),
            avatar_url: author.avatar_url.clone(),
        }
    }
}

/// List-item shape: description reduced to a preview.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSummaryDto {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub author: AuthorDto,
    pub vote_count: i64,
    pub answer_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<&QuestionListing> for QuestionSummaryDto {
    fn from(listing: &QuestionListing) -> Self {
        let q = &listing.question;
        Self {
            id: q.id,
            title: q.title.clone(),
            description: preview(&q.description),
            tags: q.tags.clone(),
            author: AuthorDto::from(&listing.author),
            vote_count: q.vote_count,
            answer_count: q.answer_count,
            created_at: q.created_at,
        }
    }
}

/// Admin list-item shape: adds the moderation columns.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminQuestionDto {
    #[serde(flatten)]
    pub summary: QuestionSummaryDto,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<Uuid>,
}

impl From<&QuestionListing> for AdminQuestionDto {
    fn from(listing: &QuestionListing) -> Self {
        Self {
            summary: QuestionSummaryDto::from(listing),
            is_deleted: listing.question.is_deleted,
            deleted_at: listing.question.deleted_at,
            deleted_by: listing.question.deleted_by,
        }
    }
}

/// Full question shape for the create response and the detail page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDto {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub author: AuthorDto,
    pub vote_count: i64,
    pub answer_count: i64,
    pub view_count: i64,
    pub accepted_answer_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_vote: Option<Option<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QuestionDto {
    pub fn new(question: &Question, author: &AuthorBrief) -> Self {
        Self {
            id: question.id,
            title: question.title.clone(),
            description: question.description.clone(),
            tags: question.tags.clone(),
            author: AuthorDto::from(author),
            vote_count: question.vote_count,
            answer_count: question.answer_count,
            view_count: question.view_count,
            accepted_answer_id: question.accepted_answer_id,
            user_vote: None,
            created_at: question.created_at,
            updated_at: question.updated_at,
        }
    }

    /// Attaches the viewer's vote; `Some(None)` serializes as an explicit
    /// `"userVote": null` for an authenticated viewer with no vote.
    pub fn with_user_vote(mut self, vote: Option<domains::VoteDirection>) -> Self {
        self.user_vote = Some(vote.map(|d| d.as_str().to_string()));
        self
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerDto {
    pub id: Uuid,
    pub question_id: Uuid,
    pub content: String,
    pub author: AuthorDto,
    pub vote_count: i64,
    pub is_accepted: bool,
    pub accepted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_vote: Option<Option<String>>,
    pub created_at: DateTime<Utc>,
}

impl AnswerDto {
    pub fn new(view: &AnswerView, question: &Question, authenticated: bool) -> Self {
        Self {
            id: view.answer.id,
            question_id: view.answer.question_id,
            content: view.answer.content.clone(),
            author: AuthorDto::from(&view.author),
            vote_count: view.answer.vote_count,
            is_accepted: question.is_accepted(view.answer.id),
            accepted_at: view.answer.accepted_at,
            user_vote: authenticated
                .then(|| view.user_vote.map(|d| d.as_str().to_string())),
            created_at: view.answer.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagDto {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub question_count: i64,
    pub color: String,
}

impl From<&Tag> for TagDto {
    fn from(tag: &Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name.clone(),
            description: tag.description.clone(),
            question_count: tag.question_count,
            color: tag.color.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDto {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub is_read: bool,
    pub sender: Option<AuthorDto>,
    pub related_question: Option<RelatedQuestionDto>,
    pub related_answer: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct RelatedQuestionDto {
    pub id: Uuid,
    pub title: String,
}

impl From<&NotificationView> for NotificationDto {
    fn from(view: &NotificationView) -> Self {
        let n: &Notification = &view.notification;
        Self {
            id: n.id,
            kind: n.kind.as_str().to_string(),
            message: n.message.clone(),
            timestamp: n.created_at,
            is_read: n.is_read,
            sender: view.sender.as_ref().map(AuthorDto::from),
            related_question: n.question_id.map(|id| RelatedQuestionDto {
                id,
                title: view.question_title.clone().unwrap_or_default(),
            }),
            related_answer: n.answer_id,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsDto {
    pub users: UserStatsDto,
    pub content: ContentStatsDto,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatsDto {
    pub total_users: i64,
    pub active_users: i64,
    pub blocked_users: i64,
    pub recent_users: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentStatsDto {
    pub total_questions: i64,
    pub active_questions: i64,
    pub deleted_questions: i64,
    pub recent_questions: i64,
    pub total_answers: i64,
    pub active_answers: i64,
    pub deleted_answers: i64,
    pub recent_answers: i64,
    pub total_tags: i64,
}

impl From<&PlatformStats> for StatsDto {
    fn from(stats: &PlatformStats) -> Self {
        Self {
            users: UserStatsDto {
                total_users: stats.total_users,
                active_users: stats.active_users,
                blocked_users: stats.blocked_users,
                recent_users: stats.recent_users,
            },
            content: ContentStatsDto {
                total_questions: stats.total_questions,
                active_questions: stats.total_questions - stats.deleted_questions,
                deleted_questions: stats.deleted_questions,
                recent_questions: stats.recent_questions,
                total_answers: stats.total_answers,
                active_answers: stats.total_answers - stats.deleted_answers,
                deleted_answers: stats.deleted_answers,
                recent_answers: stats.recent_answers,
                total_tags: stats.total_tags,
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationDto {
    pub page: i64,
    pub total_pages: i64,
    pub total_items: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationDto {
    pub fn from_page<T>(page: &domains::Page<T>) -> Self {
        Self {
            page: page.page,
            total_pages: page.total_pages(),
            total_items: page.total,
            has_next: page.has_next(),
            has_prev: page.has_prev(),
        }
    }
}

/// The 200-character preview the question list shows.
fn preview(description: &str) -> String {
    let truncated: String = description.chars().take(200).collect();
    format!("{truncated}...")
}
