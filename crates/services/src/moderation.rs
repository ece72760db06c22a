//! Admin moderation: user management, content soft-deletes, platform stats,
//! tag administration. Every operation here assumes the caller's admin role
//! was already enforced at the request layer; the guards below are the
//! business rules that apply even to admins.

use chrono::{Duration, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use uuid::Uuid;

use domains::{
    AccountStatus, AnswerRepo, DomainError, Page, PlatformStats, QuestionFilter, QuestionRepo,
    QuestionSort, Result, StatsRepo, Tag, TagRepo, User, UserFilter, UserRepo,
};

use crate::questions::{AuthorBrief, QuestionListing};

static TAG_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9-]{2,30}$").unwrap());
static HEX_COLOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").unwrap());

const TAG_DESCRIPTION_MAX: usize = 200;
const RECENT_WINDOW_DAYS: i64 = 30;

pub struct ModerationService {
    users: Arc<dyn UserRepo>,
    questions: Arc<dyn QuestionRepo>,
    answers: Arc<dyn AnswerRepo>,
    tags: Arc<dyn TagRepo>,
    stats: Arc<dyn StatsRepo>,
}

impl ModerationService {
    pub fn new(
        users: Arc<dyn UserRepo>,
        questions: Arc<dyn QuestionRepo>,
        answers: Arc<dyn AnswerRepo>,
        tags: Arc<dyn TagRepo>,
        stats: Arc<dyn StatsRepo>,
    ) -> Self {
        Self { users, questions, answers, tags, stats }
    }

    pub async fn list_users(&self, mut filter: UserFilter) -> Result<Page<User>> {
        filter.page = filter.page.max(1);
        filter.limit = filter.limit.clamp(1, 100);
        self.users.search(filter).await
    }

    /// Blocks or unblocks an account. Admin accounts cannot be blocked, and
    /// no admin may change their own status.
    pub async fn set_user_status(
        &self,
        caller: &User,
        target_id: Uuid,
        status: AccountStatus,
    ) -> Result<User> {
        let target = self
            .users
            .find_by_id(target_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", target_id))?;

        if target.is_admin() && status == AccountStatus::Blocked {
            return Err(DomainError::validation("cannot block admin users"));
        }
        if target.id == caller.id {
            return Err(DomainError::validation("cannot change your own status"));
        }

        let updated = self.users.set_status(target_id, status).await?;
        tracing::info!(
            target = %target_id,
            status = status.as_str(),
            admin = %caller.id,
            "user status changed"
        );
        Ok(updated)
    }

    /// Admin question listing; unlike the public one it can include
    /// soft-deleted rows.
    pub async fn list_questions(
        &self,
        page: i64,
        limit: i64,
        include_deleted: bool,
    ) -> Result<Page<QuestionListing>> {
        let page = self
            .questions
            .list(QuestionFilter {
                page: page.max(1),
                limit: limit.clamp(1, 100),
                sort: QuestionSort::Newest,
                tags: Vec::new(),
                search: None,
                include_deleted,
            })
            .await?;

        let mut author_ids: Vec<Uuid> = page.items.iter().map(|q| q.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();
        let authors: std::collections::HashMap<Uuid, AuthorBrief> = self
            .users
            .find_by_ids(&author_ids)
            .await?
            .iter()
            .map(|u| (u.id, AuthorBrief::from(u)))
            .collect();

        let items = page
            .items
            .into_iter()
            .map(|question| {
                let author = authors.get(&question.author_id).cloned().unwrap_or(AuthorBrief {
                    id: question.author_id,
                    username: "[unknown]".to_string(),
                    avatar_url: String::new(),
                });
                QuestionListing { question, author }
            })
            .collect();

        Ok(Page { items, total: page.total, page: page.page, limit: page.limit })
    }

    pub async fn delete_question(&self, caller: &User, id: Uuid) -> Result<()> {
        let question = self
            .questions
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Question", id))?;
        if question.is_deleted {
            return Err(DomainError::validation("question is already deleted"));
        }
        self.questions.soft_delete(id, caller.id).await?;
        tracing::info!(question = %id, admin = %caller.id, "question soft-deleted");
        Ok(())
    }

    pub async fn delete_answer(&self, caller: &User, id: Uuid) -> Result<()> {
        let answer = self
            .answers
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Answer", id))?;
        if answer.is_deleted {
            return Err(DomainError::validation("answer is already deleted"));
        }
        self.answers.soft_delete(id, caller.id).await?;
        tracing::info!(answer = %id, admin = %caller.id, "answer soft-deleted");
        Ok(())
    }

    pub async fn platform_stats(&self) -> Result<PlatformStats> {
        let since = Utc::now() - Duration::days(RECENT_WINDOW_DAYS);
        self.stats.platform_stats(since).await
    }

    pub async fn create_tag(
        &self,
        caller: &User,
        name: &str,
        description: Option<&str>,
        color: Option<&str>,
    ) -> Result<Tag> {
        let name = name.trim().to_lowercase();
        if !TAG_NAME.is_match(&name) {
            return Err(DomainError::validation(
                "tag name must be 2-30 characters of lowercase letters, numbers, and hyphens",
            ));
        }
        let description = description.unwrap_or("").trim().to_string();
        if description.chars().count() > TAG_DESCRIPTION_MAX {
            return Err(DomainError::validation(format!(
                "description cannot exceed {TAG_DESCRIPTION_MAX} characters"
            )));
        }
        if let Some(color) = color {
            if !HEX_COLOR.is_match(color) {
                return Err(DomainError::validation(
                    "color must be a valid hex color code",
                ));
            }
        }

        if self.tags.find_by_name(&name).await?.is_some() {
            return Err(DomainError::conflict("tag already exists"));
        }

        let tag = Tag::new(
            name,
            description,
            color.map(str::to_string),
            Some(caller.id),
        );
        self.tags.insert(&tag).await?;
        Ok(tag)
    }
}
