//! Creating, listing, and reading questions; posting answers.

use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use domains::{
    Answer, AnswerRepo, DomainError, Notification, NotificationKind, NotificationRepo, Page,
    Question, QuestionFilter, QuestionRepo, Result, User, UserRepo, VoteDirection, VoteStore,
    VoteTargetKind,
};

use crate::sanitize::sanitize_html;

pub const TITLE_MIN: usize = 10;
pub const TITLE_MAX: usize = 200;
pub const DESCRIPTION_MIN: usize = 20;
pub const ANSWER_MIN: usize = 10;
pub const TAGS_MAX: usize = 5;
pub const TAG_NAME_MAX: usize = 30;
pub const LIST_LIMIT_MAX: i64 = 50;

/// Raw question input, pre-validation.
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
}

/// The slice of an account that listings show next to content.
#[derive(Debug, Clone)]
pub struct AuthorBrief {
    pub id: Uuid,
    pub username: String,
    pub avatar_url: String,
}

impl From<&User> for AuthorBrief {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            avatar_url: user.avatar_url.clone(),
        }
    }
}

impl AuthorBrief {
    /// Accounts are never hard-deleted, so a missing author means a torn
    /// reference; render a placeholder rather than failing the page.
    fn missing(id: Uuid) -> Self {
        Self { id, username: "[unknown]".to_string(), avatar_url: String::new() }
    }
}

/// A question joined with its author, as the listings present it.
#[derive(Debug, Clone)]
pub struct QuestionListing {
    pub question: Question,
    pub author: AuthorBrief,
}

/// An answer joined with its author and, for an authenticated viewer, the
/// viewer's current vote on it.
#[derive(Debug, Clone)]
pub struct AnswerView {
    pub answer: Answer,
    pub author: AuthorBrief,
    pub user_vote: Option<VoteDirection>,
}

/// A question plus everything its detail page needs.
#[derive(Debug, Clone)]
pub struct QuestionDetail {
    pub question: Question,
    pub author: AuthorBrief,
    pub answers: Vec<AnswerView>,
    pub user_vote: Option<VoteDirection>,
}

pub struct QuestionService {
    questions: Arc<dyn QuestionRepo>,
    answers: Arc<dyn AnswerRepo>,
    votes: Arc<dyn VoteStore>,
    notifications: Arc<dyn NotificationRepo>,
    users: Arc<dyn UserRepo>,
}

impl QuestionService {
    pub fn new(
        questions: Arc<dyn QuestionRepo>,
        answers: Arc<dyn AnswerRepo>,
        votes: Arc<dyn VoteStore>,
        notifications: Arc<dyn NotificationRepo>,
        users: Arc<dyn UserRepo>,
    ) -> Self {
        Self { questions, answers, votes, notifications, users }
    }

    pub async fn create(&self, caller: &User, input: NewQuestion) -> Result<Question> {
        let title = input.title.trim().to_string();
        if title.chars().count() < TITLE_MIN || title.chars().count() > TITLE_MAX {
            return Err(DomainError::validation(format!(
                "title must be between {TITLE_MIN} and {TITLE_MAX} characters"
            )));
        }
        if input.description.trim().chars().count() < DESCRIPTION_MIN {
            return Err(DomainError::validation(format!(
                "description must be at least {DESCRIPTION_MIN} characters"
            )));
        }
        let tags = normalize_tags(&input.tags)?;
        let description = sanitize_html(&input.description);

        let question = Question::new(caller.id, title, description, tags);
        self.questions.create(&question).await?;

        tracing::info!(question = %question.id, author = %caller.id, "question created");
        Ok(question)
    }

    /// Public listing. Page and limit are clamped rather than rejected;
    /// out-of-range sort strings fail earlier, at parse time.
    pub async fn list(&self, mut filter: QuestionFilter) -> Result<Page<QuestionListing>> {
        filter.page = filter.page.max(1);
        filter.limit = filter.limit.clamp(1, LIST_LIMIT_MAX);
        let page = self.questions.list(filter).await?;

        let author_ids: Vec<Uuid> = page.items.iter().map(|q| q.author_id).collect();
        let authors = self.authors_by_id(&author_ids).await?;

        let items = page
            .items
            .into_iter()
            .map(|question| {
                let author = authors
                    .get(&question.author_id)
                    .cloned()
                    .unwrap_or_else(|| AuthorBrief::missing(question.author_id));
                QuestionListing { question, author }
            })
            .collect();

        Ok(Page { items, total: page.total, page: page.page, limit: page.limit })
    }

    /// Loads one question for display, bumping its view count. The returned
    /// question reflects the bumped count.
    pub async fn get_detail(&self, id: Uuid, viewer: Option<&User>) -> Result<QuestionDetail> {
        let mut question = self
            .questions
            .find_by_id(id)
            .await?
            .filter(|q| !q.is_deleted)
            .ok_or_else(|| DomainError::not_found("Question", id))?;

        self.questions.record_view(id).await?;
        question.view_count += 1;

        let answers = self.answers.list_for_question(id).await?;

        let mut author_ids: Vec<Uuid> = answers.iter().map(|a| a.author_id).collect();
        author_ids.push(question.author_id);
        let authors = self.authors_by_id(&author_ids).await?;

        let (user_vote, answer_votes) = match viewer {
            Some(user) => {
                let user_vote = self
                    .votes
                    .find(VoteTargetKind::Question, id, user.id)
                    .await?;
                let answer_ids: Vec<Uuid> = answers.iter().map(|a| a.id).collect();
                let answer_votes: HashMap<Uuid, VoteDirection> = self
                    .votes
                    .find_for_voter(VoteTargetKind::Answer, &answer_ids, user.id)
                    .await?
                    .into_iter()
                    .collect();
                (user_vote, answer_votes)
            }
            None => (None, HashMap::new()),
        };

        let author = authors
            .get(&question.author_id)
            .cloned()
            .unwrap_or_else(|| AuthorBrief::missing(question.author_id));

        let answers = answers
            .into_iter()
            .map(|answer| {
                let author = authors
                    .get(&answer.author_id)
                    .cloned()
                    .unwrap_or_else(|| AuthorBrief::missing(answer.author_id));
                let user_vote = answer_votes.get(&answer.id).copied();
                AnswerView { answer, author, user_vote }
            })
            .collect();

        Ok(QuestionDetail { question, author, answers, user_vote })
    }

    /// Posts an answer under a question and notifies the question's author.
    pub async fn add_answer(
        &self,
        caller: &User,
        question_id: Uuid,
        content: &str,
    ) -> Result<Answer> {
        if content.trim().chars().count() < ANSWER_MIN {
            return Err(DomainError::validation(format!(
                "answer content must be at least {ANSWER_MIN} characters"
            )));
        }

        let question = self
            .questions
            .find_by_id(question_id)
            .await?
            .filter(|q| !q.is_deleted)
            .ok_or_else(|| DomainError::not_found("Question", question_id))?;

        let answer = Answer::new(question.id, caller.id, sanitize_html(content));
        self.answers.create(&answer).await?;

        tracing::info!(answer = %answer.id, question = %question.id, "answer posted");

        if question.author_id != caller.id {
            let notification = Notification::new(
                question.author_id,
                Some(caller.id),
                NotificationKind::Answer,
                format!(
                    "{} answered your question \"{}\"",
                    caller.username, question.title
                ),
            )
            .about_question(question.id)
            .about_answer(answer.id);
            self.notifications.insert(&notification).await?;
        }

        Ok(answer)
    }

    async fn authors_by_id(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, AuthorBrief>> {
        let mut unique: Vec<Uuid> = ids.to_vec();
        unique.sort_unstable();
        unique.dedup();
        Ok(self
            .users
            .find_by_ids(&unique)
            .await?
            .iter()
            .map(|user| (user.id, AuthorBrief::from(user)))
            .collect())
    }
}

/// Lowercases, trims, and de-duplicates tag names, dropping empties.
/// Rejects the set if it ends up empty, has more than five entries, or
/// contains an over-long name.
pub fn normalize_tags(raw: &[String]) -> Result<Vec<String>> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw {
        let normalized = tag.trim().to_lowercase();
        if normalized.is_empty() {
            continue;
        }
        if normalized.chars().count() > TAG_NAME_MAX {
            return Err(DomainError::validation(format!(
                "tag \"{normalized}\" exceeds {TAG_NAME_MAX} characters"
            )));
        }
        if !tags.contains(&normalized) {
            tags.push(normalized);
        }
    }
    if tags.is_empty() {
        return Err(DomainError::validation("at least one valid tag is required"));
    }
    if tags.len() > TAGS_MAX {
        return Err(DomainError::validation(format!(
            "you must provide 1-{TAGS_MAX} tags"
        )));
    }
    Ok(tags)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_lowercased_trimmed_and_deduplicated() {
        let tags = normalize_tags(&[
            " Rust ".into(),
            "rust".into(),
            "SQLx".into(),
        ])
        .unwrap();
        assert_eq!(tags, vec!["rust".to_string(), "sqlx".to_string()]);
    }

    #[test]
    fn empty_tag_set_is_rejected() {
        assert!(normalize_tags(&["  ".into()]).is_err());
        assert!(normalize_tags(&[]).is_err());
    }

    #[test]
    fn more_than_five_tags_rejected() {
        let raw: Vec<String> = (0..6).map(|i| format!("tag-{i}")).collect();
        assert!(normalize_tags(&raw).is_err());
    }
}
