//! Reading and acknowledging notifications.

use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use domains::{
    DomainError, Notification, NotificationRepo, Page, QuestionRepo, Result, User, UserRepo,
};

use crate::questions::AuthorBrief;

pub const LIST_LIMIT_MAX: i64 = 50;

/// A notification decorated for display: who sent it and, when it points at
/// a question, that question's title.
#[derive(Debug, Clone)]
pub struct NotificationView {
    pub notification: Notification,
    pub sender: Option<AuthorBrief>,
    pub question_title: Option<String>,
}

/// One page of a user's feed.
#[derive(Debug, Clone)]
pub struct FeedPage {
    pub page: Page<NotificationView>,
    pub unread: i64,
}

pub struct NotificationService {
    notifications: Arc<dyn NotificationRepo>,
    users: Arc<dyn UserRepo>,
    questions: Arc<dyn QuestionRepo>,
}

impl NotificationService {
    pub fn new(
        notifications: Arc<dyn NotificationRepo>,
        users: Arc<dyn UserRepo>,
        questions: Arc<dyn QuestionRepo>,
    ) -> Self {
        Self { notifications, users, questions }
    }

    pub async fn list(&self, caller: &User, page: i64, limit: i64) -> Result<FeedPage> {
        let page = page.max(1);
        let limit = limit.clamp(1, LIST_LIMIT_MAX);
        let feed = self.notifications.list_for(caller.id, page, limit).await?;

        let sender_ids: Vec<Uuid> = feed
            .page
            .items
            .iter()
            .filter_map(|n| n.sender_id)
            .collect();
        let senders: HashMap<Uuid, AuthorBrief> = {
            let mut unique = sender_ids.clone();
            unique.sort_unstable();
            unique.dedup();
            self.users
                .find_by_ids(&unique)
                .await?
                .iter()
                .map(|u| (u.id, AuthorBrief::from(u)))
                .collect()
        };

        let mut titles: HashMap<Uuid, String> = HashMap::new();
        for notification in &feed.page.items {
            if let Some(question_id) = notification.question_id {
                if !titles.contains_key(&question_id) {
                    if let Some(question) = self.questions.find_by_id(question_id).await? {
                        titles.insert(question_id, question.title);
                    }
                }
            }
        }

        let items = feed
            .page
            .items
            .into_iter()
            .map(|notification| {
                let sender = notification.sender_id.and_then(|id| senders.get(&id).cloned());
                let question_title = notification
                    .question_id
                    .and_then(|id| titles.get(&id).cloned());
                NotificationView { notification, sender, question_title }
            })
            .collect();

        Ok(FeedPage {
            page: Page {
                items,
                total: feed.page.total,
                page: feed.page.page,
                limit: feed.page.limit,
            },
            unread: feed.unread,
        })
    }

    /// Marks one of the caller's notifications read. Already-read
    /// notifications are left untouched.
    pub async fn mark_read(&self, caller: &User, id: Uuid) -> Result<()> {
        let notification = self
            .notifications
            .find_for(id, caller.id)
            .await?
            .ok_or_else(|| DomainError::not_found("Notification", id))?;

        if !notification.is_read {
            self.notifications.mark_read(id, caller.id, Utc::now()).await?;
        }
        Ok(())
    }

    pub async fn mark_all_read(&self, caller: &User) -> Result<u64> {
        self.notifications.mark_all_read(caller.id, Utc::now()).await
    }
}
