//! Voting on questions and answers.

use std::sync::Arc;
use uuid::Uuid;

use domains::{
    AnswerRepo, DomainError, Notification, NotificationKind, NotificationRepo, QuestionRepo,
    Result, User, VoteDirection, VoteStore, VoteTargetKind,
};

/// What a vote call reports back: the target's new aggregate and where the
/// caller's vote ended up (`None` after a toggle-off).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteReceipt {
    pub vote_count: i64,
    pub user_vote: Option<VoteDirection>,
}

pub struct VoteService {
    questions: Arc<dyn QuestionRepo>,
    answers: Arc<dyn AnswerRepo>,
    votes: Arc<dyn VoteStore>,
    notifications: Arc<dyn NotificationRepo>,
}

impl VoteService {
    pub fn new(
        questions: Arc<dyn QuestionRepo>,
        answers: Arc<dyn AnswerRepo>,
        votes: Arc<dyn VoteStore>,
        notifications: Arc<dyn NotificationRepo>,
    ) -> Self {
        Self { questions, answers, votes, notifications }
    }

    /// Applies one vote request from `caller` against a question or answer.
    ///
    /// Self-votes are rejected before any state changes. The ledger
    /// mutation, recount, and reputation delta are one transaction inside
    /// the vote store; the notification is emitted only for a fresh upvote.
    pub async fn vote(
        &self,
        caller: &User,
        kind: VoteTargetKind,
        target_id: Uuid,
        requested: VoteDirection,
    ) -> Result<VoteReceipt> {
        let target = self.load_target(kind, target_id).await?;

        if target.author_id == caller.id {
            return Err(DomainError::forbidden(format!(
                "you cannot vote on your own {}",
                kind.as_str()
            )));
        }

        let applied = self
            .votes
            .apply(kind, target_id, target.author_id, caller.id, requested)
            .await?;

        tracing::debug!(
            kind = kind.as_str(),
            %target_id,
            voter = %caller.id,
            vote_count = applied.vote_count,
            "vote applied"
        );

        // Fresh upvotes notify the author. The author-is-voter guard is
        // unreachable given the self-vote rule above, but kept for symmetry
        // with the other notification sites.
        if applied.is_fresh_upvote() && target.author_id != caller.id {
            let mut notification = Notification::new(
                target.author_id,
                Some(caller.id),
                NotificationKind::Vote,
                format!("{} upvoted your {}", caller.username, kind.as_str()),
            );
            notification = match kind {
                VoteTargetKind::Question => notification.about_question(target_id),
                VoteTargetKind::Answer => notification
                    .about_question(target.question_id.unwrap_or(target_id))
                    .about_answer(target_id),
            };
            self.notifications.insert(&notification).await?;
        }

        Ok(VoteReceipt { vote_count: applied.vote_count, user_vote: applied.current })
    }

    async fn load_target(&self, kind: VoteTargetKind, target_id: Uuid) -> Result<VoteTarget> {
        match kind {
            VoteTargetKind::Question => {
                let question = self
                    .questions
                    .find_by_id(target_id)
                    .await?
                    .filter(|q| !q.is_deleted)
                    .ok_or_else(|| DomainError::not_found("Question", target_id))?;
                Ok(VoteTarget { author_id: question.author_id, question_id: None })
            }
            VoteTargetKind::Answer => {
                let answer = self
                    .answers
                    .find_by_id(target_id)
                    .await?
                    .filter(|a| !a.is_deleted)
                    .ok_or_else(|| DomainError::not_found("Answer", target_id))?;
                Ok(VoteTarget {
                    author_id: answer.author_id,
                    question_id: Some(answer.question_id),
                })
            }
        }
    }
}

struct VoteTarget {
    author_id: Uuid,
    /// Set when the target is an answer, for the notification's question link.
    question_id: Option<Uuid>,
}
