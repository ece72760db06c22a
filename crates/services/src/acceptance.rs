//! Accepting answers: the one-accepted-answer-per-question state machine.

use std::sync::Arc;
use uuid::Uuid;

use domains::{
    AnswerRepo, DomainError, Notification, NotificationKind, NotificationRepo, QuestionRepo,
    Result, User,
};

/// Outcome reported to the caller: whether the answer is now accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcceptReceipt {
    pub accepted: bool,
}

pub struct AcceptanceService {
    questions: Arc<dyn QuestionRepo>,
    answers: Arc<dyn AnswerRepo>,
    notifications: Arc<dyn NotificationRepo>,
}

impl AcceptanceService {
    pub fn new(
        questions: Arc<dyn QuestionRepo>,
        answers: Arc<dyn AnswerRepo>,
        notifications: Arc<dyn NotificationRepo>,
    ) -> Self {
        Self { questions, answers, notifications }
    }

    /// Toggles acceptance of `answer_id`.
    ///
    /// Only the question's author may call this. Accepting an answer clears
    /// any previously accepted one; accepting the currently accepted answer
    /// removes acceptance — that toggle is the documented way to clear it,
    /// not a no-op. Reputation (±15) moves with the flag inside the same
    /// storage transaction.
    pub async fn accept(&self, caller: &User, answer_id: Uuid) -> Result<AcceptReceipt> {
        let answer = self
            .answers
            .find_by_id(answer_id)
            .await?
            .filter(|a| !a.is_deleted)
            .ok_or_else(|| DomainError::not_found("Answer", answer_id))?;

        let question = self
            .questions
            .find_by_id(answer.question_id)
            .await?
            .filter(|q| !q.is_deleted)
            .ok_or_else(|| DomainError::not_found("Question", answer.question_id))?;

        if question.author_id != caller.id {
            return Err(DomainError::forbidden(
                "only the question author can accept answers",
            ));
        }

        let outcome = self
            .questions
            .toggle_accepted(question.id, answer.id, caller.id)
            .await?;

        tracing::info!(
            question = %question.id,
            answer = %answer.id,
            accepted = outcome.accepted,
            "acceptance toggled"
        );

        if outcome.accepted && answer.author_id != caller.id {
            let notification = Notification::new(
                answer.author_id,
                Some(caller.id),
                NotificationKind::Accept,
                format!("{} accepted your answer", caller.username),
            )
            .about_question(question.id)
            .about_answer(answer.id);
            self.notifications.insert(&notification).await?;
        }

        Ok(AcceptReceipt { accepted: outcome.accepted })
    }
}
