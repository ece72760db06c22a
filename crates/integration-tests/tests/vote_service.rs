//! `VoteService` rules, exercised against mocked ports.

use std::sync::Arc;

use domains::{
    Answer, AnswerRepo, DomainError, MockAnswerRepo, MockNotificationRepo, MockQuestionRepo,
    MockVoteStore, NotificationKind, NotificationRepo, QuestionRepo, User, VoteApplied,
    VoteDirection, VoteStore, VoteTargetKind,
};
use services::VoteService;
use uuid::Uuid;

fn user(name: &str) -> User {
    User::new(name.to_string(), format!("{name}@example.com"), "hash".into())
}

fn service(
    answers: MockAnswerRepo,
    votes: MockVoteStore,
    notifications: MockNotificationRepo,
) -> VoteService {
    let questions: Arc<dyn QuestionRepo> = Arc::new(MockQuestionRepo::new());
    let answers: Arc<dyn AnswerRepo> = Arc::new(answers);
    let votes: Arc<dyn VoteStore> = Arc::new(votes);
    let notifications: Arc<dyn NotificationRepo> = Arc::new(notifications);
    VoteService::new(questions, answers, votes, notifications)
}

#[tokio::test]
async fn self_vote_is_rejected_before_any_mutation() {
    let caller = user("alice");
    let answer = Answer::new(Uuid::now_v7(), caller.id, "an answer body".into());
    let answer_id = answer.id;

    let mut answers = MockAnswerRepo::new();
    answers
        .expect_find_by_id()
        .returning(move |_| Ok(Some(answer.clone())));

    // No expectations on the vote store: any apply() call panics the test.
    let service = service(answers, MockVoteStore::new(), MockNotificationRepo::new());

    let err = service
        .vote(&caller, VoteTargetKind::Answer, answer_id, VoteDirection::Up)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));

    let err = service
        .vote(&caller, VoteTargetKind::Answer, answer_id, VoteDirection::Down)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)), "direction must not matter");
}

#[tokio::test]
async fn voting_on_missing_or_deleted_answer_is_not_found() {
    let caller = user("alice");

    let mut answers = MockAnswerRepo::new();
    let mut deleted = Answer::new(Uuid::now_v7(), Uuid::now_v7(), "gone".into());
    deleted.is_deleted = true;
    let deleted_id = deleted.id;
    answers.expect_find_by_id().returning(move |id| {
        if id == deleted_id {
            Ok(Some(deleted.clone()))
        } else {
            Ok(None)
        }
    });

    let service = service(answers, MockVoteStore::new(), MockNotificationRepo::new());

    let err = service
        .vote(&caller, VoteTargetKind::Answer, Uuid::now_v7(), VoteDirection::Up)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(..)));

    let err = service
        .vote(&caller, VoteTargetKind::Answer, deleted_id, VoteDirection::Up)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(..)));
}

#[tokio::test]
async fn fresh_upvote_notifies_the_author() {
    let caller = user("alice");
    let author_id = Uuid::now_v7();
    let answer = Answer::new(Uuid::now_v7(), author_id, "an answer body".into());
    let answer_id = answer.id;

    let mut answers = MockAnswerRepo::new();
    answers
        .expect_find_by_id()
        .returning(move |_| Ok(Some(answer.clone())));

    let mut votes = MockVoteStore::new();
    votes.expect_apply().returning(|_, _, _, _, _| {
        Ok(VoteApplied {
            previous: None,
            current: Some(VoteDirection::Up),
            vote_count: 1,
        })
    });

    let mut notifications = MockNotificationRepo::new();
    notifications
        .expect_insert()
        .withf(move |n| {
            n.recipient_id == author_id
                && n.kind == NotificationKind::Vote
                && n.answer_id == Some(answer_id)
        })
        .times(1)
        .returning(|_| Ok(()));

    let service = service(answers, votes, notifications);
    let receipt = service
        .vote(&caller, VoteTargetKind::Answer, answer_id, VoteDirection::Up)
        .await
        .unwrap();
    assert_eq!(receipt.vote_count, 1);
    assert_eq!(receipt.user_vote, Some(VoteDirection::Up));
}

#[tokio::test]
async fn toggle_off_and_replace_do_not_notify() {
    let caller = user("alice");
    let answer = Answer::new(Uuid::now_v7(), Uuid::now_v7(), "an answer body".into());
    let answer_id = answer.id;

    let mut answers = MockAnswerRepo::new();
    answers
        .expect_find_by_id()
        .returning(move |_| Ok(Some(answer.clone())));

    let mut votes = MockVoteStore::new();
    let mut first = true;
    votes.expect_apply().returning(move |_, _, _, _, _| {
        let applied = if first {
            // toggle-off
            VoteApplied { previous: Some(VoteDirection::Up), current: None, vote_count: 0 }
        } else {
            // replace down -> up
            VoteApplied {
                previous: Some(VoteDirection::Down),
                current: Some(VoteDirection::Up),
                vote_count: 1,
            }
        };
        first = false;
        Ok(applied)
    });

    // No insert expectation: a notification here fails the test.
    let service = service(answers, votes, MockNotificationRepo::new());

    let receipt = service
        .vote(&caller, VoteTargetKind::Answer, answer_id, VoteDirection::Up)
        .await
        .unwrap();
    assert_eq!(receipt.user_vote, None);
    assert_eq!(receipt.vote_count, 0);

    let receipt = service
        .vote(&caller, VoteTargetKind::Answer, answer_id, VoteDirection::Up)
        .await
        .unwrap();
    assert_eq!(receipt.user_vote, Some(VoteDirection::Up));
}

#[tokio::test]
async fn question_votes_resolve_the_question_author() {
    let caller = user("alice");
    let author_id = Uuid::now_v7();
    let question = domains::Question::new(
        author_id,
        "A question title long enough".into(),
        "A question description long enough".into(),
        vec!["rust".into()],
    );
    let question_id = question.id;

    let mut questions = MockQuestionRepo::new();
    questions
        .expect_find_by_id()
        .returning(move |_| Ok(Some(question.clone())));

    let mut votes = MockVoteStore::new();
    votes
        .expect_apply()
        .withf(move |kind, target, author, _, _| {
            *kind == VoteTargetKind::Question && *target == question_id && *author == author_id
        })
        .times(1)
        .returning(|_, _, _, _, _| {
            Ok(VoteApplied {
                previous: None,
                current: Some(VoteDirection::Down),
                vote_count: -1,
            })
        });

    let questions: Arc<dyn QuestionRepo> = Arc::new(questions);
    let answers: Arc<dyn AnswerRepo> = Arc::new(MockAnswerRepo::new());
    let votes: Arc<dyn VoteStore> = Arc::new(votes);
    let notifications: Arc<dyn NotificationRepo> = Arc::new(MockNotificationRepo::new());
    let service = VoteService::new(questions, answers, votes, notifications);

    let receipt = service
        .vote(&caller, VoteTargetKind::Question, question_id, VoteDirection::Down)
        .await
        .unwrap();
    assert_eq!(receipt.vote_count, -1);
    assert_eq!(receipt.user_vote, Some(VoteDirection::Down));
}
