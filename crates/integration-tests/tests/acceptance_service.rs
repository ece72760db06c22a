//! `AcceptanceService` rules, exercised against mocked ports.

use std::sync::Arc;

use domains::{
    AcceptOutcome, Answer, AnswerRepo, DomainError, MockAnswerRepo, MockNotificationRepo,
    MockQuestionRepo, NotificationKind, NotificationRepo, Question, QuestionRepo, User,
};
use services::AcceptanceService;
use uuid::Uuid;

fn user(name: &str) -> User {
    User::new(name.to_string(), format!("{name}@example.com"), "hash".into())
}

fn question_by(author: &User) -> Question {
    Question::new(
        author.id,
        "A question title long enough".into(),
        "A question description long enough".into(),
        vec!["rust".into()],
    )
}

fn service(
    questions: MockQuestionRepo,
    answers: MockAnswerRepo,
    notifications: MockNotificationRepo,
) -> AcceptanceService {
    let questions: Arc<dyn QuestionRepo> = Arc::new(questions);
    let answers: Arc<dyn AnswerRepo> = Arc::new(answers);
    let notifications: Arc<dyn NotificationRepo> = Arc::new(notifications);
    AcceptanceService::new(questions, answers, notifications)
}

#[tokio::test]
async fn only_the_question_author_may_accept() {
    let owner = user("owner");
    let outsider = user("outsider");
    let question = question_by(&owner);
    let answer = Answer::new(question.id, user("answerer").id, "an answer body".into());
    let answer_id = answer.id;

    let mut questions = MockQuestionRepo::new();
    questions
        .expect_find_by_id()
        .returning(move |_| Ok(Some(question.clone())));
    // No toggle_accepted expectation: reaching it fails the test.

    let mut answers = MockAnswerRepo::new();
    answers
        .expect_find_by_id()
        .returning(move |_| Ok(Some(answer.clone())));

    let service = service(questions, answers, MockNotificationRepo::new());
    let err = service.accept(&outsider, answer_id).await.unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));
}

#[tokio::test]
async fn accepting_notifies_the_answer_author() {
    let owner = user("owner");
    let answer_author_id = Uuid::now_v7();
    let question = question_by(&owner);
    let question_id = question.id;
    let answer = Answer::new(question.id, answer_author_id, "an answer body".into());
    let answer_id = answer.id;

    let mut questions = MockQuestionRepo::new();
    questions
        .expect_find_by_id()
        .returning(move |_| Ok(Some(question.clone())));
    questions
        .expect_toggle_accepted()
        .withf(move |q, a, _| *q == question_id && *a == answer_id)
        .times(1)
        .returning(|_, _, _| Ok(AcceptOutcome { accepted: true }));

    let mut answers = MockAnswerRepo::new();
    answers
        .expect_find_by_id()
        .returning(move |_| Ok(Some(answer.clone())));

    let mut notifications = MockNotificationRepo::new();
    notifications
        .expect_insert()
        .withf(move |n| {
            n.recipient_id == answer_author_id && n.kind == NotificationKind::Accept
        })
        .times(1)
        .returning(|_| Ok(()));

    let service = service(questions, answers, notifications);
    let receipt = service.accept(&owner, answer_id).await.unwrap();
    assert!(receipt.accepted);
}

#[tokio::test]
async fn removing_acceptance_does_not_notify() {
    let owner = user("owner");
    let question = question_by(&owner);
    let answer = Answer::new(question.id, Uuid::now_v7(), "an answer body".into());
    let answer_id = answer.id;

    let mut questions = MockQuestionRepo::new();
    questions
        .expect_find_by_id()
        .returning(move |_| Ok(Some(question.clone())));
    questions
        .expect_toggle_accepted()
        .returning(|_, _, _| Ok(AcceptOutcome { accepted: false }));

    let mut answers = MockAnswerRepo::new();
    answers
        .expect_find_by_id()
        .returning(move |_| Ok(Some(answer.clone())));

    // No insert expectation.
    let service = service(questions, answers, MockNotificationRepo::new());
    let receipt = service.accept(&owner, answer_id).await.unwrap();
    assert!(!receipt.accepted);
}

#[tokio::test]
async fn accepting_your_own_answer_skips_the_notification() {
    let owner = user("owner");
    let question = question_by(&owner);
    let answer = Answer::new(question.id, owner.id, "answering my own question".into());
    let answer_id = answer.id;

    let mut questions = MockQuestionRepo::new();
    questions
        .expect_find_by_id()
        .returning(move |_| Ok(Some(question.clone())));
    questions
        .expect_toggle_accepted()
        .returning(|_, _, _| Ok(AcceptOutcome { accepted: true }));

    let mut answers = MockAnswerRepo::new();
    answers
        .expect_find_by_id()
        .returning(move |_| Ok(Some(answer.clone())));

    let service = service(questions, answers, MockNotificationRepo::new());
    let receipt = service.accept(&owner, answer_id).await.unwrap();
    assert!(receipt.accepted);
}

#[tokio::test]
async fn accepting_a_missing_or_deleted_answer_is_not_found() {
    let owner = user("owner");

    let mut answers = MockAnswerRepo::new();
    let mut deleted = Answer::new(Uuid::now_v7(), Uuid::now_v7(), "deleted answer".into());
    deleted.is_deleted = true;
    let deleted_id = deleted.id;
    answers.expect_find_by_id().returning(move |id| {
        if id == deleted_id {
            Ok(Some(deleted.clone()))
        } else {
            Ok(None)
        }
    });

    let service = service(MockQuestionRepo::new(), answers, MockNotificationRepo::new());

    let err = service.accept(&owner, Uuid::now_v7()).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(..)));

    let err = service.accept(&owner, deleted_id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(..)));
}
