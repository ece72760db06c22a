//! Vote ledger invariants against the real SQLite store.

use domains::{
    Answer, AnswerRepo, Question, QuestionRepo, User, UserRepo, VoteDirection::{Down, Up},
    VoteStore, VoteTargetKind,
};
use integration_tests::{memory_store, seed_user};
use storage_adapters::SqliteStore;

async fn seed_thread(store: &SqliteStore) -> (User, User, Question, Answer) {
    let author = seed_user(store, "author").await;
    let voter = seed_user(store, "voter").await;

    let question = Question::new(
        author.id,
        "A question title long enough".into(),
        "A question description long enough".into(),
        vec!["rust".into()],
    );
    QuestionRepo::create(store, &question).await.unwrap();

    let answer = Answer::new(question.id, author.id, "an answer body".into());
    AnswerRepo::create(store, &answer).await.unwrap();

    (author, voter, question, answer)
}

async fn reputation_of(store: &SqliteStore, user: &User) -> (i64, i64) {
    let user = UserRepo::find_by_id(store, user.id).await.unwrap().unwrap();
    (user.reputation, user.upvotes_received)
}

#[tokio::test]
async fn up_then_up_then_down_walks_the_documented_scenario() {
    let store = memory_store().await;
    let (_, voter, _, answer) = seed_thread(&store).await;
    let target = VoteTargetKind::Answer;

    // fresh upvote
    let applied = store.apply(target, answer.id, answer.author_id, voter.id, Up).await.unwrap();
    assert_eq!(applied.vote_count, 1);
    assert_eq!(applied.current, Some(Up));

    // same direction toggles off
    let applied = store.apply(target, answer.id, answer.author_id, voter.id, Up).await.unwrap();
    assert_eq!(applied.vote_count, 0);
    assert_eq!(applied.current, None);

    // then a downvote
    let applied = store.apply(target, answer.id, answer.author_id, voter.id, Down).await.unwrap();
    assert_eq!(applied.vote_count, -1);
    assert_eq!(applied.current, Some(Down));

    let stored = AnswerRepo::find_by_id(&store, answer.id).await.unwrap().unwrap();
    assert_eq!(stored.vote_count, -1, "persisted aggregate must match the receipt");
}

#[tokio::test]
async fn opposite_direction_replaces_in_place() {
    let store = memory_store().await;
    let (_, voter, _, answer) = seed_thread(&store).await;
    let target = VoteTargetKind::Answer;

    store.apply(target, answer.id, answer.author_id, voter.id, Up).await.unwrap();
    let applied = store.apply(target, answer.id, answer.author_id, voter.id, Down).await.unwrap();

    assert_eq!(applied.previous, Some(Up));
    assert_eq!(applied.current, Some(Down));
    // One voter, one row: the aggregate swings by two, not to -2 and 1 rows.
    assert_eq!(applied.vote_count, -1);

    let found = store.find(target, answer.id, voter.id).await.unwrap();
    assert_eq!(found, Some(Down));
}

#[tokio::test]
async fn aggregate_always_equals_ups_minus_downs() {
    let store = memory_store().await;
    let (_, _, _, answer) = seed_thread(&store).await;
    let target = VoteTargetKind::Answer;

    let voters = [
        seed_user(&store, "v1").await,
        seed_user(&store, "v2").await,
        seed_user(&store, "v3").await,
        seed_user(&store, "v4").await,
    ];

    // v1 up, v2 up, v3 down, v4 up-then-off, v2 flips down.
    store.apply(target, answer.id, answer.author_id, voters[0].id, Up).await.unwrap();
    store.apply(target, answer.id, answer.author_id, voters[1].id, Up).await.unwrap();
    store.apply(target, answer.id, answer.author_id, voters[2].id, Down).await.unwrap();
    store.apply(target, answer.id, answer.author_id, voters[3].id, Up).await.unwrap();
    store.apply(target, answer.id, answer.author_id, voters[3].id, Up).await.unwrap();
    let applied = store
        .apply(target, answer.id, answer.author_id, voters[1].id, Down)
        .await
        .unwrap();

    // Ledger state: v1 up, v2 down, v3 down => 1 - 2.
    assert_eq!(applied.vote_count, -1);

    let directions = store
        .find_for_voter(
            target,
            &[answer.id],
            voters[3].id,
        )
        .await
        .unwrap();
    assert!(directions.is_empty(), "toggled-off voter holds no row");
}

#[tokio::test]
async fn reputation_and_upvotes_received_track_the_ledger() {
    let store = memory_store().await;
    let (author, voter, _, answer) = seed_thread(&store).await;
    let target = VoteTargetKind::Answer;

    store.apply(target, answer.id, answer.author_id, voter.id, Up).await.unwrap();
    assert_eq!(reputation_of(&store, &author).await, (10, 1));

    // up -> down applies both signed deltas at once
    store.apply(target, answer.id, answer.author_id, voter.id, Down).await.unwrap();
    assert_eq!(reputation_of(&store, &author).await, (-2, 0));

    // toggle the downvote off: back to where the author started
    store.apply(target, answer.id, answer.author_id, voter.id, Down).await.unwrap();
    assert_eq!(reputation_of(&store, &author).await, (0, 0));
}

#[tokio::test]
async fn question_and_answer_ledgers_are_disjoint() {
    let store = memory_store().await;
    let (_, voter, question, answer) = seed_thread(&store).await;

    store
        .apply(VoteTargetKind::Question, question.id, question.author_id, voter.id, Up)
        .await
        .unwrap();

    assert_eq!(
        store.find(VoteTargetKind::Question, question.id, voter.id).await.unwrap(),
        Some(Up)
    );
    assert_eq!(
        store.find(VoteTargetKind::Answer, answer.id, voter.id).await.unwrap(),
        None,
        "a question vote must not leak onto answers"
    );

    let question = QuestionRepo::find_by_id(&store, question.id).await.unwrap().unwrap();
    assert_eq!(question.vote_count, 1);
    let answer = AnswerRepo::find_by_id(&store, answer.id).await.unwrap().unwrap();
    assert_eq!(answer.vote_count, 0);
}
