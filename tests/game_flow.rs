//! End-to-end game scenarios over on-disk vocabulary, model and learning files.

mod common;

use std::sync::Arc;

use common::fixtures::{GameFiles, GameStack, write_text_model};
use wordweave::constants::{FALLBACK_RANK_CEILING, FALLBACK_RANK_FLOOR, NEIGHBOR_RANK_CAP};
use wordweave::coordinator::{CoordinatorError, Matchmaking};
use wordweave::scoring::RankingMode;
use wordweave::session::{GameId, GameMode, GameSession, SessionError};
use wordweave::vectors::{EmbeddingIndex, VectorIndex};
use wordweave::vocabulary::Vocabulary;

fn solo_session(stack: &GameStack, player: &str, target: &str) -> GameSession {
    GameSession::with_target(
        GameId::new(),
        GameMode::Solo,
        vec![player.to_string()],
        Arc::clone(&stack.engine),
        target,
    )
    .unwrap()
}

#[tokio::test]
async fn test_solo_exact_guess_reveals_target() {
    let files = GameFiles::with_model();
    let stack = GameStack::start(files.config());
    assert_eq!(stack.engine.mode(), RankingMode::Vector);

    let session = solo_session(&stack, "alice", "книга");
    let close = session.guess("alice", "журнал").unwrap();
    assert!(close.rank >= 1 && close.rank <= NEIGHBOR_RANK_CAP);

    let outcome = session.guess("alice", "книга").unwrap();
    assert_eq!(outcome.rank, 0);
    assert!(outcome.is_correct);
    assert_eq!(outcome.winner.as_deref(), Some("alice"));
    assert_eq!(outcome.target_word.as_deref(), Some("книга"));
    assert_eq!(outcome.attempts, 2);

    stack.shutdown().await;
}

#[tokio::test]
async fn test_absent_word_is_rejected_without_cost() {
    let files = GameFiles::with_model();
    let stack = GameStack::start(files.config());
    let session = solo_session(&stack, "alice", "книга");

    let err = session.guess("alice", "абракадабра").unwrap_err();

    assert!(matches!(err, SessionError::InvalidWord { .. }));
    assert_eq!(session.attempts("alice"), Some(0));
    assert!(session.history("alice").unwrap().is_empty());

    stack.shutdown().await;
}

#[tokio::test]
async fn test_matchmaking_and_first_winner() {
    let files = GameFiles::with_model();
    let stack = GameStack::start(files.config());
    let coordinator = &stack.coordinator;

    assert_eq!(
        coordinator.request_multiplayer_game("x").unwrap(),
        Matchmaking::Waiting
    );
    let Matchmaking::Matched(started) = coordinator.request_multiplayer_game("y").unwrap() else {
        panic!("expected a match");
    };
    assert_eq!(started.opponent_of("x").map(String::as_str), Some("y"));
    assert_eq!(started.opponent_of("y").map(String::as_str), Some("x"));
    assert_eq!(coordinator.waiting_players(), 0);

    let target = coordinator
        .session(started.game_id)
        .unwrap()
        .target_word()
        .to_string();

    let first = coordinator
        .route_guess("x", started.game_id, &target)
        .unwrap();
    assert!(first.outcome.won_game);
    assert_eq!(first.opponent.as_deref(), Some("y"));

    let late = coordinator
        .route_guess("y", started.game_id, &target)
        .unwrap();
    assert!(late.outcome.is_correct);
    assert!(!late.outcome.won_game);
    assert_eq!(late.outcome.winner.as_deref(), Some("x"));
    assert!(late.outcome.target_word.is_none());

    assert!(matches!(
        coordinator.route_guess("x", GameId::new(), &target),
        Err(CoordinatorError::UnknownGame { .. })
    ));

    stack.shutdown().await;
}

#[tokio::test]
async fn test_learning_and_counters_survive_restart() {
    let files = GameFiles::with_model();

    let stack = GameStack::start(files.config());
    let session = solo_session(&stack, "alice", "книга");
    session.guess("alice", "журнал").unwrap();
    session.guess("alice", "книга").unwrap();
    let before = stack.associations.snapshot();
    stack.shutdown().await;

    let stack = GameStack::start(files.config());
    assert_eq!(stack.associations.snapshot(), before);
    assert_eq!(stack.associations.stats().games_played, 1);
    assert!(stack.associations.share_category("журнал", "книга"));

    let journal = stack.vocabulary.get("журнал").unwrap();
    assert_eq!(journal.stats().times_guessed(), 1);
    let book = stack.vocabulary.get("книга").unwrap();
    assert_eq!(book.stats().times_used_as_target(), 1);

    stack.shutdown().await;
}

#[tokio::test]
async fn test_learning_never_moves_ranks() {
    let files = GameFiles::with_model();
    let stack = GameStack::start(files.config());

    let words = ["журнал", "стол", "книжка", "море"];
    let before: Vec<u32> = words
        .iter()
        .map(|w| stack.engine.score(w, "книга").unwrap().rank)
        .collect();

    for _ in 0..5 {
        let session = solo_session(&stack, "alice", "книга");
        for word in words {
            session.guess("alice", word).unwrap();
        }
        session.guess("alice", "книга").unwrap();
    }

    let after: Vec<u32> = words
        .iter()
        .map(|w| stack.engine.score(w, "книга").unwrap().rank)
        .collect();
    assert_eq!(before, after);

    stack.shutdown().await;
}

#[tokio::test]
async fn test_missing_model_degrades_to_fallback() {
    let files = GameFiles::without_model();
    let mut config = files.config();
    config.vector_model_path = Some(files.dir.path().join("absent.bin"));
    let stack = GameStack::start(config);

    assert_eq!(stack.engine.mode(), RankingMode::Fallback);
    assert_eq!(stack.engine.target_pool_size(), stack.vocabulary.len());

    let session = solo_session(&stack, "alice", "книжка");
    for word in ["книга", "стол", "море"] {
        let outcome = session.guess("alice", word).unwrap();
        assert!(outcome.rank >= FALLBACK_RANK_FLOOR);
        assert!(outcome.rank <= FALLBACK_RANK_CEILING);
    }
    assert_eq!(session.guess("alice", "книжка").unwrap().rank, 0);

    stack.shutdown().await;
}

#[test]
fn test_text_and_binary_models_agree() {
    let files = GameFiles::with_model();
    let text_path = files.dir.path().join("model.txt");
    write_text_model(&text_path);
    let vocabulary = Vocabulary::load(&files.dir.path().join("word_database.json")).unwrap();

    let binary = EmbeddingIndex::load(
        files.model.as_deref().unwrap(),
        &vocabulary,
        Default::default(),
    )
    .unwrap();
    let text = EmbeddingIndex::load(&text_path, &vocabulary, Default::default()).unwrap();

    assert_eq!(binary.len(), text.len());
    assert_eq!(binary.dimension(), 4);
    let from_binary: Vec<String> = binary
        .nearest_neighbors("книга", 4)
        .unwrap()
        .iter()
        .map(|n| n.word.clone())
        .collect();
    let from_text: Vec<String> = text
        .nearest_neighbors("книга", 4)
        .unwrap()
        .iter()
        .map(|n| n.word.clone())
        .collect();
    assert_eq!(from_binary, from_text);
    assert!(!binary.contains("вектор"));
}
