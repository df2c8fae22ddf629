use std::sync::Arc;

use super::mock::{fallback_engine, vector_engine};
use super::*;
use crate::constants::{FALLBACK_RANK_CEILING, FALLBACK_RANK_FLOOR, NEIGHBOR_RANK_CAP};
use crate::learning::AssociationStore;
use crate::vectors::mock::{sample_index, sample_vocabulary};
use crate::vocabulary::Vocabulary;

#[test]
fn test_exact_match_short_circuits() {
    for engine in [vector_engine(RankingConfig::default()), fallback_engine()] {
        for word in ["книга", "книжка", "море"] {
            let score = engine.score(word, word).unwrap();
            assert_eq!(score, Score::exact());
            assert_eq!(score.rank, 0);
            assert_eq!(score.similarity, 1.0);
            assert_eq!(engine.similarity(word, word), 1.0);
        }
    }
}

#[test]
fn test_unknown_guess_is_invalid_word() {
    let engine = vector_engine(RankingConfig::default());

    assert!(matches!(
        engine.score("абракадабра", "книга"),
        Err(ScoringError::InvalidWord { ref word }) if word == "абракадабра"
    ));
}

#[test]
fn test_non_exact_rank_is_never_zero() {
    let engine = vector_engine(RankingConfig::default());
    for guess in sample_vocabulary().words() {
        if guess != "книга" {
            let score = engine.score(guess, "книга").unwrap();
            assert!(score.rank > 0, "{guess} got rank 0");
            assert!((0.0..=1.0).contains(&score.similarity));
        }
    }
}

#[test]
fn test_neighbor_ranks_follow_list_order() {
    let engine = vector_engine(RankingConfig::default());

    let journal = engine.score("журнал", "книга").unwrap();
    let newspaper = engine.score("газета", "книга").unwrap();
    let table = engine.score("стол", "книга").unwrap();

    assert_eq!(journal.rank, 1);
    assert!(journal.rank <= newspaper.rank);
    assert!(newspaper.rank <= table.rank);
    assert!(table.rank <= NEIGHBOR_RANK_CAP);
}

#[test]
fn test_words_without_vectors_rank_above_neighbors() {
    let engine = vector_engine(RankingConfig::default());

    let booklet = engine.score("книжка", "книга").unwrap();
    assert!(booklet.rank > NEIGHBOR_RANK_CAP);
    assert!(booklet.rank <= FALLBACK_RANK_CEILING);
}

#[test]
fn test_short_neighbor_list_falls_back_to_bands() {
    let engine = vector_engine(RankingConfig::with_neighbor_count(2));

    let journal = engine.score("журнал", "книга").unwrap();
    let table = engine.score("стол", "книга").unwrap();
    let cat = engine.score("кошка", "книга").unwrap();

    assert!(journal.rank <= NEIGHBOR_RANK_CAP);
    assert!(table.rank > NEIGHBOR_RANK_CAP);
    assert!(cat.rank > NEIGHBOR_RANK_CAP);
}

#[test]
fn test_fallback_mode_ranks_are_bounded_and_ordered() {
    let engine = fallback_engine();
    assert_eq!(engine.mode(), RankingMode::Fallback);

    let close = engine.score("книжка", "книга").unwrap();
    let far = engine.score("море", "книга").unwrap();

    assert!(close.similarity > far.similarity);
    assert!(close.rank <= far.rank);
    for score in [close, far] {
        assert!(score.rank >= FALLBACK_RANK_FLOOR);
        assert!(score.rank <= FALLBACK_RANK_CEILING);
    }
}

#[test]
fn test_rank_ignores_learning_history() {
    let engine = vector_engine(RankingConfig::with_neighbor_count(2));
    let before = engine.score("стол", "книга").unwrap();

    for _ in 0..50 {
        engine.associations().observe_guess("стол", "книга", 3, false);
    }
    engine.associations().observe_game_result(
        "книга",
        &[crate::session::Guess {
            word: "стол".to_string(),
            similarity: 0.9,
            rank: 3,
            attempt: 1,
        }],
        2,
        true,
    );

    let after = engine.score("стол", "книга").unwrap();
    assert_eq!(before.rank, after.rank);
    assert!(after.similarity > before.similarity);
}

#[test]
fn test_signal_blend_renormalizes_weights() {
    let orthographic_only = Signals {
        learned: None,
        vector: None,
        orthographic: 0.4,
    };
    assert!((orthographic_only.blended() - 0.4).abs() < 1e-6);

    let vector_and_text = Signals {
        learned: None,
        vector: Some(1.0),
        orthographic: 0.0,
    };
    assert!((vector_and_text.blended() - 0.70 / 0.85).abs() < 1e-6);

    let all = Signals {
        learned: Some(1.0),
        vector: Some(0.0),
        orthographic: 0.0,
    };
    assert!((all.blended() - 0.15).abs() < 1e-6);
    assert_eq!(all.rank_similarity(), 0.0);
}

#[test]
fn test_banded_rank_is_monotone() {
    let mut previous = 0;
    for step in (0..=1000).rev() {
        let similarity = step as f32 / 1000.0;
        let rank = banded_rank(similarity, NEIGHBOR_RANK_CAP + 1);
        assert!(
            rank >= previous,
            "similarity {similarity} ranked {rank}, better than {previous}"
        );
        previous = rank;
    }
}

#[test]
fn test_banded_rank_bounds() {
    assert_eq!(banded_rank(1.0, NEIGHBOR_RANK_CAP + 1), NEIGHBOR_RANK_CAP + 1);
    assert_eq!(banded_rank(1.0, FALLBACK_RANK_FLOOR), FALLBACK_RANK_FLOOR);
    assert_eq!(banded_rank(0.0, FALLBACK_RANK_FLOOR), FALLBACK_RANK_CEILING);
    assert_eq!(banded_rank(f32::NAN, FALLBACK_RANK_FLOOR), FALLBACK_RANK_CEILING);
    assert_eq!(banded_rank(0.85, NEIGHBOR_RANK_CAP + 1), 500);
    assert_eq!(banded_rank(0.70, NEIGHBOR_RANK_CAP + 1), 1_500);
}

#[test]
fn test_neighbor_rank_shape() {
    assert_eq!(neighbor_rank(1, 1.0, 1000), 1);
    assert!(neighbor_rank(1, 0.9, 1000) <= neighbor_rank(2, 0.9, 1000));
    assert!(neighbor_rank(10, 0.9, 1000) <= neighbor_rank(10, 0.5, 1000));
    assert_eq!(neighbor_rank(1000, 0.0, 1000), 199);
    assert!(neighbor_rank(5000, 0.0, 1000) <= NEIGHBOR_RANK_CAP);
}

#[test]
fn test_orthographic_similarity() {
    assert_eq!(edit_distance("книга", "книжка"), 2);
    assert_eq!(edit_distance("", "кот"), 3);
    assert_eq!(edit_distance("кот", "кот"), 0);
    assert_eq!(orthographic_similarity("кот", "кот"), 1.0);
    assert_eq!(orthographic_similarity("", ""), 1.0);
    assert_eq!(orthographic_similarity("абв", ""), 0.0);
    assert!((orthographic_similarity("книга", "книжка") - (1.0 - 2.0 / 6.0)).abs() < 1e-6);
}

#[test]
fn test_target_pool_respects_vector_model() {
    let engine = vector_engine(RankingConfig::default());
    assert!(engine.is_playable_target("книга"));
    assert!(!engine.is_playable_target("книжка"));
    assert!(!engine.is_playable_target("абракадабра"));
    assert_eq!(engine.target_pool_size(), 13);

    for _ in 0..20 {
        let target = engine.draw_target().unwrap();
        assert!(engine.is_playable_target(&target));
    }

    let fallback = fallback_engine();
    assert!(fallback.is_playable_target("книжка"));
    assert_eq!(fallback.target_pool_size(), sample_vocabulary().len());
}

#[test]
fn test_disjoint_vocabulary_and_model_is_fatal() {
    let model_vocabulary = sample_vocabulary();
    let index = Arc::new(sample_index(&model_vocabulary));
    let vocabulary = Arc::new(Vocabulary::from_words(["абракадабра"]).unwrap());

    let result = RankingEngine::new(
        vocabulary,
        index,
        Arc::new(AssociationStore::default()),
        RankingConfig::default(),
    );
    assert!(matches!(result, Err(ScoringError::NoPlayableTargets)));
}
