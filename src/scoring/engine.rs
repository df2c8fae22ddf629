use std::sync::Arc;

use rand::seq::SliceRandom;
use tracing::{debug, info, warn};

use super::config::RankingConfig;
use super::error::{ScoringError, ScoringResult};
use super::orthography::orthographic_similarity;
use super::rank::{banded_rank, neighbor_rank};
use super::types::{RankingMode, Score, Signals};
use crate::constants::{FALLBACK_RANK_FLOOR, NEIGHBOR_RANK_CAP};
use crate::learning::AssociationStore;
use crate::vectors::{VectorIndex, VectorIndexError};
use crate::vocabulary::Vocabulary;

/// Scores guesses against targets. Stateless apart from its collaborators.
///
/// Constructed once at startup and shared (`Arc`) by every session.
pub struct RankingEngine {
    vocabulary: Arc<Vocabulary>,
    index: Arc<dyn VectorIndex>,
    associations: Arc<AssociationStore>,
    config: RankingConfig,
    target_pool: Vec<String>,
}

impl std::fmt::Debug for RankingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RankingEngine")
            .field("mode", &self.mode())
            .field("vocabulary", &self.vocabulary.len())
            .field("target_pool", &self.target_pool.len())
            .field("config", &self.config)
            .finish()
    }
}

impl RankingEngine {
    /// Builds the engine and its target pool.
    ///
    /// The pool holds every vocabulary word the vector model resolves (every
    /// vocabulary word when no model is loaded). An empty pool is fatal.
    pub fn new(
        vocabulary: Arc<Vocabulary>,
        index: Arc<dyn VectorIndex>,
        associations: Arc<AssociationStore>,
        config: RankingConfig,
    ) -> ScoringResult<Self> {
        if vocabulary.is_empty() {
            return Err(ScoringError::EmptyVocabulary);
        }

        let available = index.is_available();
        let target_pool: Vec<String> = vocabulary
            .words()
            .iter()
            .filter(|word| !available || index.contains(word))
            .cloned()
            .collect();

        if target_pool.is_empty() {
            return Err(ScoringError::NoPlayableTargets);
        }

        if !available {
            warn!("Vector model unavailable, ranking in fallback mode");
        }
        info!(
            vocabulary = vocabulary.len(),
            targets = target_pool.len(),
            neighbor_count = config.neighbor_count,
            "Ranking engine ready"
        );

        Ok(Self {
            vocabulary,
            index,
            associations,
            config,
            target_pool,
        })
    }

    pub fn vocabulary(&self) -> &Arc<Vocabulary> {
        &self.vocabulary
    }

    pub fn associations(&self) -> &Arc<AssociationStore> {
        &self.associations
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    pub fn mode(&self) -> RankingMode {
        if self.index.is_available() {
            RankingMode::Vector
        } else {
            RankingMode::Fallback
        }
    }

    /// Number of words a session target may be drawn from.
    pub fn target_pool_size(&self) -> usize {
        self.target_pool.len()
    }

    /// Returns `true` if `word` may be a session target.
    pub fn is_playable_target(&self, word: &str) -> bool {
        self.vocabulary.contains(word) && (!self.index.is_available() || self.index.contains(word))
    }

    /// Draws a target uniformly at random from the pool.
    pub fn draw_target(&self) -> ScoringResult<String> {
        self.target_pool
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or(ScoringError::NoPlayableTargets)
    }

    /// Collects every available signal for a normalized `(guess, target)` pair.
    pub fn signals(&self, guess: &str, target: &str) -> Signals {
        let vector = match self.index.similarity(guess, target) {
            Ok(similarity) => Some(similarity),
            Err(VectorIndexError::Unavailable) => None,
            Err(e) => {
                debug!(guess, target, error = %e, "Vector signal missing");
                None
            }
        };

        Signals {
            learned: self.associations.learned_similarity(guess, target),
            vector,
            orthographic: orthographic_similarity(guess, target),
        }
    }

    /// Blended similarity of a normalized guess to the target.
    pub fn similarity(&self, guess: &str, target: &str) -> f32 {
        if guess == target {
            return 1.0;
        }
        self.signals(guess, target).blended()
    }

    /// Scores a normalized guess. Exact matches short-circuit to `(1.0, 0)`.
    pub fn score(&self, guess: &str, target: &str) -> ScoringResult<Score> {
        if guess == target {
            return Ok(Score::exact());
        }
        if !self.vocabulary.contains(guess) {
            return Err(ScoringError::InvalidWord {
                word: guess.to_string(),
            });
        }

        let signals = self.signals(guess, target);
        let rank = self.rank_with(guess, target, &signals);
        Ok(Score {
            similarity: signals.blended(),
            rank,
        })
    }

    /// Deterministic rank of a normalized, non-exact guess.
    pub fn rank(&self, guess: &str, target: &str) -> u32 {
        if guess == target {
            return 0;
        }
        let signals = self.signals(guess, target);
        self.rank_with(guess, target, &signals)
    }

    fn rank_with(&self, guess: &str, target: &str, signals: &Signals) -> u32 {
        if !self.index.is_available() {
            return banded_rank(signals.rank_similarity(), FALLBACK_RANK_FLOOR);
        }

        let neighbor_count = self.config.neighbor_count;
        match self.index.nearest_neighbors(target, neighbor_count) {
            Ok(neighbors) => {
                if let Some(position) = neighbors.iter().position(|n| n.word == guess) {
                    return neighbor_rank(position + 1, neighbors[position].score, neighbor_count);
                }
            }
            Err(e) => debug!(target, error = %e, "No neighbor list for target"),
        }

        banded_rank(signals.rank_similarity(), NEIGHBOR_RANK_CAP + 1)
    }
}
