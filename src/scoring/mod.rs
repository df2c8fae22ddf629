//! Guess scoring: one blended similarity and one deterministic rank.
//!
//! # Fairness
//!
//! Similarity blends up to three signals (learned, vector, orthographic). Rank is
//! computed from the vector model's neighbor list and the *unlearned* signals
//! only, so two players guessing the same word against the same target always see
//! the same rank regardless of learning history.
//!
//! # Degradation
//!
//! Without a vector model the engine keeps working on the orthographic signal
//! alone, with coarser ranks bounded by
//! [`FALLBACK_RANK_FLOOR`](crate::constants::FALLBACK_RANK_FLOOR) and
//! [`FALLBACK_RANK_CEILING`](crate::constants::FALLBACK_RANK_CEILING).

pub mod config;
pub mod engine;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod orthography;
pub mod rank;
pub mod types;

#[cfg(test)]
mod tests;

pub use config::RankingConfig;
pub use engine::RankingEngine;
pub use error::{ScoringError, ScoringResult};
pub use orthography::{edit_distance, orthographic_similarity};
pub use rank::{banded_rank, neighbor_rank};
pub use types::{RankingMode, Score, Signals};
