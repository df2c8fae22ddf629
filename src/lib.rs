//! WordWeave library crate (used by the server binary and integration tests).
//!
//! # Layout
//!
//! Leaves first:
//!
//! - [`vocabulary`] - canonical word list, normalization, play counters
//! - [`vectors`] - read-only embedding index ([`VectorIndex`], [`EmbeddingIndex`])
//! - [`learning`] - [`AssociationStore`]: learned word-pair strengths and categories
//! - [`scoring`] - [`RankingEngine`]: blended similarity and deterministic rank
//! - [`session`] - [`GameSession`] state machine
//! - [`coordinator`] - [`SessionCoordinator`]: session registry and matchmaking
//! - [`gateway`] - axum router and WebSocket protocol
//!
//! ## Test/Mock Support
//! Sample models and engines are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod constants;
pub mod coordinator;
pub mod gateway;
pub mod hashing;
pub mod learning;
pub mod scoring;
pub mod session;
pub mod storage;
pub mod vectors;
pub mod vocabulary;

pub use config::{Config, ConfigError};
pub use coordinator::{
    CoordinatorConfig, CoordinatorError, GameStarted, Matchmaking, ReapReport, RoutedGuess,
    SessionCoordinator,
};
pub use gateway::{AppState, ClientMessage, ServerMessage, create_router_with_state};
pub use learning::{AssociationStore, LearningConfig, LearningError, SnapshotWriter};
pub use scoring::{RankingConfig, RankingEngine, RankingMode, Score, ScoringError};
pub use session::{GameId, GameMode, GameSession, Guess, GuessOutcome, PlayerId, SessionError};
pub use storage::StorageError;
pub use vectors::{EmbeddingIndex, Neighbor, VectorIndex, VectorIndexConfig, VectorIndexError};
pub use vocabulary::{Vocabulary, VocabularyError, normalize_word};
