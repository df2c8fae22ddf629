//! Adaptive learning from gameplay.
//!
//! The [`AssociationStore`] keeps directed word-pair strengths and per-target
//! category sets. It is the only mutable part of the ranking stack; the learned
//! signal feeds similarity but never rank.

pub mod config;
pub mod error;
pub mod persistence;
pub mod store;
pub mod types;


pub use config::LearningConfig;
pub use error::{LearningError, LearningResult};
pub use persistence::SnapshotWriter;
pub use store::AssociationStore;
pub use types::{
    GamePath, LearningInsights, LearningSnapshot, LearningStats, Suggestion, WordDifficulty,
};
