//! Read-only nearest-neighbor lookup over precomputed word embeddings.
//!
//! Words are resolved through an ordered list of tag suffixes (`книга_NOUN`,
//! then `книга`, ...); the first key present in the model wins. Callers must
//! treat [`VectorIndexError::WordNotFound`] and [`VectorIndexError::Unavailable`]
//! as degradation, not failure.

pub mod config;
pub mod error;
pub mod index;
pub mod loader;
#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use config::VectorIndexConfig;
pub use error::{VectorIndexError, VectorIndexResult};
pub use index::EmbeddingIndex;
pub use loader::VectorFormat;

use std::sync::Arc;

/// One entry of a nearest-neighbor list.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    /// Bare vocabulary word (tag suffix stripped).
    pub word: String,
    /// Cosine similarity to the query word, clamped to `[0, 1]`.
    pub score: f32,
}

/// Similarity lookups over a word-embedding model.
pub trait VectorIndex: Send + Sync {
    /// Returns `false` when no model is loaded (permanent fallback mode).
    fn is_available(&self) -> bool;

    /// Returns `true` if `word` resolves to a vector.
    fn contains(&self, word: &str) -> bool;

    /// Cosine similarity between two words, clamped to `[0, 1]`.
    fn similarity(&self, a: &str, b: &str) -> VectorIndexResult<f32>;

    /// Up to `top_n` vocabulary words closest to `word`, best first, `word` excluded.
    fn nearest_neighbors(&self, word: &str, top_n: usize) -> VectorIndexResult<Arc<Vec<Neighbor>>>;
}
