//! Engines over the sample vector model, for tests.

use std::sync::Arc;

use super::{RankingConfig, RankingEngine};
use crate::learning::AssociationStore;
use crate::vectors::mock::{sample_index, sample_vocabulary};
use crate::vectors::{EmbeddingIndex, VectorIndexConfig};

/// Vector-mode engine over the sample model with an empty association store.
pub fn vector_engine(config: RankingConfig) -> RankingEngine {
    let vocabulary = Arc::new(sample_vocabulary());
    let index = Arc::new(sample_index(&vocabulary));
    RankingEngine::new(
        vocabulary,
        index,
        Arc::new(AssociationStore::default()),
        config,
    )
    .expect("sample model has playable targets")
}

/// Fallback-mode engine over the sample vocabulary.
pub fn fallback_engine() -> RankingEngine {
    RankingEngine::new(
        Arc::new(sample_vocabulary()),
        Arc::new(EmbeddingIndex::unavailable(VectorIndexConfig::default())),
        Arc::new(AssociationStore::default()),
        RankingConfig::default(),
    )
    .expect("sample vocabulary is non-empty")
}

/// Shared vector-mode engine with default ranking config.
pub fn sample_engine() -> Arc<RankingEngine> {
    Arc::new(vector_engine(RankingConfig::default()))
}
