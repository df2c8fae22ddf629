//! Vocabulary error types.

use thiserror::Error;

use crate::storage::StorageError;

/// Fatal vocabulary problems detected at startup.
#[derive(Debug, Error)]
pub enum VocabularyError {
    /// The vocabulary contains no words.
    #[error("vocabulary is empty")]
    Empty,

    /// A record's key does not match its `word` field after normalization.
    #[error("inconsistent vocabulary record: key '{key}' holds word '{word}'")]
    Inconsistent { key: String, word: String },

    /// Two keys normalize to the same word.
    #[error("duplicate vocabulary word after normalization: '{word}'")]
    Duplicate { word: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type VocabularyResult<T> = Result<T, VocabularyError>;
