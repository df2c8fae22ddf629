use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by vector index operations.
pub enum VectorIndexError {
    /// No model is loaded; the index runs in fallback mode.
    #[error("vector model unavailable")]
    Unavailable,

    /// None of the tagged forms of the word exist in the model.
    #[error("word not found in vector model: {word}")]
    WordNotFound {
        /// Queried word.
        word: String,
    },

    /// The model file could not be read.
    #[error("failed to read vector model '{path}': {source}")]
    Io {
        /// Model path.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The model file is malformed.
    #[error("invalid vector model '{path}': {reason}")]
    InvalidFormat {
        /// Model path.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// A row's length differs from the model dimension.
    #[error("invalid vector dimension for '{word}': expected {expected}, got {actual}")]
    InvalidDimension {
        /// Row key.
        word: String,
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
    },

    /// The model contained no vocabulary words.
    #[error("vector model '{path}' has no vocabulary words")]
    NoVocabularyWords {
        /// Model path.
        path: PathBuf,
    },
}

pub type VectorIndexResult<T> = Result<T, VectorIndexError>;
