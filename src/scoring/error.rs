use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoringError {
    /// The guessed word is not in the vocabulary.
    #[error("word not in vocabulary: {word}")]
    InvalidWord { word: String },

    #[error("vocabulary is empty")]
    EmptyVocabulary,

    /// No vocabulary word resolves in the vector model.
    #[error("no playable target words: vocabulary and vector model do not overlap")]
    NoPlayableTargets,
}

pub type ScoringResult<T> = Result<T, ScoringError>;
