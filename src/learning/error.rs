use thiserror::Error;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum LearningError {
    /// Reading or writing the learning file failed.
    #[error("learning persistence failed: {0}")]
    PersistenceFailure(#[from] StorageError),

    /// The background snapshot writer has stopped.
    #[error("snapshot writer is not running")]
    WriterClosed,

    /// The writer could not persist a flushed snapshot.
    #[error("learning flush failed: {reason}")]
    FlushFailed { reason: String },
}

pub type LearningResult<T> = Result<T, LearningError>;
