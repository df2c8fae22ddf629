use thiserror::Error;

use super::types::GameMode;
use crate::scoring::ScoringError;

/// Errors returned for a rejected guess or an invalid session setup.
///
/// Rejected guesses never change session state.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("empty word")]
    EmptyWord,

    #[error("word '{word}' is not in the dictionary")]
    InvalidWord { word: String },

    #[error("player '{player}' is not part of this game")]
    UnknownPlayer { player: String },

    #[error("word '{word}' was already guessed")]
    RepeatedWord { word: String },

    #[error("word '{word}' cannot be used as a target")]
    InvalidTarget { word: String },

    #[error("{mode} game needs {expected} distinct players, got {actual}")]
    InvalidPlayers {
        mode: GameMode,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

impl SessionError {
    /// Stable machine-readable code sent to clients.
    pub fn code(&self) -> &'static str {
        match self {
            SessionError::EmptyWord => "empty_word",
            SessionError::InvalidWord { .. } => "invalid_word",
            SessionError::UnknownPlayer { .. } => "unknown_player",
            SessionError::RepeatedWord { .. } => "repeated_word",
            SessionError::InvalidTarget { .. } => "invalid_target",
            SessionError::InvalidPlayers { .. } => "invalid_players",
            SessionError::Scoring(ScoringError::InvalidWord { .. }) => "invalid_word",
            SessionError::Scoring(_) => "scoring_error",
        }
    }
}

pub type SessionResult<T> = Result<T, SessionError>;
