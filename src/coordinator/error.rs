use thiserror::Error;

use crate::session::{GameId, SessionError};

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("unknown game {game_id}")]
    UnknownGame { game_id: GameId },

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl CoordinatorError {
    /// Stable machine-readable code sent to clients.
    pub fn code(&self) -> &'static str {
        match self {
            CoordinatorError::UnknownGame { .. } => "unknown_game",
            CoordinatorError::Session(e) => e.code(),
        }
    }
}

pub type CoordinatorResult<T> = Result<T, CoordinatorError>;
