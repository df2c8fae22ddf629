use thiserror::Error;

use super::messages::ServerMessage;
use crate::coordinator::CoordinatorError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    #[error("invalid game id '{0}'")]
    InvalidGameId(String),

    #[error(transparent)]
    Coordinator(#[from] CoordinatorError),

    #[error("internal error: {0}")]
    InternalError(String),
}

impl GatewayError {
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::InvalidMessage(_) => "invalid_message",
            GatewayError::InvalidGameId(_) => "unknown_game",
            GatewayError::Coordinator(e) => e.code(),
            GatewayError::InternalError(_) => "internal_error",
        }
    }

    /// The `error` frame sent back to the originating player.
    pub fn to_message(&self) -> ServerMessage {
        ServerMessage::Error {
            message: self.to_string(),
            code: self.code().to_string(),
        }
    }
}
