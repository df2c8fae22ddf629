//! WebSocket wire protocol (JSON text frames).

use serde::{Deserialize, Serialize};

use crate::learning::Suggestion;
use crate::session::{GameId, GameMode, Guess, GuessOutcome, PlayerId};

/// Client → server, tagged by `action`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ClientMessage {
    StartSolo,
    StartMultiplayer,
    Guess { game_id: String, word: String },
    Hint { game_id: String },
}

/// Server → client, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    GameStarted {
        game_id: GameId,
        mode: GameMode,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        opponent: Option<PlayerId>,
    },
    WaitingForOpponent,
    GuessResult {
        word: String,
        similarity: f32,
        rank: u32,
        attempts: u32,
        is_correct: bool,
        history: Vec<Guess>,
        winner: Option<PlayerId>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_word: Option<String>,
    },
    OpponentGuess {
        attempts: u32,
        last_word: String,
    },
    GameOver {
        winner: PlayerId,
        word: String,
    },
    Hints {
        game_id: GameId,
        suggestions: Vec<Suggestion>,
    },
    Error {
        message: String,
        code: String,
    },
}

impl From<GuessOutcome> for ServerMessage {
    fn from(outcome: GuessOutcome) -> Self {
        ServerMessage::GuessResult {
            word: outcome.word,
            similarity: outcome.similarity,
            rank: outcome.rank,
            attempts: outcome.attempts,
            is_correct: outcome.is_correct,
            history: outcome.history,
            winner: outcome.winner,
            target_word: outcome.target_word,
        }
    }
}

/// A message addressed to one connected player.
#[derive(Debug, Clone, PartialEq)]
pub struct Outbound {
    pub recipient: PlayerId,
    pub message: ServerMessage,
}

impl Outbound {
    pub fn new(recipient: impl Into<PlayerId>, message: ServerMessage) -> Self {
        Self {
            recipient: recipient.into(),
            message,
        }
    }
}
