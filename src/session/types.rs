use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque player identifier (the WebSocket client id).
pub type PlayerId = String;

/// Unique game identifier (UUID v4 on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(Uuid);

impl GameId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for GameId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for GameId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Solo,
    Multiplayer,
}

impl GameMode {
    /// Number of players a game of this mode seats.
    pub fn player_count(&self) -> usize {
        match self {
            GameMode::Solo => 1,
            GameMode::Multiplayer => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Solo => "solo",
            GameMode::Multiplayer => "multiplayer",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Created,
    InProgress,
    /// Terminal: a winner is set and never changes.
    Won,
}

/// One accepted non-exact guess in a player's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guess {
    pub word: String,
    pub similarity: f32,
    pub rank: u32,
    /// 1-based attempt number at which the guess was made.
    pub attempt: u32,
}

/// Result of an accepted guess, as seen by the guessing player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuessOutcome {
    pub word: String,
    pub similarity: f32,
    pub rank: u32,
    /// The guessing player's attempt count after this guess.
    pub attempts: u32,
    pub is_correct: bool,
    /// The guessing player's history, best rank first.
    pub history: Vec<Guess>,
    pub winner: Option<PlayerId>,
    /// Revealed only to the winner.
    pub target_word: Option<String>,
    /// `true` only for the guess that set the winner.
    pub won_game: bool,
}
