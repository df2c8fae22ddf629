use crate::session::{GameId, GameMode, GuessOutcome, PlayerId};

/// A freshly created game, announced to each of its players.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStarted {
    pub game_id: GameId,
    pub mode: GameMode,
    pub players: Vec<PlayerId>,
}

impl GameStarted {
    /// The other player, if any.
    pub fn opponent_of(&self, player: &str) -> Option<&PlayerId> {
        self.players.iter().find(|p| p.as_str() != player)
    }
}

/// Result of asking for a multiplayer game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matchmaking {
    /// Queued until another player asks.
    Waiting,
    Matched(GameStarted),
}

/// A scored guess plus what the transport needs to fan it out.
#[derive(Debug, Clone)]
pub struct RoutedGuess {
    pub game_id: GameId,
    pub outcome: GuessOutcome,
    /// Receives `opponent_guess` (and `game_over` when the game was just won).
    pub opponent: Option<PlayerId>,
}

/// Sessions removed by one reaper pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReapReport {
    pub finished: usize,
    pub abandoned: usize,
}

impl ReapReport {
    pub fn total(&self) -> usize {
        self.finished + self.abandoned
    }
}
