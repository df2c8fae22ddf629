//! Per-game state machine.
//!
//! A [`GameSession`] owns one target word plus per-player attempt counts and
//! guess histories. States run `Created → InProgress → Won`; there is no lost
//! state, a game simply ends when someone guesses the target or when the
//! coordinator reaps it.
//!
//! All transitions of one session go through a single mutex. Learning and
//! vocabulary counters are updated after the lock is released.

pub mod error;
pub mod game;
pub mod types;


pub use error::{SessionError, SessionResult};
pub use game::GameSession;
pub use types::{GameId, GameMode, Guess, GuessOutcome, PlayerId, SessionState};
