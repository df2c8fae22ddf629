//! Live session registry and matchmaking.
//!
//! The [`SessionCoordinator`] owns every running [`GameSession`] and the FIFO
//! queue of players waiting for an opponent. Both live behind one mutex so a
//! pairing is atomic; the lock is never held while a guess is scored.
//!
//! [`GameSession`]: crate::session::GameSession

pub mod config;
pub mod error;
pub mod registry;
pub mod types;


pub use config::CoordinatorConfig;
pub use error::{CoordinatorError, CoordinatorResult};
pub use registry::SessionCoordinator;
pub use types::{GameStarted, Matchmaking, ReapReport, RoutedGuess};
