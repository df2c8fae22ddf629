use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One finished game as remembered by the learning store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GamePath {
    pub target: String,
    pub guesses: Vec<String>,
    pub attempts: u32,
    pub timestamp: DateTime<Utc>,
    /// Abandoned games are recorded as lost.
    #[serde(default)]
    pub won: bool,
}

/// Persisted learning data (the learning file schema).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LearningSnapshot {
    #[serde(default)]
    pub associations: BTreeMap<String, BTreeMap<String, f32>>,
    #[serde(default)]
    pub paths: Vec<GamePath>,
    #[serde(default)]
    pub categories: BTreeMap<String, BTreeSet<String>>,
    #[serde(default)]
    pub games_played: u64,
    #[serde(default)]
    pub total_guesses: u64,
    #[serde(default)]
    pub last_update: Option<DateTime<Utc>>,
}

/// Summary counters for readiness reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LearningStats {
    pub games_played: u64,
    pub total_guesses: u64,
    pub associations: usize,
    pub categories: usize,
    pub paths: usize,
}

/// How hard a target has been, from the games recorded for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordDifficulty {
    pub word: String,
    pub games: usize,
    pub average_attempts: f64,
    /// `average_attempts / 10`, capped at 1.0.
    pub difficulty: f32,
}

/// What the store has learned about play so far, derived from retained paths.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct LearningInsights {
    pub games_analyzed: usize,
    pub average_attempts: f64,
    /// Share of analyzed games that were won, in `[0, 1]`.
    pub win_rate: f64,
    pub unique_targets: usize,
    pub hardest: Option<WordDifficulty>,
    pub easiest: Option<WordDifficulty>,
}

/// A word the store associates with a target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub word: String,
    pub strength: f32,
}
