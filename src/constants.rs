//! Cross-cutting, shared constants.
//!
//! # Ranking Invariants
//!
//! The rank ranges below are treated as compile-time invariants by the scoring
//! and session modules:
//!
//! 1. Rank `0` is reserved for the exact match.
//! 2. Nearest-neighbor ranks never exceed [`NEIGHBOR_RANK_CAP`].
//! 3. Banded fallback ranks start above [`NEIGHBOR_RANK_CAP`] (or at
//!    [`FALLBACK_RANK_FLOOR`] when no vector model is loaded) and never exceed
//!    [`FALLBACK_RANK_CEILING`].

/// Signal weight for the learned association strength.
pub const LEARNED_SIGNAL_WEIGHT: f32 = 0.15;
/// Signal weight for the embedding cosine similarity.
pub const VECTOR_SIGNAL_WEIGHT: f32 = 0.70;
/// Signal weight for the orthographic (edit distance) similarity.
pub const ORTHOGRAPHIC_SIGNAL_WEIGHT: f32 = 0.15;

/// Rank reported for an exact match.
pub const EXACT_RANK: u32 = 0;
/// Highest rank a nearest-neighbor hit can produce.
pub const NEIGHBOR_RANK_CAP: u32 = 200;
/// Share of [`NEIGHBOR_RANK_CAP`] driven by the neighbor's score.
pub const NEIGHBOR_SCORE_PENALTY: u32 = 20;
/// Lowest rank of the banded formula when the vector model is unavailable.
pub const FALLBACK_RANK_FLOOR: u32 = 2;
/// Highest rank any guess can receive.
pub const FALLBACK_RANK_CEILING: u32 = 60_000;

/// Default number of nearest neighbors fetched for a target.
pub const DEFAULT_NEIGHBOR_COUNT: usize = 1000;
/// Default number of per-target neighbor lists kept in memory.
pub const DEFAULT_NEIGHBOR_CACHE_CAPACITY: u64 = 256;

/// Increment scale for non-exact association updates.
pub const LEARNING_RATE: f32 = 0.1;
/// Ceiling for strengths produced by non-exact guesses.
pub const MAX_LEARNED_STRENGTH: f32 = 0.95;
/// Strength assigned by an exact guess.
pub const EXACT_STRENGTH: f32 = 1.0;
/// Multiplier applied to the reverse edge.
pub const REVERSE_DISCOUNT: f32 = 0.8;
/// Guesses above this similarity join the target's category on a win.
pub const CATEGORY_SIMILARITY_THRESHOLD: f32 = 0.5;
/// Similarity floor granted to words sharing a category.
pub const CATEGORY_SIMILARITY_FLOOR: f32 = 0.6;
/// Maximum number of retained game paths.
pub const MAX_RETAINED_PATHS: usize = 1000;
/// Completed games between learning snapshots.
pub const DEFAULT_FLUSH_EVERY_GAMES: u64 = 10;
/// Average attempts that map to the maximum difficulty of 1.0.
pub const DIFFICULTY_ATTEMPTS_SCALE: f64 = 10.0;
/// Difficulty reported for a target with no recorded games.
pub const DEFAULT_DIFFICULTY: f32 = 0.5;
/// Suggestions returned per hint request.
pub const HINT_COUNT: usize = 5;
/// Number of lock shards in the association table.
pub const ASSOCIATION_SHARDS: usize = 16;

/// Default session idle timeout (abandoned games).
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 30 * 60;
/// Default time a finished game stays readable before reaping.
pub const DEFAULT_FINISHED_TTL_SECS: u64 = 5 * 60;
/// Default reaper poll interval.
pub const DEFAULT_REAP_INTERVAL_SECS: u64 = 30;

/// Tag suffixes probed, in order, when resolving a word in the vector model.
pub const DEFAULT_TAG_SUFFIXES: &[&str] = &["_NOUN", ""];

/// Default learning data filename inside the data directory.
pub const LEARNING_FILENAME: &str = "learning.json";
/// Default vocabulary filename inside the data directory.
pub const VOCABULARY_FILENAME: &str = "word_database.json";
