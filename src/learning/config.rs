use crate::constants::{
    CATEGORY_SIMILARITY_FLOOR, CATEGORY_SIMILARITY_THRESHOLD, DEFAULT_FLUSH_EVERY_GAMES,
    LEARNING_RATE, MAX_LEARNED_STRENGTH, MAX_RETAINED_PATHS, REVERSE_DISCOUNT,
};

/// Tuning knobs for the association store.
#[derive(Debug, Clone)]
pub struct LearningConfig {
    /// Increment scale for non-exact guesses.
    pub learning_rate: f32,
    /// Ceiling for non-exact strengths.
    pub max_strength: f32,
    /// Multiplier applied to the reverse edge.
    pub reverse_discount: f32,
    /// Minimum guess similarity to join a category on a win.
    pub category_threshold: f32,
    /// Similarity floor for words sharing a category.
    pub category_floor: f32,
    /// Retained game paths (oldest dropped first).
    pub max_paths: usize,
    /// Completed games between snapshots (0 disables batching).
    pub flush_every: u64,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            learning_rate: LEARNING_RATE,
            max_strength: MAX_LEARNED_STRENGTH,
            reverse_discount: REVERSE_DISCOUNT,
            category_threshold: CATEGORY_SIMILARITY_THRESHOLD,
            category_floor: CATEGORY_SIMILARITY_FLOOR,
            max_paths: MAX_RETAINED_PATHS,
            flush_every: DEFAULT_FLUSH_EVERY_GAMES,
        }
    }
}

impl LearningConfig {
    pub fn with_flush_every(mut self, games: u64) -> Self {
        self.flush_every = games;
        self
    }

    pub fn with_max_paths(mut self, max_paths: usize) -> Self {
        self.max_paths = max_paths;
        self
    }
}
