use crate::constants::DEFAULT_NEIGHBOR_COUNT;

#[derive(Debug, Clone)]
pub struct RankingConfig {
    /// Length of the per-target nearest-neighbor list used for direct ranks.
    pub neighbor_count: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            neighbor_count: DEFAULT_NEIGHBOR_COUNT,
        }
    }
}

impl RankingConfig {
    pub fn with_neighbor_count(neighbor_count: usize) -> Self {
        Self { neighbor_count }
    }
}
