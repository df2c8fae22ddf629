use crate::constants::{DEFAULT_NEIGHBOR_CACHE_CAPACITY, DEFAULT_TAG_SUFFIXES};

/// Vector index configuration.
#[derive(Debug, Clone)]
pub struct VectorIndexConfig {
    /// Suffixes probed in order when resolving a word (`""` means the bare word).
    pub tag_suffixes: Vec<String>,
    /// Number of per-target neighbor lists kept in memory.
    pub neighbor_cache_capacity: u64,
}

impl Default for VectorIndexConfig {
    fn default() -> Self {
        Self {
            tag_suffixes: DEFAULT_TAG_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            neighbor_cache_capacity: DEFAULT_NEIGHBOR_CACHE_CAPACITY,
        }
    }
}

impl VectorIndexConfig {
    pub fn with_tag_suffixes<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tag_suffixes = suffixes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_neighbor_cache_capacity(mut self, capacity: u64) -> Self {
        self.neighbor_cache_capacity = capacity;
        self
    }
}
