use serde::Serialize;

use crate::constants::{
    EXACT_RANK, LEARNED_SIGNAL_WEIGHT, ORTHOGRAPHIC_SIGNAL_WEIGHT, VECTOR_SIGNAL_WEIGHT,
};

/// Result of scoring a guess against a target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    /// Blended similarity in `[0, 1]`.
    pub similarity: f32,
    /// `0` for the exact match, larger is less similar.
    pub rank: u32,
}

impl Score {
    pub fn exact() -> Self {
        Self {
            similarity: 1.0,
            rank: EXACT_RANK,
        }
    }

    pub fn is_exact(&self) -> bool {
        self.rank == EXACT_RANK
    }
}

/// Individual similarity signals for one `(guess, target)` pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Signals {
    /// Learned association strength (absent when nothing was learned).
    pub learned: Option<f32>,
    /// Embedding cosine similarity (absent when either word has no vector).
    pub vector: Option<f32>,
    /// Normalized edit-distance similarity (always present).
    pub orthographic: f32,
}

impl Signals {
    fn weighted(signals: &[(Option<f32>, f32)]) -> f32 {
        let (sum, weight) = signals
            .iter()
            .filter_map(|(value, weight)| value.map(|v| (v.clamp(0.0, 1.0) * weight, *weight)))
            .fold((0.0, 0.0), |(s, w), (v, wt)| (s + v, w + wt));

        if weight > 0.0 {
            (sum / weight).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Weighted average over the available signals (weights renormalized).
    pub fn blended(&self) -> f32 {
        Self::weighted(&[
            (self.learned, LEARNED_SIGNAL_WEIGHT),
            (self.vector, VECTOR_SIGNAL_WEIGHT),
            (Some(self.orthographic), ORTHOGRAPHIC_SIGNAL_WEIGHT),
        ])
    }

    /// Blend without the learned signal; the only similarity rank may read.
    pub fn rank_similarity(&self) -> f32 {
        Self::weighted(&[
            (self.vector, VECTOR_SIGNAL_WEIGHT),
            (Some(self.orthographic), ORTHOGRAPHIC_SIGNAL_WEIGHT),
        ])
    }
}

/// Which ranking path the engine runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingMode {
    /// Vector model loaded: neighbor ranks plus banded fallback.
    Vector,
    /// No vector model: orthographic banding only.
    Fallback,
}

impl RankingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RankingMode::Vector => "vector",
            RankingMode::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for RankingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
