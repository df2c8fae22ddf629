//! Pure rank formulas.

use crate::constants::{FALLBACK_RANK_CEILING, NEIGHBOR_RANK_CAP, NEIGHBOR_SCORE_PENALTY};

/// `(lower similarity bound, first rank, last rank)`, best band first.
///
/// Each band's rank range lies strictly above the previous one, so rank is
/// monotone in similarity across the whole table.
const BANDS: [(f32, u32, u32); 7] = [
    (0.85, NEIGHBOR_RANK_CAP + 1, 500),
    (0.70, 501, 1_500),
    (0.55, 1_501, 3_500),
    (0.40, 3_501, 7_000),
    (0.25, 7_001, 15_000),
    (0.10, 15_001, 30_000),
    (0.0, 30_001, FALLBACK_RANK_CEILING),
];

/// Rank of a guess found at 1-indexed `position` of a `neighbor_count`-long
/// neighbor list with cosine `score`.
///
/// Non-decreasing in `position`, non-increasing in `score`, always within
/// `1..=NEIGHBOR_RANK_CAP`.
pub fn neighbor_rank(position: usize, score: f32, neighbor_count: usize) -> u32 {
    let span = u64::from(NEIGHBOR_RANK_CAP - 1 - NEIGHBOR_SCORE_PENALTY);
    let count = neighbor_count.max(1) as u64;
    let offset = (position.max(1) as u64 - 1).min(count - 1);
    let position_part = 1 + (offset * span / count) as u32;

    let score = if score.is_nan() { 0.0 } else { score.clamp(0.0, 1.0) };
    let penalty = ((1.0 - score) * NEIGHBOR_SCORE_PENALTY as f32).round() as u32;

    (position_part + penalty).clamp(1, NEIGHBOR_RANK_CAP)
}

/// Banded rank for a similarity outside the neighbor list.
///
/// Within a band rank is affine and decreasing in similarity. `top_floor` is the
/// first rank of the best band: just above the neighbor ranks when a model is
/// loaded, or [`FALLBACK_RANK_FLOOR`](crate::constants::FALLBACK_RANK_FLOOR)
/// without one.
pub fn banded_rank(similarity: f32, top_floor: u32) -> u32 {
    let similarity = if similarity.is_nan() {
        0.0
    } else {
        similarity.clamp(0.0, 1.0)
    };

    let mut upper = 1.0f32;
    for (index, &(lower, first, last)) in BANDS.iter().enumerate() {
        let is_last = index == BANDS.len() - 1;
        if similarity >= lower || is_last {
            let first = if index == 0 { top_floor.min(last) } else { first };
            let width = (upper - lower).max(f32::EPSILON);
            let fraction = ((upper - similarity) / width).clamp(0.0, 1.0);
            return first + (fraction * (last - first) as f32).round() as u32;
        }
        upper = lower;
    }

    FALLBACK_RANK_CEILING
}
