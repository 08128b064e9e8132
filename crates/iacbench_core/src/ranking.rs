//! Per-category and overall ranking.
//!
//! All maps here are insertion-ordered. Ties are broken by that order: of
//! two tools with equal scores, the one seen first keeps the better rank.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::config::BenchConfig;

/// Score and 1-based rank of a tool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub rank: usize,
    pub score: f64,
}

/// Tool name to score/rank, stored in rank order.
pub type Ranking = IndexMap<String, CategoryScore>;

/// Points awarded for a category rank: 100 for first, 10 less per place,
/// never below zero.
pub fn rank_points(rank: usize) -> f64 {
    110usize.saturating_sub(rank.saturating_mul(10)) as f64
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Rank tools by score, highest first.
pub fn rank_category(scores: &IndexMap<String, f64>) -> Ranking {
    let mut sorted: Vec<(&String, f64)> = scores.iter().map(|(t, s)| (t, *s)).collect();
    // sort_by is stable, so equal scores keep their input order
    sorted.sort_by(|a, b| b.1.total_cmp(&a.1));

    sorted
        .into_iter()
        .enumerate()
        .map(|(i, (tool, score))| (tool.clone(), CategoryScore { rank: i + 1, score }))
        .collect()
}

/// Weighted sum of rank points per tool, in order of first appearance.
///
/// A tool contributes only for the categories where it was ranked.
pub fn weighted_totals(
    rankings: &IndexMap<Category, Ranking>,
    config: &BenchConfig,
) -> IndexMap<String, f64> {
    let mut totals: IndexMap<String, f64> = IndexMap::new();
    for (category, ranking) in rankings {
        let weight = config.weight(*category);
        for (tool, entry) in ranking {
            *totals.entry(tool.clone()).or_insert(0.0) += weight * rank_points(entry.rank);
        }
    }
    totals
}

/// Overall ranking from the per-category rankings.
///
/// Tools are ordered by their unrounded totals; the stored score is rounded
/// to two decimals.
pub fn overall_ranking(rankings: &IndexMap<Category, Ranking>, config: &BenchConfig) -> Ranking {
    rank_category(&weighted_totals(rankings, config))
        .into_iter()
        .map(|(tool, entry)| {
            let score = round2(entry.score);
            (tool, CategoryScore { score, ..entry })
        })
        .collect()
}
