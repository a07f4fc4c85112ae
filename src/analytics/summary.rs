// src/analytics/summary.rs

use serde::Serialize;

use super::{mean, mean_i64, round2};
use crate::models::test_record::TestRecord;

/// Headline statistics across every recorded test.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSummary {
    pub total_tests: usize,
    pub average_score: f64,
    pub average_percentage: f64,
    pub best_score: i64,
    pub worst_score: i64,
    /// Population standard deviation of marks. The name is kept for
    /// compatibility with existing reports.
    pub score_variance: f64,
    /// Latest score against the first one, in percent.
    pub improvement: f64,
    pub percentile: f64,
    pub latest_score: i64,
    pub latest_percentage: f64,
}

/// Aggregates tests ordered by `test_date` ascending.
///
/// An empty slice gives an all-zero summary. A zero first score makes
/// `improvement` non-finite; that is left as is.
pub fn aggregate_tests(tests: &[TestRecord]) -> TestSummary {
    let Some(latest) = tests.last() else {
        return TestSummary::default();
    };

    let scores: Vec<i64> = tests.iter().map(|t| t.marks_obtained).collect();
    let percentages: Vec<f64> = tests.iter().map(|t| t.percentage).collect();
    let n = scores.len() as f64;

    let average_score = mean_i64(&scores);
    let variance = scores
        .iter()
        .map(|&s| (s as f64 - average_score).powi(2))
        .sum::<f64>()
        / n;

    let improvement = if scores.len() > 1 {
        let first = scores[0];
        (latest.marks_obtained - first) as f64 / first as f64 * 100.0
    } else {
        0.0
    };

    TestSummary {
        total_tests: tests.len(),
        average_score: round2(average_score),
        average_percentage: round2(mean(&percentages)),
        best_score: scores.iter().copied().max().unwrap_or_default(),
        worst_score: scores.iter().copied().min().unwrap_or_default(),
        score_variance: round2(variance.sqrt()),
        improvement: round2(improvement),
        percentile: round2(percentile_of(latest.marks_obtained, &scores)),
        latest_score: latest.marks_obtained,
        latest_percentage: latest.percentage,
    }
}

/// Share of scores at or below `score`.
///
/// Scores are ranked descending and `score` is located at its first
/// occurrence, so every tie counts as at-or-below.
fn percentile_of(score: i64, scores: &[i64]) -> f64 {
    let mut ranked = scores.to_vec();
    ranked.sort_unstable_by(|a, b| b.cmp(a));
    let rank = ranked.iter().position(|&s| s == score).unwrap_or(ranked.len());
    (ranked.len() - rank) as f64 / ranked.len() as f64 * 100.0
}
