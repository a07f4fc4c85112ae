// src/analytics/mod.rs

//! Pure score arithmetic shared by every store and handler.
//!
//! Nothing in here performs I/O. Aggregators take a snapshot of test records
//! ordered by `test_date` ascending and return freshly built summaries.

pub mod progress;
pub mod scoring;
pub mod subjects;
pub mod summary;

pub use progress::{GoalProgress, SubjectGoalProgress, goal_progress};
pub use scoring::{
    MARKS_PER_CORRECT, MARKS_PER_INCORRECT, MAX_QUESTIONS, ScoreError, SubjectScore, TestScore, compute_marks,
    compute_percentage, compute_weightage, score_subject, score_subjects, score_test,
};
pub use subjects::{SubjectSummary, aggregate_subjects, distinct_subjects};
pub use summary::{TestSummary, aggregate_tests};

/// Two-decimal rounding as the dashboards expect it: half-way values go up
/// (towards positive infinity), so `-0.125` becomes `-0.12`.
pub fn round2(x: f64) -> f64 {
    ((x * 100.0) + 0.5).floor() / 100.0
}

/// Arithmetic mean. Callers guarantee a non-empty slice.
pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

pub(crate) fn mean_i64(values: &[i64]) -> f64 {
    values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64
}

/// Sorts records chronologically. Stable, so same-date tests keep their
/// insertion order.
pub fn sort_by_date(tests: &mut [crate::models::test_record::TestRecord]) {
    tests.sort_by_key(|t| t.test_date);
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use sqlx::types::Json;
    use uuid::Uuid;

    use crate::models::test_record::{SubjectRecord, TestRecord};

    pub fn day(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap() + Duration::days(n)
    }

    pub fn subject(name: &str, total: i64, correct: i64, incorrect: i64, weightage: f64) -> SubjectRecord {
        let marks = correct * 4 - incorrect;
        SubjectRecord {
            subject_name: name.to_string(),
            total_questions: total,
            correct_questions: correct,
            incorrect_questions: incorrect,
            skipped_questions: total - correct - incorrect,
            marks_obtained: marks,
            total_marks: total * 4,
            percentage: marks as f64 / (total * 4) as f64 * 100.0,
            weightage,
        }
    }

    /// A test whose headline numbers are set directly.
    pub fn test_with(day_offset: i64, marks: i64, percentage: f64, subjects: Vec<SubjectRecord>) -> TestRecord {
        TestRecord {
            id: Uuid::new_v4(),
            test_date: day(day_offset),
            total_questions: 200,
            correct_questions: 0,
            incorrect_questions: 0,
            skipped_questions: 200,
            total_marks: 800,
            marks_obtained: marks,
            percentage,
            subjects: Json(subjects),
            created_at: day(day_offset),
            updated_at: day(day_offset),
        }
    }
}
