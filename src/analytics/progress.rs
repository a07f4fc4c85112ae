// src/analytics/progress.rs

use serde::Serialize;

use crate::models::{goal::GoalRecord, test_record::TestRecord};

/// How far the latest test is from the current goal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub overall_target_score: f64,
    /// Latest total marks, `None` before the first test.
    pub current_score: Option<i64>,
    /// Percent of the overall target reached. Unrounded.
    pub overall: Option<f64>,
    pub subjects: Vec<SubjectGoalProgress>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectGoalProgress {
    pub subject_name: String,
    pub target_score: f64,
    /// `None` when the latest test did not cover this subject.
    pub current_score: Option<i64>,
    pub progress: Option<f64>,
}

/// Measures the chronologically latest test against `goal`.
///
/// Expects tests ordered by `test_date` ascending. A subject goal that the
/// latest test does not mention has no data rather than zero progress.
pub fn goal_progress(goal: &GoalRecord, tests: &[TestRecord]) -> GoalProgress {
    let latest = tests.last();

    let subjects = goal
        .subject_goals
        .iter()
        .map(|subject_goal| {
            let current = latest
                .and_then(|t| t.subjects.iter().find(|s| s.subject_name == subject_goal.subject_name))
                .map(|s| s.marks_obtained);
            SubjectGoalProgress {
                subject_name: subject_goal.subject_name.clone(),
                target_score: subject_goal.target_score,
                current_score: current,
                progress: current.map(|marks| marks as f64 / subject_goal.target_score * 100.0),
            }
        })
        .collect();

    GoalProgress {
        overall_target_score: goal.overall_target_score,
        current_score: latest.map(|t| t.marks_obtained),
        overall: latest.map(|t| t.marks_obtained as f64 / goal.overall_target_score * 100.0),
        subjects,
    }
}
