// src/analytics/subjects.rs

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::{mean, mean_i64, round2};
use crate::models::test_record::{SubjectRecord, TestRecord};

/// Statistics for one subject across every test that covered it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectSummary {
    pub subject_name: String,
    pub average_score: f64,
    pub average_percentage: f64,
    pub best_score: i64,
    pub worst_score: i64,
    pub latest_score: i64,
    /// Latest occurrence against the one before it (not against the first).
    pub improvement: f64,
    /// Mean share of the test's questions.
    pub weightage: f64,
    /// Sum of marks over all occurrences.
    pub total_contribution: i64,
    pub average_total_marks: f64,
    pub average_total_questions: f64,
    pub average_correct_questions: f64,
    pub average_incorrect_questions: f64,
    pub average_skipped_questions: f64,
    /// Marks per occurrence, oldest first.
    pub scores: Vec<i64>,
    /// Percentage per occurrence, oldest first.
    pub percentages: Vec<f64>,
}

/// Per-subject columns collected while walking the tests.
#[derive(Default)]
struct SubjectSeries {
    scores: Vec<i64>,
    percentages: Vec<f64>,
    total_marks: Vec<i64>,
    weightages: Vec<f64>,
    total_questions: Vec<i64>,
    correct_questions: Vec<i64>,
    incorrect_questions: Vec<i64>,
    skipped_questions: Vec<i64>,
}

impl SubjectSeries {
    fn push(&mut self, subject: &SubjectRecord) {
        self.scores.push(subject.marks_obtained);
        self.percentages.push(subject.percentage);
        self.total_marks.push(subject.total_marks);
        self.weightages.push(subject.weightage);
        self.total_questions.push(subject.total_questions);
        self.correct_questions.push(subject.correct_questions);
        self.incorrect_questions.push(subject.incorrect_questions);
        self.skipped_questions.push(subject.skipped_questions);
    }

    fn summarize(self, subject_name: String) -> SubjectSummary {
        // A series is only created alongside its first occurrence.
        let latest = self.scores[self.scores.len() - 1];
        let improvement = if self.scores.len() > 1 {
            let previous = self.scores[self.scores.len() - 2];
            (latest - previous) as f64 / previous as f64 * 100.0
        } else {
            0.0
        };

        SubjectSummary {
            subject_name,
            average_score: round2(mean_i64(&self.scores)),
            average_percentage: round2(mean(&self.percentages)),
            best_score: self.scores.iter().copied().max().unwrap_or(latest),
            worst_score: self.scores.iter().copied().min().unwrap_or(latest),
            latest_score: latest,
            improvement: round2(improvement),
            weightage: round2(mean(&self.weightages)),
            total_contribution: self.scores.iter().sum(),
            average_total_marks: round2(mean_i64(&self.total_marks)),
            average_total_questions: round2(mean_i64(&self.total_questions)),
            average_correct_questions: round2(mean_i64(&self.correct_questions)),
            average_incorrect_questions: round2(mean_i64(&self.incorrect_questions)),
            average_skipped_questions: round2(mean_i64(&self.skipped_questions)),
            scores: self.scores,
            percentages: self.percentages,
        }
    }
}

/// Groups subjects by exact name over tests ordered by `test_date` ascending.
///
/// Output follows the order in which subject names are first seen.
pub fn aggregate_subjects(tests: &[TestRecord]) -> Vec<SubjectSummary> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(String, SubjectSeries)> = Vec::new();

    for subject in tests.iter().flat_map(|t| t.subjects.iter()) {
        let slot = *index.entry(subject.subject_name.as_str()).or_insert_with(|| {
            groups.push((subject.subject_name.clone(), SubjectSeries::default()));
            groups.len() - 1
        });
        groups[slot].1.push(subject);
    }

    groups
        .into_iter()
        .map(|(name, series)| series.summarize(name))
        .collect()
}

/// Distinct subject names across all tests, first seen first.
pub fn distinct_subjects(tests: &[TestRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    tests
        .iter()
        .flat_map(|t| t.subjects.iter())
        .filter(|s| seen.insert(s.subject_name.as_str()))
        .map(|s| s.subject_name.clone())
        .collect()
}
