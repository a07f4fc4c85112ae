// src/analytics/scoring.rs

use crate::models::test_record::{QuestionCounts, SubjectInput, SubjectRecord};

/// Marks awarded per correct answer.
pub const MARKS_PER_CORRECT: i64 = 4;
/// Marks deducted per incorrect answer.
pub const MARKS_PER_INCORRECT: i64 = 1;
/// Upper bound on any single question count accepted at ingestion.
pub const MAX_QUESTIONS: i64 = 1_000_000;

/// Raised at ingestion, before any derived field is stored.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoreError {
    #[error("{entity} must have at least one question")]
    NoQuestions { entity: String },

    #[error(
        "{entity}: correct ({correct}) + incorrect ({incorrect}) + skipped ({skipped}) must equal total questions ({total})"
    )]
    CountMismatch {
        entity: String,
        total: i64,
        correct: i64,
        incorrect: i64,
        skipped: i64,
    },

    #[error("{entity}: question counts must be between 0 and {max}")]
    CountOutOfRange { entity: String, max: i64 },
}

/// Derived marks of a whole test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestScore {
    pub total_marks: i64,
    pub marks_obtained: i64,
    pub percentage: f64,
}

/// Derived marks of one subject, plus its share of the test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubjectScore {
    pub total_marks: i64,
    pub marks_obtained: i64,
    pub percentage: f64,
    pub weightage: f64,
}

/// `correct * 4 - incorrect`. Negative results are valid.
pub fn compute_marks(correct: i64, incorrect: i64) -> i64 {
    correct * MARKS_PER_CORRECT - incorrect * MARKS_PER_INCORRECT
}

/// Plain float division; a zero `total_marks` yields NaN or infinity.
pub fn compute_percentage(marks_obtained: i64, total_marks: i64) -> f64 {
    marks_obtained as f64 / total_marks as f64 * 100.0
}

/// Plain float division; a zero `test_total_questions` yields NaN or infinity.
pub fn compute_weightage(subject_total_questions: i64, test_total_questions: i64) -> f64 {
    subject_total_questions as f64 / test_total_questions as f64 * 100.0
}

fn check_counts(entity: &str, counts: &QuestionCounts) -> Result<(), ScoreError> {
    let in_range = |n: i64| (0..=MAX_QUESTIONS).contains(&n);
    if ![counts.total, counts.correct, counts.incorrect, counts.skipped]
        .into_iter()
        .all(in_range)
    {
        return Err(ScoreError::CountOutOfRange {
            entity: entity.to_string(),
            max: MAX_QUESTIONS,
        });
    }
    if counts.total == 0 {
        return Err(ScoreError::NoQuestions {
            entity: entity.to_string(),
        });
    }
    let answered = counts
        .correct
        .checked_add(counts.incorrect)
        .and_then(|n| n.checked_add(counts.skipped));
    if answered != Some(counts.total) {
        return Err(ScoreError::CountMismatch {
            entity: entity.to_string(),
            total: counts.total,
            correct: counts.correct,
            incorrect: counts.incorrect,
            skipped: counts.skipped,
        });
    }
    Ok(())
}

/// Scores a whole test from its raw counts.
///
/// Counts are bounded by [`MAX_QUESTIONS`] before any arithmetic, so the
/// derived marks always fit.
pub fn score_test(counts: &QuestionCounts) -> Result<TestScore, ScoreError> {
    check_counts("test", counts)?;

    let total_marks = counts.total * MARKS_PER_CORRECT;
    let marks_obtained = compute_marks(counts.correct, counts.incorrect);

    Ok(TestScore {
        total_marks,
        marks_obtained,
        percentage: compute_percentage(marks_obtained, total_marks),
    })
}

/// Scores one subject. Weightage is relative to `test_total_questions`.
pub fn score_subject(
    subject_name: &str,
    counts: &QuestionCounts,
    test_total_questions: i64,
) -> Result<SubjectScore, ScoreError> {
    check_counts(subject_name, counts)?;
    if test_total_questions == 0 {
        return Err(ScoreError::NoQuestions {
            entity: "test".to_string(),
        });
    }

    let total_marks = counts.total * MARKS_PER_CORRECT;
    let marks_obtained = compute_marks(counts.correct, counts.incorrect);

    Ok(SubjectScore {
        total_marks,
        marks_obtained,
        percentage: compute_percentage(marks_obtained, total_marks),
        weightage: compute_weightage(counts.total, test_total_questions),
    })
}

/// Scores every subject of a submission, keeping the submitted order.
pub fn score_subjects(
    subjects: &[SubjectInput],
    test_total_questions: i64,
) -> Result<Vec<SubjectRecord>, ScoreError> {
    subjects
        .iter()
        .map(|input| {
            let counts = QuestionCounts::from(input);
            let score = score_subject(&input.subject_name, &counts, test_total_questions)?;
            Ok(SubjectRecord {
                subject_name: input.subject_name.clone(),
                total_questions: counts.total,
                correct_questions: counts.correct,
                incorrect_questions: counts.incorrect,
                skipped_questions: counts.skipped,
                marks_obtained: score.marks_obtained,
                total_marks: score.total_marks,
                percentage: score.percentage,
                weightage: score.weightage,
            })
        })
        .collect()
}
