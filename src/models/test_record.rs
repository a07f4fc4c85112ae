// src/models/test_record.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use uuid::Uuid;
use validator::Validate;

use crate::{
    analytics::scoring::{ScoreError, score_subjects, score_test},
    utils::time::deserialize_optional_date,
};

/// Represents the 'tests' table in the database.
/// One exam attempt with its derived marks frozen at write time.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRecord {
    pub id: Uuid,

    pub test_date: DateTime<Utc>,

    pub total_questions: i64,
    pub correct_questions: i64,
    pub incorrect_questions: i64,
    pub skipped_questions: i64,

    /// `total_questions * 4`.
    pub total_marks: i64,
    /// `correct * 4 - incorrect`. May be negative.
    pub marks_obtained: i64,
    pub percentage: f64,

    /// Per-subject breakdown, in the order the client submitted it.
    /// Stored as a JSON array in the database.
    pub subjects: Json<Vec<SubjectRecord>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One subject's slice of a test. Has no identity outside its test.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubjectRecord {
    pub subject_name: String,
    pub total_questions: i64,
    pub correct_questions: i64,
    pub incorrect_questions: i64,
    #[serde(default)]
    pub skipped_questions: i64,
    pub marks_obtained: i64,
    pub total_marks: i64,
    pub percentage: f64,
    /// Share of the owning test's questions, fixed when the test was scored.
    #[serde(default)]
    pub weightage: f64,
}

/// DTO for creating or replacing a test.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TestInput {
    /// Defaults to the time of the write when absent.
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub test_date: Option<DateTime<Utc>>,
    #[validate(range(min = 0, max = 1_000_000))]
    pub total_questions: i64,
    #[validate(range(min = 0, max = 1_000_000))]
    pub correct_questions: i64,
    #[validate(range(min = 0, max = 1_000_000))]
    pub incorrect_questions: i64,
    #[serde(default)]
    #[validate(range(min = 0, max = 1_000_000))]
    pub skipped_questions: i64,
    #[serde(default)]
    #[validate(nested)]
    pub subjects: Vec<SubjectInput>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubjectInput {
    #[validate(length(min = 1, max = 100))]
    pub subject_name: String,
    #[validate(range(min = 0, max = 1_000_000))]
    pub total_questions: i64,
    #[validate(range(min = 0, max = 1_000_000))]
    pub correct_questions: i64,
    #[validate(range(min = 0, max = 1_000_000))]
    pub incorrect_questions: i64,
    #[serde(default)]
    #[validate(range(min = 0, max = 1_000_000))]
    pub skipped_questions: i64,
}

/// Raw question counts for one scored entity (a test or a subject).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionCounts {
    pub total: i64,
    pub correct: i64,
    pub incorrect: i64,
    pub skipped: i64,
}

impl From<&TestInput> for QuestionCounts {
    fn from(input: &TestInput) -> Self {
        Self {
            total: input.total_questions,
            correct: input.correct_questions,
            incorrect: input.incorrect_questions,
            skipped: input.skipped_questions,
        }
    }
}

impl From<&SubjectInput> for QuestionCounts {
    fn from(input: &SubjectInput) -> Self {
        Self {
            total: input.total_questions,
            correct: input.correct_questions,
            incorrect: input.incorrect_questions,
            skipped: input.skipped_questions,
        }
    }
}

impl From<&SubjectRecord> for SubjectInput {
    fn from(record: &SubjectRecord) -> Self {
        Self {
            subject_name: record.subject_name.clone(),
            total_questions: record.total_questions,
            correct_questions: record.correct_questions,
            incorrect_questions: record.incorrect_questions,
            skipped_questions: record.skipped_questions,
        }
    }
}

/// The submission a stored record would have come from, used to run
/// imported records through the same validation as new ones.
impl From<&TestRecord> for TestInput {
    fn from(record: &TestRecord) -> Self {
        Self {
            test_date: Some(record.test_date),
            total_questions: record.total_questions,
            correct_questions: record.correct_questions,
            incorrect_questions: record.incorrect_questions,
            skipped_questions: record.skipped_questions,
            subjects: record.subjects.iter().map(SubjectInput::from).collect(),
        }
    }
}

impl TestRecord {
    /// Scores a new submission. The test date falls back to `now`.
    pub fn create(input: &TestInput, now: DateTime<Utc>) -> Result<Self, ScoreError> {
        let counts = QuestionCounts::from(input);
        let score = score_test(&counts)?;
        let subjects = score_subjects(&input.subjects, counts.total)?;

        Ok(Self {
            id: Uuid::new_v4(),
            test_date: input.test_date.unwrap_or(now),
            total_questions: counts.total,
            correct_questions: counts.correct,
            incorrect_questions: counts.incorrect,
            skipped_questions: counts.skipped,
            total_marks: score.total_marks,
            marks_obtained: score.marks_obtained,
            percentage: score.percentage,
            subjects: Json(subjects),
            created_at: now,
            updated_at: now,
        })
    }

    /// Rescores this test from a replacement submission, keeping its id and
    /// creation time. As on create, a missing date becomes `now`.
    pub fn revise(&self, input: &TestInput, now: DateTime<Utc>) -> Result<Self, ScoreError> {
        let revised = Self::create(input, now)?;
        Ok(Self {
            id: self.id,
            created_at: self.created_at,
            ..revised
        })
    }

    /// Recomputes every derived field from the stored raw counts.
    pub fn rescored(self) -> Result<Self, ScoreError> {
        let counts = QuestionCounts {
            total: self.total_questions,
            correct: self.correct_questions,
            incorrect: self.incorrect_questions,
            skipped: self.skipped_questions,
        };
        let score = score_test(&counts)?;
        let inputs: Vec<SubjectInput> = self.subjects.iter().map(SubjectInput::from).collect();
        let subjects = score_subjects(&inputs, counts.total)?;

        Ok(Self {
            total_marks: score.total_marks,
            marks_obtained: score.marks_obtained,
            percentage: score.percentage,
            subjects: Json(subjects),
            ..self
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn input(json: serde_json::Value) -> TestInput {
        serde_json::from_value(json).unwrap()
    }

    fn sample() -> TestInput {
        input(serde_json::json!({
            "testDate": "2024-02-10",
            "totalQuestions": 200,
            "correctQuestions": 150,
            "incorrectQuestions": 30,
            "skippedQuestions": 20,
            "subjects": [
                { "subjectName": "Physics", "totalQuestions": 100, "correctQuestions": 80,
                  "incorrectQuestions": 10, "skippedQuestions": 10 },
                { "subjectName": "Chemistry", "totalQuestions": 100, "correctQuestions": 70,
                  "incorrectQuestions": 30 }
            ]
        }))
    }

    #[test]
    fn create_derives_marks() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let record = TestRecord::create(&sample(), now).unwrap();

        assert_eq!(record.total_marks, 800);
        assert_eq!(record.marks_obtained, 570);
        assert_eq!(record.percentage, 71.25);
        assert_eq!(record.test_date, Utc.with_ymd_and_hms(2024, 2, 10, 0, 0, 0).unwrap());
        assert_eq!(record.subjects[0].marks_obtained, 310);
        assert_eq!(record.subjects[0].weightage, 50.0);
        // Omitted skipped count defaults to zero.
        assert_eq!(record.subjects[1].skipped_questions, 0);
        assert_eq!(record.subjects[1].marks_obtained, 250);
    }

    #[test]
    fn create_defaults_date_to_now() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let mut submission = sample();
        submission.test_date = None;
        let record = TestRecord::create(&submission, now).unwrap();
        assert_eq!(record.test_date, now);
    }

    #[test]
    fn revise_keeps_identity() {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 3, 2, 12, 0, 0).unwrap();
        let original = TestRecord::create(&sample(), created).unwrap();

        let mut submission = sample();
        submission.correct_questions = 160;
        submission.incorrect_questions = 20;
        let revised = original.revise(&submission, later).unwrap();

        assert_eq!(revised.id, original.id);
        assert_eq!(revised.created_at, created);
        assert_eq!(revised.updated_at, later);
        assert_eq!(revised.marks_obtained, 620);
    }

    #[test]
    fn rescored_repairs_derived_fields() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let mut record = TestRecord::create(&sample(), now).unwrap();
        record.marks_obtained = 9999;
        record.subjects.0[0].weightage = 0.0;

        let repaired = record.rescored().unwrap();
        assert_eq!(repaired.marks_obtained, 570);
        assert_eq!(repaired.subjects[0].weightage, 50.0);
    }

    #[test]
    fn stored_record_validates_like_a_submission() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let mut record = TestRecord::create(&sample(), now).unwrap();
        assert!(TestInput::from(&record).validate().is_ok());

        record.subjects.0[1].subject_name = String::new();
        assert!(TestInput::from(&record).validate().is_err());

        record.subjects.0[1].subject_name = "Chemistry".to_string();
        record.correct_questions = -5;
        record.skipped_questions = 75;
        assert!(TestInput::from(&record).validate().is_err());
    }

    #[test]
    fn zero_question_subject_is_rejected() {
        let submission = input(serde_json::json!({
            "totalQuestions": 10,
            "correctQuestions": 10,
            "incorrectQuestions": 0,
            "subjects": [
                { "subjectName": "Physics", "totalQuestions": 0, "correctQuestions": 0,
                  "incorrectQuestions": 0 }
            ]
        }));
        let err = TestRecord::create(&submission, Utc::now()).unwrap_err();
        assert!(matches!(err, ScoreError::NoQuestions { .. }));
    }
}
