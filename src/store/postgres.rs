// src/store/postgres.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction, prelude::FromRow, types::Json};
use uuid::Uuid;

use super::{StoreError, TestStore};
use crate::models::{
    goal::{GoalRecord, SubjectGoal},
    test_record::TestRecord,
};

/// Key of the one row in the 'goals' table.
const GOAL_KEY: i16 = 1;

const TEST_COLUMNS: &str = r#"
    id, test_date,
    total_questions, correct_questions, incorrect_questions, skipped_questions,
    total_marks, marks_obtained, percentage,
    subjects, created_at, updated_at
"#;

/// Represents the 'goals' table in the database.
#[derive(Debug, FromRow)]
struct GoalRow {
    overall_target_score: f64,
    subject_goals: Json<Vec<SubjectGoal>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<GoalRow> for GoalRecord {
    fn from(row: GoalRow) -> Self {
        GoalRecord {
            overall_target_score: row.overall_target_score,
            subject_goals: row.subject_goals.0,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        }
    }
}

/// Server-side store backed by Postgres.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_in(tx: &mut Transaction<'_, Postgres>, test: &TestRecord) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO tests (
                id, test_date,
                total_questions, correct_questions, incorrect_questions, skipped_questions,
                total_marks, marks_obtained, percentage,
                subjects, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(test.id)
        .bind(test.test_date)
        .bind(test.total_questions)
        .bind(test.correct_questions)
        .bind(test.incorrect_questions)
        .bind(test.skipped_questions)
        .bind(test.total_marks)
        .bind(test.marks_obtained)
        .bind(test.percentage)
        .bind(&test.subjects)
        .bind(test.created_at)
        .bind(test.updated_at)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    async fn upsert_goal_in(
        tx: &mut Transaction<'_, Postgres>,
        goal: &GoalRecord,
    ) -> Result<GoalRecord, sqlx::Error> {
        let row = sqlx::query_as::<_, GoalRow>(
            r#"
            INSERT INTO goals (id, overall_target_score, subject_goals)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET
                overall_target_score = EXCLUDED.overall_target_score,
                subject_goals = EXCLUDED.subject_goals,
                updated_at = NOW()
            RETURNING overall_target_score, subject_goals, created_at, updated_at
            "#,
        )
        .bind(GOAL_KEY)
        .bind(goal.overall_target_score)
        .bind(Json(&goal.subject_goals))
        .fetch_one(&mut **tx)
        .await?;
        Ok(row.into())
    }
}

#[async_trait]
impl TestStore for PgStore {
    async fn list_tests(&self) -> Result<Vec<TestRecord>, StoreError> {
        let tests = sqlx::query_as::<_, TestRecord>(&format!(
            "SELECT {TEST_COLUMNS} FROM tests ORDER BY test_date ASC, created_at ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch tests: {:?}", e);
            e
        })?;
        Ok(tests)
    }

    async fn get_test(&self, id: Uuid) -> Result<Option<TestRecord>, StoreError> {
        let test = sqlx::query_as::<_, TestRecord>(&format!(
            "SELECT {TEST_COLUMNS} FROM tests WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(test)
    }

    async fn insert_test(&self, test: TestRecord) -> Result<TestRecord, StoreError> {
        let mut tx = self.pool.begin().await?;
        Self::insert_in(&mut tx, &test).await.map_err(|e| {
            tracing::error!("Failed to insert test {}: {:?}", test.id, e);
            e
        })?;
        tx.commit().await?;
        Ok(test)
    }

    async fn replace_test(&self, test: TestRecord) -> Result<Option<TestRecord>, StoreError> {
        let updated = sqlx::query_as::<_, TestRecord>(&format!(
            r#"
            UPDATE tests SET
                test_date = $2,
                total_questions = $3,
                correct_questions = $4,
                incorrect_questions = $5,
                skipped_questions = $6,
                total_marks = $7,
                marks_obtained = $8,
                percentage = $9,
                subjects = $10,
                updated_at = $11
            WHERE id = $1
            RETURNING {TEST_COLUMNS}
            "#
        ))
        .bind(test.id)
        .bind(test.test_date)
        .bind(test.total_questions)
        .bind(test.correct_questions)
        .bind(test.incorrect_questions)
        .bind(test.skipped_questions)
        .bind(test.total_marks)
        .bind(test.marks_obtained)
        .bind(test.percentage)
        .bind(&test.subjects)
        .bind(test.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update test {}: {:?}", test.id, e);
            e
        })?;
        Ok(updated)
    }

    async fn delete_test(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM tests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_goal(&self) -> Result<Option<GoalRecord>, StoreError> {
        let row = sqlx::query_as::<_, GoalRow>(
            "SELECT overall_target_score, subject_goals, created_at, updated_at FROM goals WHERE id = $1",
        )
        .bind(GOAL_KEY)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(GoalRecord::from))
    }

    async fn put_goal(&self, goal: GoalRecord) -> Result<GoalRecord, StoreError> {
        let mut tx = self.pool.begin().await?;
        let saved = Self::upsert_goal_in(&mut tx, &goal).await?;
        tx.commit().await?;
        Ok(saved)
    }

    async fn restore(
        &self,
        tests: Option<Vec<TestRecord>>,
        goal: Option<GoalRecord>,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        if let Some(tests) = tests {
            sqlx::query("DELETE FROM tests").execute(&mut *tx).await?;
            for test in &tests {
                Self::insert_in(&mut tx, test).await?;
            }
            tracing::info!("Restored {} tests", tests.len());
        }
        if let Some(goal) = goal {
            Self::upsert_goal_in(&mut tx, &goal).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM tests").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM goals").execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(())
    }
}
