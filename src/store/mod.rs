// src/store/mod.rs

//! Persistence backends. Both hand the analytics engine the same ordered
//! snapshot; neither computes anything on its own.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{backup::Backup, goal::GoalRecord, test_record::TestRecord};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot is not valid JSON: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// Storage for test records and the single current goal.
#[async_trait]
pub trait TestStore: Send + Sync {
    /// Every test, ordered by `test_date` ascending. Tests sharing a date
    /// keep the order they were created in.
    async fn list_tests(&self) -> Result<Vec<TestRecord>, StoreError>;

    async fn get_test(&self, id: Uuid) -> Result<Option<TestRecord>, StoreError>;

    async fn insert_test(&self, test: TestRecord) -> Result<TestRecord, StoreError>;

    /// Replaces the stored test with the same id. `None` if there is none.
    async fn replace_test(&self, test: TestRecord) -> Result<Option<TestRecord>, StoreError>;

    /// Returns whether a test was removed.
    async fn delete_test(&self, id: Uuid) -> Result<bool, StoreError>;

    /// The current goal, if one was ever saved.
    async fn get_goal(&self) -> Result<Option<GoalRecord>, StoreError>;

    /// Saves `goal` as the one current goal, replacing any previous one.
    async fn put_goal(&self, goal: GoalRecord) -> Result<GoalRecord, StoreError>;

    /// Restores a backup. Parts that are `None` are left untouched.
    async fn restore(
        &self,
        tests: Option<Vec<TestRecord>>,
        goal: Option<GoalRecord>,
    ) -> Result<(), StoreError>;

    /// Removes every test and the goal.
    async fn clear(&self) -> Result<(), StoreError>;

    async fn export(&self) -> Result<Backup, StoreError> {
        Ok(Backup {
            tests: self.list_tests().await?,
            goals: self.get_goal().await?,
        })
    }
}
