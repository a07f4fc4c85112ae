// src/store/memory.rs

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{StoreError, TestStore};
use crate::{
    analytics::sort_by_date,
    models::{backup::Backup, goal::GoalRecord, test_record::TestRecord},
};

/// Single-user store kept in memory.
///
/// With a snapshot path every write is flushed to a JSON file, which is
/// re-read on startup. Without one the data lives as long as the process.
pub struct MemoryStore {
    data: RwLock<Backup>,
    snapshot: Option<PathBuf>,
}

impl MemoryStore {
    /// A store with no backing file.
    pub fn new() -> Self {
        Self {
            data: RwLock::new(Backup::default()),
            snapshot: None,
        }
    }

    /// Opens (or starts) a store persisted at `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let data = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let backup: Backup = serde_json::from_slice(&bytes)?;
                tracing::info!(
                    "Loaded {} tests from snapshot {}",
                    backup.tests.len(),
                    path.display()
                );
                backup
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No snapshot at {}, starting empty", path.display());
                Backup::default()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            data: RwLock::new(data),
            snapshot: Some(path),
        })
    }

    /// Writes the whole data set next to the snapshot, then swaps it in.
    async fn flush(&self, data: &Backup) -> Result<(), StoreError> {
        let Some(path) = &self.snapshot else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(data)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, path).await?;

        tracing::debug!("Snapshot written to {}", path.display());
        Ok(())
    }

    /// Persists `next` and only then makes it visible. On a failed flush the
    /// held data is left as it was.
    async fn commit(&self, data: &mut Backup, next: Backup) -> Result<(), StoreError> {
        self.flush(&next).await?;
        *data = next;
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TestStore for MemoryStore {
    async fn list_tests(&self) -> Result<Vec<TestRecord>, StoreError> {
        let mut tests = self.data.read().await.tests.clone();
        sort_by_date(&mut tests);
        Ok(tests)
    }

    async fn get_test(&self, id: Uuid) -> Result<Option<TestRecord>, StoreError> {
        let data = self.data.read().await;
        Ok(data.tests.iter().find(|t| t.id == id).cloned())
    }

    async fn insert_test(&self, test: TestRecord) -> Result<TestRecord, StoreError> {
        let mut data = self.data.write().await;
        let mut next = data.clone();
        next.tests.push(test.clone());
        self.commit(&mut data, next).await?;
        Ok(test)
    }

    async fn replace_test(&self, test: TestRecord) -> Result<Option<TestRecord>, StoreError> {
        let mut data = self.data.write().await;
        let mut next = data.clone();
        let Some(slot) = next.tests.iter_mut().find(|t| t.id == test.id) else {
            return Ok(None);
        };
        *slot = test.clone();
        self.commit(&mut data, next).await?;
        Ok(Some(test))
    }

    async fn delete_test(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut data = self.data.write().await;
        if !data.tests.iter().any(|t| t.id == id) {
            return Ok(false);
        }
        let mut next = data.clone();
        next.tests.retain(|t| t.id != id);
        self.commit(&mut data, next).await?;
        Ok(true)
    }

    async fn get_goal(&self) -> Result<Option<GoalRecord>, StoreError> {
        Ok(self.data.read().await.goals.clone())
    }

    async fn put_goal(&self, goal: GoalRecord) -> Result<GoalRecord, StoreError> {
        let mut data = self.data.write().await;
        let next = Backup {
            tests: data.tests.clone(),
            goals: Some(goal.clone()),
        };
        self.commit(&mut data, next).await?;
        Ok(goal)
    }

    async fn restore(
        &self,
        tests: Option<Vec<TestRecord>>,
        goal: Option<GoalRecord>,
    ) -> Result<(), StoreError> {
        let mut data = self.data.write().await;
        let next = Backup {
            tests: tests.unwrap_or_else(|| data.tests.clone()),
            goals: goal.or_else(|| data.goals.clone()),
        };
        self.commit(&mut data, next).await
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let mut data = self.data.write().await;
        self.commit(&mut data, Backup::default()).await
    }
}
