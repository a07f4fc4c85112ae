// src/models/backup.rs

use serde::{Deserialize, Serialize};

use super::{goal::GoalRecord, test_record::TestRecord};

/// Full export of the user's data. Also the on-disk format of the local
/// snapshot store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Backup {
    #[serde(default)]
    pub tests: Vec<TestRecord>,
    #[serde(default)]
    pub goals: Option<GoalRecord>,
}

/// DTO for importing a backup. Missing parts are kept as they are.
#[derive(Debug, Deserialize)]
pub struct RestoreRequest {
    pub tests: Option<Vec<TestRecord>>,
    pub goals: Option<GoalRecord>,
}
