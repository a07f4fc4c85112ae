// src/models/goal.rs

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Target used when no goal has been saved yet.
pub const DEFAULT_OVERALL_TARGET: f64 = 800.0;

/// The single current goal. Stores keep at most one of these.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GoalRecord {
    #[validate(range(exclusive_min = 0.0))]
    pub overall_target_score: f64,
    #[serde(default)]
    #[validate(nested, custom(function = validate_unique_subjects))]
    pub subject_goals: Vec<SubjectGoal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for GoalRecord {
    fn default() -> Self {
        Self {
            overall_target_score: DEFAULT_OVERALL_TARGET,
            subject_goals: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubjectGoal {
    #[validate(length(min = 1, max = 100))]
    pub subject_name: String,
    #[validate(range(exclusive_min = 0.0))]
    pub target_score: f64,
}

/// DTO for saving the goal.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GoalInput {
    #[validate(range(exclusive_min = 0.0))]
    pub overall_target_score: f64,
    #[serde(default)]
    #[validate(nested, custom(function = validate_unique_subjects))]
    pub subject_goals: Vec<SubjectGoal>,
}

/// Subject goals are keyed by name; a name may appear only once.
fn validate_unique_subjects(goals: &[SubjectGoal]) -> Result<(), validator::ValidationError> {
    let mut seen = HashSet::new();
    for goal in goals {
        if !seen.insert(goal.subject_name.as_str()) {
            return Err(validator::ValidationError::new("duplicate_subject_goal"));
        }
    }
    Ok(())
}
