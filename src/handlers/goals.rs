// src/handlers/goals.rs

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    analytics::goal_progress,
    error::AppError,
    models::goal::{GoalInput, GoalRecord},
    state::SharedStore,
};

/// Returns the current goal, or the default one if none was saved.
pub async fn get_goal(State(store): State<SharedStore>) -> Result<impl IntoResponse, AppError> {
    let goal = store.get_goal().await?.unwrap_or_default();
    Ok(Json(goal))
}

/// Creates or replaces the current goal.
pub async fn save_goal(
    State(store): State<SharedStore>,
    payload: Result<Json<GoalInput>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let now = chrono::Utc::now();
    let created_at = store
        .get_goal()
        .await?
        .and_then(|g| g.created_at)
        .unwrap_or(now);

    let goal = store
        .put_goal(GoalRecord {
            overall_target_score: payload.overall_target_score,
            subject_goals: payload.subject_goals,
            created_at: Some(created_at),
            updated_at: Some(now),
        })
        .await?;

    Ok(Json(goal))
}

/// Progress of the latest test towards the current goal.
pub async fn get_progress(State(store): State<SharedStore>) -> Result<impl IntoResponse, AppError> {
    let goal = store.get_goal().await?.unwrap_or_default();
    let tests = store.list_tests().await?;
    Ok(Json(goal_progress(&goal, &tests)))
}
