// src/handlers/analytics.rs

use axum::{Json, extract::State, response::IntoResponse};

use crate::{
    analytics::{aggregate_subjects, aggregate_tests},
    error::AppError,
    state::SharedStore,
};

/// Headline statistics across all tests.
pub async fn get_summary(State(store): State<SharedStore>) -> Result<impl IntoResponse, AppError> {
    let tests = store.list_tests().await?;
    Ok(Json(aggregate_tests(&tests)))
}

/// Per-subject statistics across all tests.
pub async fn get_subject_summaries(
    State(store): State<SharedStore>,
) -> Result<impl IntoResponse, AppError> {
    let tests = store.list_tests().await?;
    Ok(Json(aggregate_subjects(&tests)))
}
