// src/handlers/test_records.rs

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    models::test_record::{TestInput, TestRecord},
    state::SharedStore,
};

/// Lists every test, newest first.
pub async fn list_tests(State(store): State<SharedStore>) -> Result<impl IntoResponse, AppError> {
    let mut tests = store.list_tests().await?;
    tests.reverse();
    Ok(Json(tests))
}

/// Retrieves a single test by ID.
pub async fn get_test(
    State(store): State<SharedStore>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let test = store
        .get_test(id)
        .await?
        .ok_or(AppError::NotFound("Test not found".to_string()))?;

    Ok(Json(test))
}

/// Records a new test.
///
/// * Validates the raw counts (non-negative, consistent, at least one question).
/// * Derives marks, percentage and subject weightage once, here.
/// * Returns 201 Created with the stored record.
pub async fn create_test(
    State(store): State<SharedStore>,
    payload: Result<Json<TestInput>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let record = TestRecord::create(&payload, Utc::now())?;
    let saved = store.insert_test(record).await?;

    tracing::info!(
        "Recorded test {} ({} / {} marks)",
        saved.id,
        saved.marks_obtained,
        saved.total_marks
    );

    Ok((StatusCode::CREATED, Json(saved)))
}

/// Replaces a test's counts and rescores it.
pub async fn update_test(
    State(store): State<SharedStore>,
    Path(id): Path<Uuid>,
    payload: Result<Json<TestInput>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let existing = store
        .get_test(id)
        .await?
        .ok_or(AppError::NotFound("Test not found".to_string()))?;

    let revised = existing.revise(&payload, Utc::now())?;
    let saved = store
        .replace_test(revised)
        .await?
        .ok_or(AppError::NotFound("Test not found".to_string()))?;

    Ok(Json(saved))
}

/// Deletes a test by ID.
pub async fn delete_test(
    State(store): State<SharedStore>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    if !store.delete_test(id).await? {
        return Err(AppError::NotFound("Test not found".to_string()));
    }

    tracing::info!("Deleted test {}", id);
    Ok(Json(json!({ "message": "Test deleted successfully" })))
}
