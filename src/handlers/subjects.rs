// src/handlers/subjects.rs

use axum::{Json, extract::State, response::IntoResponse};

use crate::{analytics::distinct_subjects, error::AppError, state::SharedStore};

/// Lists every subject name that appears in any test.
pub async fn list_subjects(State(store): State<SharedStore>) -> Result<impl IntoResponse, AppError> {
    let tests = store.list_tests().await?;
    Ok(Json(distinct_subjects(&tests)))
}
