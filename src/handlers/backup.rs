// src/handlers/backup.rs

use std::collections::HashSet;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
};
use serde_json::json;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        backup::RestoreRequest,
        test_record::{TestInput, TestRecord},
    },
    state::SharedStore,
};

/// Exports all tests and the current goal as one JSON document.
pub async fn export_data(State(store): State<SharedStore>) -> Result<impl IntoResponse, AppError> {
    let backup = store.export().await?;
    Ok(Json(backup))
}

/// Imports a previously exported document.
///
/// Every imported test passes the same validation as a new submission and
/// is rescored from its raw counts; derived fields in the document are
/// ignored. Nothing is written unless the whole document is accepted.
pub async fn import_data(
    State(store): State<SharedStore>,
    payload: Result<Json<RestoreRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;

    let tests = payload.tests.map(checked_tests).transpose()?;

    if let Some(goal) = &payload.goals {
        goal.validate()?;
    }

    let imported = tests.as_ref().map_or(0, Vec::len);
    store.restore(tests, payload.goals).await?;
    tracing::info!("Imported backup with {} tests", imported);

    Ok(Json(json!({
        "message": "Data imported successfully",
        "tests": imported
    })))
}

fn checked_tests(tests: Vec<TestRecord>) -> Result<Vec<TestRecord>, AppError> {
    let mut seen = HashSet::new();
    tests
        .into_iter()
        .map(|test| {
            TestInput::from(&test).validate()?;
            if !seen.insert(test.id) {
                return Err(AppError::BadRequest(format!(
                    "Duplicate test id {} in backup",
                    test.id
                )));
            }
            Ok(test.rescored()?)
        })
        .collect()
}

/// Deletes every test and the goal.
pub async fn clear_data(State(store): State<SharedStore>) -> Result<impl IntoResponse, AppError> {
    store.clear().await?;
    tracing::warn!("All data cleared");
    Ok(Json(json!({ "message": "All data cleared" })))
}
