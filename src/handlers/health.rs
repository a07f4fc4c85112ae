// src/handlers/health.rs

use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;

use crate::config::Config;

/// Liveness probe. Reports which storage backend is active.
pub async fn health(State(config): State<Config>) -> impl IntoResponse {
    let storage = if config.database_url.is_some() {
        "postgres"
    } else {
        "local"
    };
    Json(json!({ "status": "ok", "storage": storage }))
}
