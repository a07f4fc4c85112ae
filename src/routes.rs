// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{analytics, backup, goals, health, subjects, test_records},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (tests, analytics, subjects, goals, backup).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (store + config).
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    // Static analytics paths take precedence over the `{id}` capture.
    let test_routes = Router::new()
        .route("/", get(test_records::list_tests).post(test_records::create_test))
        .route("/analytics/summary", get(analytics::get_summary))
        .route("/analytics/subjects", get(analytics::get_subject_summaries))
        .route(
            "/{id}",
            get(test_records::get_test)
                .put(test_records::update_test)
                .delete(test_records::delete_test),
        );

    let goal_routes = Router::new()
        .route("/", get(goals::get_goal).post(goals::save_goal))
        .route("/progress", get(goals::get_progress));

    let backup_routes = Router::new().route(
        "/",
        get(backup::export_data)
            .post(backup::import_data)
            .delete(backup::clear_data),
    );

    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/subjects", get(subjects::list_subjects))
        .nest("/api/tests", test_routes)
        .nest("/api/goals", goal_routes)
        .nest("/api/backup", backup_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
