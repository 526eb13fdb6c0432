pub mod health;
pub mod jobs;
pub mod metrics;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;

use crate::app_state::AppState;
use crate::services::validation::MAX_LOGO_BYTES;

/// Largest request body accepted: a maximum-size logo plus the text fields.
pub const MAX_REQUEST_BYTES: usize = MAX_LOGO_BYTES + 1024 * 1024;

/// Health and job routes with their shared state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/jobs", get(jobs::list_jobs).post(jobs::create_job))
        .route("/api/jobs/{id}", get(jobs::get_job))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES))
        .with_state(state)
}
