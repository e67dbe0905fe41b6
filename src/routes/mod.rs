use axum::{
    routing::{get, post},
    Router,
};

use crate::app_state::AppState;

pub mod analyze;
pub mod metrics;

/// Upload and polling routes.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/upload", post(analyze::upload_resume))
        .route("/job-status/{job_id}", get(analyze::get_job_status))
        .with_state(state)
}
