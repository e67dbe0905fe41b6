use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::services::job_store::JobStoreError;
use crate::services::storage::StorageError;

/// Errors surfaced synchronously to HTTP callers.
///
/// Pipeline failures never appear here; they are recorded on the job and
/// observed by polling its status.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Malformed or oversized multipart body; keeps the status axum assigned.
    #[error("Upload rejected: {0}")]
    Upload(#[from] MultipartError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<JobStoreError> for AppError {
    fn from(err: JobStoreError) -> Self {
        match err {
            JobStoreError::NotFound(_) => AppError::NotFound("Job not found".to_string()),
            JobStoreError::Conflict(_) => AppError::Conflict(err.to_string()),
            JobStoreError::InvalidTransition { .. } => AppError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Upload(e) => {
                let status = e.status();
                let code = if status == StatusCode::PAYLOAD_TOO_LARGE {
                    "PAYLOAD_TOO_LARGE"
                } else {
                    "VALIDATION_ERROR"
                };
                (status, code, e.body_text())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Storage(e) => {
                tracing::error!("Storage error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "Failed to store the uploaded document".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::JobId;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (AppError::NotFound("gone".into()), StatusCode::NOT_FOUND),
            (AppError::Conflict("dup".into()), StatusCode::CONFLICT),
            (AppError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_store_errors_mapped() {
        let err: AppError = JobStoreError::NotFound(JobId::from("nonexistent-job")).into();
        assert!(matches!(err, AppError::NotFound(_)));

        let err: AppError = JobStoreError::Conflict(JobId::from("resume-1")).into();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
