use axum::extract::{Multipart, Path, State};
use axum::Json;
use bytes::Bytes;
use garde::Validate;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::error::AppError;
use crate::models::analysis::{JobStatusResponse, UploadForm, UploadResponse};
use crate::models::document::ResumeDocument;
use crate::models::job::{JobId, JobPayload};

/// POST /upload: upload a resume for analysis against a job description.
///
/// Validation and storage failures abort before any job exists. Analysis
/// runs detached; its outcome is only visible through the status endpoint.
pub async fn upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut file: Option<(String, Bytes)> = None;
    let mut job_description: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let filename = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| AppError::Validation("file field has no filename".into()))?;
                let data = field.bytes().await?;
                file = Some((filename, data));
            }
            Some("job_description") => {
                let text = field.text().await?;
                job_description = Some(text).filter(|t| !t.trim().is_empty());
            }
            _ => {}
        }
    }

    let (filename, data) =
        file.ok_or_else(|| AppError::Validation("missing file field".into()))?;
    let form = UploadForm {
        filename,
        job_description: job_description
            .unwrap_or_else(|| state.default_job_description.to_string()),
    };
    form.validate()
        .map_err(|report| AppError::Validation(report.to_string()))?;

    let document = ResumeDocument::new(form.filename, data)
        .ok_or_else(|| AppError::Validation("unsupported document type".into()))?;

    let upload_id = Uuid::new_v4();
    let key = format!("{upload_id}{}", document.kind().extension());
    let path = state.storage.upload(&key, document.bytes()).await?;

    let job_id = JobId::for_upload(upload_id);
    let job = state.jobs.create(job_id.clone())?;
    metrics::counter!("resume_analysis_jobs_total").increment(1);

    tracing::info!(
        job_id = %job_id,
        filename = %document.filename(),
        size_bytes = document.bytes().len(),
        "Resume uploaded, analysis scheduled"
    );

    let filename = document.filename().to_string();
    state.pipeline.spawn(
        job_id.clone(),
        JobPayload {
            document,
            job_description: form.job_description,
        },
    );

    Ok(Json(UploadResponse {
        status: job.status(),
        message: "Resume uploaded and processing started".to_string(),
        job_id,
        filename,
        storage_url: path.display().to_string(),
    }))
}

/// GET /job-status/{job_id}: poll an analysis job.
pub async fn get_job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<JobStatusResponse>, AppError> {
    let job = state.jobs.get(&JobId::from(job_id))?;
    Ok(Json(job.into()))
}
