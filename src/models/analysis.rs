use garde::Validate;
use serde::Serialize;

use crate::models::document::DocumentKind;
use crate::models::job::{AnalysisResult, Job, JobId, JobStatus};

/// Metadata portion of a resume upload.
#[derive(Debug, Validate)]
pub struct UploadForm {
    #[garde(length(min = 1, max = 255), custom(recognised_document))]
    pub filename: String,

    #[garde(length(chars, min = 1))]
    pub job_description: String,
}

fn recognised_document(filename: &str, _ctx: &()) -> garde::Result {
    match DocumentKind::from_filename(filename) {
        Some(_) => Ok(()),
        None => Err(garde::Error::new("only .pdf and .txt documents are supported")),
    }
}

/// Response after submitting a resume for analysis.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub status: JobStatus,
    pub message: String,
    pub job_id: JobId,
    pub filename: String,
    pub storage_url: String,
}

/// Response for querying job status.
#[derive(Debug, Serialize)]
pub struct JobStatusResponse {
    pub job_id: JobId,
    pub status: JobStatus,
    /// Coarse indicator only: 100 once completed, 50 otherwise.
    pub progress: u8,
    pub result: Option<AnalysisResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Job> for JobStatusResponse {
    fn from(job: Job) -> Self {
        let status = job.status();
        let progress = if status == JobStatus::Completed { 100 } else { 50 };
        Self {
            status,
            progress,
            result: job.result().cloned(),
            error: job.error().map(str::to_string),
            job_id: job.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::JobState;

    fn form(filename: &str, job_description: &str) -> UploadForm {
        UploadForm {
            filename: filename.to_string(),
            job_description: job_description.to_string(),
        }
    }

    #[test]
    fn test_valid_form() {
        assert!(form("resume.pdf", "Seeking Go backend engineer").validate().is_ok());
    }

    #[test]
    fn test_wrong_extension_rejected() {
        let err = form("resume.docx", "Seeking Go backend engineer")
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("only .pdf and .txt"));
    }

    #[test]
    fn test_empty_description_rejected() {
        assert!(form("resume.pdf", "").validate().is_err());
    }

    #[test]
    fn test_long_description_accepted() {
        let description = "Distributed systems, Go, Kafka. ".repeat(2_000);
        assert!(form("resume.txt", &description).validate().is_ok());
    }

    #[test]
    fn test_progress_is_coarse() {
        let mut job = Job::queued(JobId::from("resume-1"));
        assert_eq!(JobStatusResponse::from(job.clone()).progress, 50);

        job.state = JobState::Processing;
        assert_eq!(JobStatusResponse::from(job.clone()).progress, 50);

        job.state = JobState::Completed(AnalysisResult {
            score: 91.2,
            reasoning: "Good fit.".to_string(),
        });
        let response = JobStatusResponse::from(job);
        assert_eq!(response.progress, 100);
        assert_eq!(response.result.unwrap().score, 91.2);
    }

    #[test]
    fn test_failed_job_serializes_error() {
        let mut job = Job::queued(JobId::from("resume-1"));
        job.state = JobState::Failed("Failed to calculate similarity".to_string());
        let json = serde_json::to_value(JobStatusResponse::from(job)).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["progress"], 50);
        assert!(json["result"].is_null());
        assert_eq!(json["error"], "Failed to calculate similarity");
    }
}
