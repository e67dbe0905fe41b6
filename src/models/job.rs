use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::models::document::ResumeDocument;

/// Opaque identifier of an analysis job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Job id derived from the upload's storage uuid.
    pub fn for_upload(upload_id: Uuid) -> Self {
        Self(format!("resume-{upload_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for JobId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for JobId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status of a resume analysis job.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// Outcome of a successful analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Mean chunk similarity, two decimals. Not clamped at zero.
    pub score: f64,
    pub reasoning: String,
}

/// Lifecycle state. The result and error only exist on their terminal variants.
#[derive(Debug, Clone, PartialEq)]
pub enum JobState {
    Queued,
    Processing,
    Completed(AnalysisResult),
    Failed(String),
}

impl JobState {
    pub fn status(&self) -> JobStatus {
        match self {
            JobState::Queued => JobStatus::Queued,
            JobState::Processing => JobStatus::Processing,
            JobState::Completed(_) => JobStatus::Completed,
            JobState::Failed(_) => JobStatus::Failed,
        }
    }
}

/// Snapshot of a job as held by the job store.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: JobId,
    pub state: JobState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn queued(id: JobId) -> Self {
        let now = Utc::now();
        Self {
            id,
            state: JobState::Queued,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn status(&self) -> JobStatus {
        self.state.status()
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.state {
            JobState::Completed(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            JobState::Failed(error) => Some(error),
            _ => None,
        }
    }
}

/// Input handed to the pipeline for one job. Never mutated after submission.
#[derive(Debug, Clone)]
pub struct JobPayload {
    pub document: ResumeDocument,
    pub job_description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_strings() {
        assert_eq!(JobStatus::Queued.to_string(), "queued");
        assert_eq!(JobStatus::Processing.to_string(), "processing");
        assert_eq!("completed".parse::<JobStatus>().unwrap(), JobStatus::Completed);
        assert_eq!(serde_json::to_string(&JobStatus::Failed).unwrap(), "\"failed\"");
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }

    #[test]
    fn test_result_only_on_completed() {
        let mut job = Job::queued(JobId::from("resume-1"));
        assert!(job.result().is_none());
        assert!(job.error().is_none());

        job.state = JobState::Failed("boom".to_string());
        assert_eq!(job.error(), Some("boom"));
        assert!(job.result().is_none());
    }

    #[test]
    fn test_upload_job_id_prefix() {
        let id = Uuid::new_v4();
        assert_eq!(JobId::for_upload(id).as_str(), format!("resume-{id}"));
    }
}
