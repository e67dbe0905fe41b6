//! In-process registry of analysis job state.
//!
//! The store lives for the lifetime of the process and is never persisted:
//! every job is lost on restart. Each mutation takes the write lock for the
//! whole transition, so a reader sees a job either before or after a
//! transition and never in between.

use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;

use crate::models::job::{AnalysisResult, Job, JobId, JobState, JobStatus};

#[derive(Debug, Default)]
pub struct JobStore {
    jobs: RwLock<HashMap<JobId, Job>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new `queued` job.
    pub fn create(&self, id: JobId) -> Result<Job, JobStoreError> {
        let mut jobs = self.jobs.write();
        if jobs.contains_key(&id) {
            return Err(JobStoreError::Conflict(id));
        }
        let job = Job::queued(id.clone());
        jobs.insert(id, job.clone());
        Ok(job)
    }

    /// `queued -> processing`
    pub fn mark_processing(&self, id: &JobId) -> Result<Job, JobStoreError> {
        self.transition(id, JobStatus::Processing, |state| match state {
            JobState::Queued => Some(JobState::Processing),
            _ => None,
        })
    }

    /// `processing -> completed`, attaching the result.
    pub fn complete(&self, id: &JobId, result: AnalysisResult) -> Result<Job, JobStoreError> {
        self.transition(id, JobStatus::Completed, move |state| match state {
            JobState::Processing => Some(JobState::Completed(result)),
            _ => None,
        })
    }

    /// `queued | processing -> failed`, attaching the error message.
    pub fn fail(&self, id: &JobId, error: impl Into<String>) -> Result<Job, JobStoreError> {
        let error = error.into();
        self.transition(id, JobStatus::Failed, move |state| match state {
            JobState::Queued | JobState::Processing => Some(JobState::Failed(error)),
            _ => None,
        })
    }

    /// Current snapshot of a job.
    pub fn get(&self, id: &JobId) -> Result<Job, JobStoreError> {
        self.jobs
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| JobStoreError::NotFound(id.clone()))
    }

    pub fn len(&self) -> usize {
        self.jobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.read().is_empty()
    }

    fn transition<F>(&self, id: &JobId, to: JobStatus, next: F) -> Result<Job, JobStoreError>
    where
        F: FnOnce(&JobState) -> Option<JobState>,
    {
        let mut jobs = self.jobs.write();
        let job = jobs
            .get_mut(id)
            .ok_or_else(|| JobStoreError::NotFound(id.clone()))?;

        let from = job.status();
        let invalid = || JobStoreError::InvalidTransition {
            id: id.clone(),
            from,
            to,
        };
        if from.is_terminal() {
            return Err(invalid());
        }
        let state = next(&job.state).ok_or_else(invalid)?;

        job.state = state;
        job.updated_at = Utc::now();
        Ok(job.clone())
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum JobStoreError {
    #[error("job {0} already exists")]
    Conflict(JobId),

    #[error("job {0} not found")]
    NotFound(JobId),

    #[error("job {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: JobId,
        from: JobStatus,
        to: JobStatus,
    },
}
