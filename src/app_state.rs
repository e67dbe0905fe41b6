use std::sync::Arc;

use crate::services::{job_store::JobStore, pipeline::AnalysisPipeline, storage::UploadStorage};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub jobs: Arc<JobStore>,
    pub storage: Arc<UploadStorage>,
    pub pipeline: Arc<AnalysisPipeline>,
    pub default_job_description: Arc<str>,
}

impl AppState {
    /// The pipeline must write to the same `jobs` store the handlers read.
    pub fn new(
        jobs: Arc<JobStore>,
        storage: UploadStorage,
        pipeline: Arc<AnalysisPipeline>,
        default_job_description: &str,
    ) -> Self {
        Self {
            jobs,
            storage: Arc::new(storage),
            pipeline,
            default_job_description: Arc::from(default_job_description),
        }
    }
}
