//! Resume analysis pipeline.
//!
//! One run moves a job through
//! `Extracting -> Chunking -> Embedding -> Scoring -> Reasoning -> Done`.
//! The first stage error ends the run and is recorded as the job's `failed`
//! state. Nothing is retried and no partial result is kept.
//!
//! Runs are detached from the request that submitted them. Each run is
//! wrapped in a supervisor task that records exactly one terminal state,
//! including when the run itself panics.

use std::sync::Arc;
use std::time::{Duration, Instant};

use strum::Display;
use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;

use crate::models::job::{AnalysisResult, JobId, JobPayload};
use crate::services::chunker::{self, ChunkerConfig};
use crate::services::embeddings::{self, EmbeddingClient, EmbeddingError};
use crate::services::extractor::{ExtractionError, TextExtractor};
use crate::services::job_store::JobStore;
use crate::services::reasoning::{self, ReasoningError, ReasoningGenerator};
use crate::services::scorer::{self, ScoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum PipelineStage {
    Extracting,
    Chunking,
    Embedding,
    Scoring,
    Reasoning,
    Done,
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub chunker: ChunkerConfig,
    /// Deadline for the reasoning call only.
    pub reasoning_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunker: ChunkerConfig::default(),
            reasoning_timeout: Duration::from_secs(30),
        }
    }
}

/// External collaborators the pipeline calls out to.
#[derive(Clone)]
pub struct PipelineServices {
    pub extractor: Arc<dyn TextExtractor>,
    pub embeddings: Arc<dyn EmbeddingClient>,
    pub reasoning: Arc<dyn ReasoningGenerator>,
}

pub struct AnalysisPipeline {
    services: PipelineServices,
    jobs: Arc<JobStore>,
    config: PipelineConfig,
    tracker: TaskTracker,
}

impl AnalysisPipeline {
    pub fn new(services: PipelineServices, jobs: Arc<JobStore>, config: PipelineConfig) -> Self {
        Self {
            services,
            jobs,
            config,
            tracker: TaskTracker::new(),
        }
    }

    /// Schedule a run for a job already created in the store.
    ///
    /// The returned handle resolves once the job's terminal state is written.
    pub fn spawn(self: &Arc<Self>, job_id: JobId, payload: JobPayload) -> JoinHandle<()> {
        let pipeline = Arc::clone(self);
        let run_id = job_id.clone();
        let run = self
            .tracker
            .spawn(async move { pipeline.run(&run_id, &payload).await });

        let jobs = Arc::clone(&self.jobs);
        self.tracker.spawn(async move {
            match run.await {
                Ok(Ok(result)) => record_completed(&jobs, &job_id, result),
                Ok(Err(e)) => record_failed(&jobs, &job_id, &e.to_string()),
                Err(e) => {
                    tracing::error!(job_id = %job_id, error = %e, "Pipeline run aborted");
                    record_failed(&jobs, &job_id, &format!("Pipeline run aborted: {e}"));
                }
            }
        })
    }

    /// Wait for every scheduled run to record its terminal state.
    pub async fn shutdown(&self) {
        self.tracker.close();
        self.tracker.wait().await;
    }

    /// Move the job to `processing` and run every stage.
    pub async fn run(
        &self,
        job_id: &JobId,
        payload: &JobPayload,
    ) -> Result<AnalysisResult, PipelineError> {
        self.jobs
            .mark_processing(job_id)
            .map_err(|e| PipelineError::Store(e.to_string()))?;
        let in_flight = InFlight::enter();
        let outcome = self.analyze(job_id, payload).await;
        drop(in_flight);

        if let Err(e) = &outcome {
            tracing::error!(
                job_id = %job_id,
                stage = %e.stage(),
                error = %e,
                "Resume analysis failed"
            );
        }
        outcome
    }

    async fn analyze(
        &self,
        job_id: &JobId,
        payload: &JobPayload,
    ) -> Result<AnalysisResult, PipelineError> {
        tracing::info!(
            job_id = %job_id,
            filename = %payload.document.filename(),
            kind = %payload.document.kind(),
            "Extracting resume text"
        );
        let text = self.services.extractor.extract(&payload.document).await?;

        tracing::debug!(job_id = %job_id, chars = text.chars().count(), "Chunking resume");
        let chunks: Vec<String> = chunker::chunk_text(&text, &self.config.chunker)
            .into_iter()
            .map(str::to_string)
            .collect();

        tracing::info!(job_id = %job_id, chunks = chunks.len(), "Generating embeddings");
        let chunk_embeddings = self.services.embeddings.embed_many(&chunks).await?;
        if chunk_embeddings.len() != chunks.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: chunks.len(),
                actual: chunk_embeddings.len(),
            }
            .into());
        }
        let job_embedding = self
            .services
            .embeddings
            .embed_one(&payload.job_description)
            .await?;
        embeddings::ensure_dimension(&chunk_embeddings, job_embedding.len())?;

        tracing::debug!(job_id = %job_id, "Scoring similarity");
        let score = scorer::score_chunks(&chunk_embeddings, &job_embedding)?;

        tracing::info!(job_id = %job_id, score, "Generating reasoning summary");
        let summary = self.services.reasoning.summarize(
            reasoning::truncate_resume(&text),
            &payload.job_description,
            score,
        );
        let reasoning = tokio::time::timeout(self.config.reasoning_timeout, summary)
            .await
            .map_err(|_| PipelineError::ReasoningTimeout(self.config.reasoning_timeout))??;

        Ok(AnalysisResult { score, reasoning })
    }
}

/// Tracks one run in the in-flight gauge and timing histogram. Released on
/// drop, so a run that panics is still accounted for.
struct InFlight {
    start: Instant,
}

impl InFlight {
    fn enter() -> Self {
        metrics::gauge!("resume_analysis_jobs_in_flight").increment(1.0);
        Self {
            start: Instant::now(),
        }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        metrics::gauge!("resume_analysis_jobs_in_flight").decrement(1.0);
        metrics::histogram!("resume_analysis_processing_seconds")
            .record(self.start.elapsed().as_secs_f64());
    }
}

fn record_completed(jobs: &JobStore, job_id: &JobId, result: AnalysisResult) {
    let score = result.score;
    match jobs.complete(job_id, result) {
        Ok(_) => {
            metrics::counter!("resume_analysis_jobs_completed").increment(1);
            tracing::info!(
                job_id = %job_id,
                stage = %PipelineStage::Done,
                score,
                "Resume analysis completed"
            );
        }
        Err(e) => tracing::error!(job_id = %job_id, error = %e, "Failed to record completion"),
    }
}

fn record_failed(jobs: &JobStore, job_id: &JobId, message: &str) {
    match jobs.fail(job_id, message) {
        Ok(_) => metrics::counter!("resume_analysis_jobs_failed").increment(1),
        Err(e) => tracing::error!(job_id = %job_id, error = %e, "Failed to record failure"),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Failed to extract resume text: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Failed to generate embeddings: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Failed to calculate similarity: {0}")]
    Scoring(#[from] ScoreError),

    #[error("Failed to generate reasoning summary: {0}")]
    Reasoning(#[from] ReasoningError),

    #[error("Reasoning summary timed out after {0:?}")]
    ReasoningTimeout(Duration),

    #[error("Job store rejected transition: {0}")]
    Store(String),
}

impl PipelineError {
    /// Stage the run was in when it failed.
    pub fn stage(&self) -> PipelineStage {
        match self {
            // The store refuses the run before the first stage starts.
            PipelineError::Extraction(_) | PipelineError::Store(_) => PipelineStage::Extracting,
            PipelineError::Embedding(_) => PipelineStage::Embedding,
            PipelineError::Scoring(_) => PipelineStage::Scoring,
            PipelineError::Reasoning(_) | PipelineError::ReasoningTimeout(_) => {
                PipelineStage::Reasoning
            }
        }
    }
}
