//! Stand-in collaborators and wiring for pipeline and API tests.
#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use resume_fit::app_state::AppState;
use resume_fit::models::document::ResumeDocument;
use resume_fit::services::embeddings::{Embedding, EmbeddingClient, EmbeddingError};
use resume_fit::services::extractor::{ExtractionError, TextExtractor};
use resume_fit::services::job_store::JobStore;
use resume_fit::services::pipeline::{AnalysisPipeline, PipelineConfig, PipelineServices};
use resume_fit::services::reasoning::{ReasoningError, ReasoningGenerator};
use resume_fit::services::storage::UploadStorage;

pub const DEFAULT_JOB_DESCRIPTION: &str = "General resume analysis";

/// Returns fixed text regardless of the document.
pub struct StaticExtractor(pub String);

#[async_trait]
impl TextExtractor for StaticExtractor {
    async fn extract(&self, _document: &ResumeDocument) -> Result<String, ExtractionError> {
        Ok(self.0.clone())
    }
}

/// Always fails with a PDF error.
pub struct FailingExtractor;

#[async_trait]
impl TextExtractor for FailingExtractor {
    async fn extract(&self, _document: &ResumeDocument) -> Result<String, ExtractionError> {
        Err(ExtractionError::Pdf("corrupt xref table".to_string()))
    }
}

/// Panics mid-extraction.
pub struct PanickingExtractor;

#[async_trait]
impl TextExtractor for PanickingExtractor {
    async fn extract(&self, _document: &ResumeDocument) -> Result<String, ExtractionError> {
        panic!("extractor crashed");
    }
}

/// Returns the same vector for every input and records each batch.
pub struct ConstantEmbedder {
    vector: Embedding,
    pub batches: Mutex<Vec<Vec<String>>>,
}

impl ConstantEmbedder {
    pub fn new(vector: Embedding) -> Self {
        Self {
            vector,
            batches: Mutex::new(Vec::new()),
        }
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().iter().map(Vec::len).collect()
    }
}

#[async_trait]
impl EmbeddingClient for ConstantEmbedder {
    async fn embed_many(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        self.batches.lock().push(texts.to_vec());
        Ok(texts.iter().map(|_| self.vector.clone()).collect())
    }
}

/// Returns vectors whose length grows with every call.
pub struct DriftingEmbedder {
    calls: AtomicUsize,
}

impl DriftingEmbedder {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl EmbeddingClient for DriftingEmbedder {
    async fn embed_many(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        let dimension = 3 + self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|_| vec![0.5; dimension]).collect())
    }
}

/// Always fails as if the provider were down.
pub struct FailingEmbedder;

#[async_trait]
impl EmbeddingClient for FailingEmbedder {
    async fn embed_many(&self, _texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        Err(EmbeddingError::Api {
            status: 503,
            message: "service unavailable".to_string(),
        })
    }
}

/// Writes a templated summary and records what it was given.
#[derive(Default)]
pub struct RecordingReasoner {
    pub delay: Option<Duration>,
    pub calls: Mutex<Vec<(String, String, f64)>>,
}

impl RecordingReasoner {
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl ReasoningGenerator for RecordingReasoner {
    async fn summarize(
        &self,
        resume_text: &str,
        job_description: &str,
        score: f64,
    ) -> Result<String, ReasoningError> {
        self.calls
            .lock()
            .push((resume_text.to_string(), job_description.to_string(), score));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(format!(
            "Match score {score}%: the candidate's Go and distributed systems work lines up with the role."
        ))
    }
}

pub fn unit_vector() -> Embedding {
    vec![0.6, 0.8, 0.0, 0.0]
}

pub fn services(
    extractor: Arc<dyn TextExtractor>,
    embeddings: Arc<dyn EmbeddingClient>,
    reasoning: Arc<dyn ReasoningGenerator>,
) -> PipelineServices {
    PipelineServices {
        extractor,
        embeddings,
        reasoning,
    }
}

pub fn build_pipeline(
    services: PipelineServices,
    config: PipelineConfig,
) -> (Arc<JobStore>, Arc<AnalysisPipeline>) {
    let jobs = Arc::new(JobStore::new());
    let pipeline = Arc::new(AnalysisPipeline::new(services, Arc::clone(&jobs), config));
    (jobs, pipeline)
}

/// Unique scratch directory for uploads.
pub fn temp_upload_dir() -> PathBuf {
    std::env::temp_dir().join(format!("resume-fit-test-{}", uuid::Uuid::new_v4()))
}

pub fn app_state(services: PipelineServices, upload_dir: PathBuf) -> AppState {
    let (jobs, pipeline) = build_pipeline(services, PipelineConfig::default());
    AppState::new(
        jobs,
        UploadStorage::new(upload_dir),
        pipeline,
        DEFAULT_JOB_DESCRIPTION,
    )
}

pub const BOUNDARY: &str = "resume-fit-test-boundary";

/// One multipart/form-data part.
pub struct Part<'a> {
    pub name: &'a str,
    pub filename: Option<&'a str>,
    pub content: &'a [u8],
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part.filename {
            Some(filename) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{filename}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n",
                    part.name
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                    part.name
                )
                .as_bytes(),
            ),
        }
        body.extend_from_slice(part.content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}
