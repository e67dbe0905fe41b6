use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::services::chunker::{ChunkError, ChunkerConfig};

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server bind address (e.g., "0.0.0.0:8000")
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// API key for the embedding and reasoning provider
    pub openai_api_key: String,

    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,

    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    #[serde(default = "default_reasoning_model")]
    pub reasoning_model: String,

    /// Directory uploaded resumes are written to
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    /// Chunk window size in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Characters shared between consecutive chunks. Must be below `chunk_size`.
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Deadline for the reasoning call. Other stages have none.
    #[serde(default = "default_reasoning_timeout_secs")]
    pub reasoning_timeout_secs: u64,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Used when an upload carries no job description
    #[serde(default = "default_job_description")]
    pub default_job_description: String,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_reasoning_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads/resumes")
}

fn default_chunk_size() -> usize {
    1000
}

fn default_chunk_overlap() -> usize {
    200
}

fn default_reasoning_timeout_secs() -> u64 {
    30
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_job_description() -> String {
    "General resume analysis".to_string()
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Chunking parameters, rejected at startup if the overlap cannot make progress.
    pub fn chunker(&self) -> Result<ChunkerConfig, ChunkError> {
        ChunkerConfig::new(self.chunk_size, self.chunk_overlap)
    }

    pub fn reasoning_timeout(&self) -> Duration {
        Duration::from_secs(self.reasoning_timeout_secs)
    }
}
