use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Dense embedding vector. Its length is fixed by the embedding model.
pub type Embedding = Vec<f32>;

/// Maps text to embeddings.
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    /// Embed a batch, returning one vector per input in input order.
    async fn embed_many(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError>;

    async fn embed_one(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        self.embed_many(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or(EmbeddingError::CountMismatch {
                expected: 1,
                actual: 0,
            })
    }
}

/// Check that every vector has `expected` dimensions.
pub fn ensure_dimension(vectors: &[Embedding], expected: usize) -> Result<(), EmbeddingError> {
    match vectors.iter().find(|v| v.len() != expected) {
        Some(v) => Err(EmbeddingError::DimensionMismatch {
            expected,
            actual: v.len(),
        }),
        None => Ok(()),
    }
}

/// Client for an OpenAI-compatible `/embeddings` endpoint.
pub struct OpenAiEmbeddingClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Embedding,
}

impl OpenAiEmbeddingClient {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl EmbeddingClient for OpenAiEmbeddingClient {
    async fn embed_many(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/embeddings", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&EmbeddingRequest {
                model: &self.model,
                input: texts,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: EmbeddingResponse = response.json().await?;
        order_by_index(body.data, texts.len())
    }
}

/// The API tags each vector with its input position; restore input order.
fn order_by_index(mut data: Vec<EmbeddingData>, expected: usize) -> Result<Vec<Embedding>, EmbeddingError> {
    if data.len() != expected {
        return Err(EmbeddingError::CountMismatch {
            expected,
            actual: data.len(),
        });
    }
    data.sort_by_key(|d| d.index);
    Ok(data.into_iter().map(|d| d.embedding).collect())
}

#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Embedding API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Expected {expected} embeddings, got {actual}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}
