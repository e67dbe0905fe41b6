use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Resume characters sent to the reasoning model. Longer resumes are cut.
pub const RESUME_PREFIX_CHARS: usize = 3000;

const SYSTEM_PROMPT: &str =
    "You are an experienced HR analyst who writes short, balanced resume evaluations.";
const MAX_TOKENS: u32 = 300;
const TEMPERATURE: f32 = 0.7;

/// Produces the narrative explaining a fit score.
#[async_trait]
pub trait ReasoningGenerator: Send + Sync {
    async fn summarize(
        &self,
        resume_text: &str,
        job_description: &str,
        score: f64,
    ) -> Result<String, ReasoningError>;
}

/// First [`RESUME_PREFIX_CHARS`] characters of the resume.
pub fn truncate_resume(resume_text: &str) -> &str {
    match resume_text.char_indices().nth(RESUME_PREFIX_CHARS) {
        Some((offset, _)) => &resume_text[..offset],
        None => resume_text,
    }
}

pub fn build_prompt(resume_text: &str, job_description: &str, score: f64) -> String {
    format!(
        "Compare the resume below with the job description and explain the match score.\n\n\
         Job description:\n{job_description}\n\n\
         Resume:\n{resume}\n\n\
         Match score: {score}%\n\n\
         In 3-5 sentences cover the candidate's strongest relevant experience, \
         any gaps or concerns, and an overall assessment of fit.",
        resume = truncate_resume(resume_text),
    )
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiReasoningClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl OpenAiReasoningClient {
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
impl ReasoningGenerator for OpenAiReasoningClient {
    async fn summarize(
        &self,
        resume_text: &str,
        job_description: &str,
        score: f64,
    ) -> Result<String, ReasoningError> {
        let prompt = build_prompt(resume_text, job_description, score);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ReasoningError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatResponse = response.json().await?;
        first_content(body)
    }
}

fn first_content(body: ChatResponse) -> Result<String, ReasoningError> {
    body.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or(ReasoningError::EmptyContent)
}

#[derive(Debug, thiserror::Error)]
pub enum ReasoningError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Reasoning API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Reasoning model returned empty content")]
    EmptyContent,
}
