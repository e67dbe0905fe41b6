use async_trait::async_trait;

use crate::models::document::{DocumentKind, ResumeDocument};

/// Converts an uploaded document into plain text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, document: &ResumeDocument) -> Result<String, ExtractionError>;
}

/// Extracts the PDF text layer with `pdf-extract`, or decodes plain text as UTF-8.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentTextExtractor;

#[async_trait]
impl TextExtractor for DocumentTextExtractor {
    async fn extract(&self, document: &ResumeDocument) -> Result<String, ExtractionError> {
        let text = match document.kind() {
            DocumentKind::Pdf => {
                // pdf-extract is CPU bound and synchronous
                let bytes = document.bytes().clone();
                tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
                    .await?
                    .map_err(|e| ExtractionError::Pdf(e.to_string()))?
            }
            DocumentKind::PlainText => String::from_utf8(document.bytes().to_vec())?,
        };

        Ok(text.trim().to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("Failed to extract text from PDF: {0}")]
    Pdf(String),

    #[error("Document is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("Extraction task aborted: {0}")]
    Join(#[from] tokio::task::JoinError),
}
