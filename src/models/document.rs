use bytes::Bytes;
use serde::Serialize;
use strum::{Display, EnumString};

/// Document formats text can be extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    #[strum(serialize = "pdf")]
    Pdf,
    #[strum(serialize = "txt")]
    PlainText,
}

impl DocumentKind {
    /// Resolve the kind from a filename's extension, ignoring case.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (stem, ext) = filename.rsplit_once('.')?;
        if stem.is_empty() {
            return None;
        }
        ext.to_ascii_lowercase().parse().ok()
    }

    /// Extension used when storing the upload, including the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => ".pdf",
            DocumentKind::PlainText => ".txt",
        }
    }
}

/// An uploaded resume. Only constructible for recognised document kinds.
#[derive(Debug, Clone)]
pub struct ResumeDocument {
    filename: String,
    kind: DocumentKind,
    bytes: Bytes,
}

impl ResumeDocument {
    pub fn new(filename: impl Into<String>, bytes: Bytes) -> Option<Self> {
        let filename = filename.into();
        let kind = DocumentKind::from_filename(&filename)?;
        Some(Self {
            filename,
            kind,
            bytes,
        })
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }
}
