use std::path::{Path, PathBuf};

/// Local directory uploaded resumes are written to.
pub struct UploadStorage {
    root: PathBuf,
}

impl UploadStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write an upload under `key`, creating the directory on first use.
    /// Returns the stored path.
    pub async fn upload(&self, key: &str, data: &[u8]) -> Result<PathBuf, StorageError> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(StorageError::InvalidKey(key.to_string()));
        }

        tokio::fs::create_dir_all(&self.root).await?;
        let path = self.root.join(key);
        tokio::fs::write(&path, data).await?;
        Ok(path)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}
