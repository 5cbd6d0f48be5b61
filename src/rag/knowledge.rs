//! Knowledge document loading.
//!
//! The knowledge base is one UTF-8 text file read once at startup. A missing,
//! unreadable or blank file is a configuration error: the server must not
//! come up without something to answer from.

use crate::types::{AppError, Result};
use std::path::{Path, PathBuf};

/// The support corpus, immutable for the life of the process.
#[derive(Debug, Clone)]
pub struct KnowledgeDocument {
    path: PathBuf,
    text: String,
}

impl KnowledgeDocument {
    /// Read the knowledge document from `path`.
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::Configuration(format!(
                    "knowledge base file '{}' not found. Please ensure the file exists.",
                    path.display()
                ))
            } else {
                AppError::Configuration(format!(
                    "failed to read knowledge base file '{}': {}",
                    path.display(),
                    e
                ))
            }
        })?;

        let document = Self::from_text(path, text)?;

        tracing::info!(
            path = %path.display(),
            bytes = document.text.len(),
            "Knowledge base loaded"
        );

        Ok(document)
    }

    /// Wrap text that is already in memory.
    pub fn from_text<P: Into<PathBuf>>(path: P, text: String) -> Result<Self> {
        let path = path.into();
        if text.trim().is_empty() {
            return Err(AppError::Configuration(format!(
                "knowledge base file '{}' is empty",
                path.display()
            )));
        }
        Ok(Self { path, text })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
