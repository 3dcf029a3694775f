//! Error types for lingus-embedding

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading an embedding model
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// Model file does not exist
    #[error("Model file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file does not follow the expected vector format
    #[error("Malformed model at record {record}: {message}")]
    Format { record: usize, message: String },

    /// The file parsed but holds no vectors
    #[error("Model contains no vectors")]
    Empty,

    /// The loader panicked before producing a model
    #[error("Model loader panicked: {0}")]
    Panicked(String),
}

impl EmbeddingError {
    /// Create a format error for the given record (1-based line or entry number)
    pub fn format(record: usize, message: impl Into<String>) -> Self {
        Self::Format {
            record,
            message: message.into(),
        }
    }
}

/// Result type for embedding operations
pub type Result<T> = std::result::Result<T, EmbeddingError>;
