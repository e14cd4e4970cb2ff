//! Error types shared by every stage of the sentiment workflow.

use thiserror::Error;

/// Error type for featurization, training, persistence and ingestion.
#[derive(Debug, Error)]
pub enum SentimentError {
    /// No training rows were supplied.
    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    /// Fewer than two label classes are present in the training data.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// A persisted or hand-assembled artifact is corrupted or internally inconsistent.
    #[error("Invalid artifact: {0}")]
    InvalidArtifact(String),

    /// A malformed input record.
    #[error("Ingestion error: {0}")]
    Ingestion(String),

    /// Mismatched argument lengths or an invalid configuration value.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization or deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<bincode::Error> for SentimentError {
    fn from(err: bincode::Error) -> Self {
        SentimentError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for SentimentError {
    fn from(err: serde_json::Error) -> Self {
        SentimentError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for SentimentError {
    fn from(err: csv::Error) -> Self {
        match err.position() {
            Some(pos) => SentimentError::Ingestion(format!("line {}: {}", pos.line(), err)),
            None => SentimentError::Ingestion(err.to_string()),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SentimentError>;
