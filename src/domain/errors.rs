//! Domain errors for the Storyweaver service.

use thiserror::Error;

/// Domain-level errors that can occur in the Storyweaver system.
///
/// Every variant degrades to an `error` string in the HTTP envelope;
/// none is fatal to the process.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Document is empty")]
    EmptyDocument,

    #[error("Invalid chunking configuration: {0}")]
    InvalidChunking(String),

    #[error("Invalid sampling parameters: {0}")]
    InvalidSampling(String),

    #[error("Cannot build an index from an empty segment set")]
    EmptyIndex,

    #[error("Embedding dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Embedding request failed: {0}")]
    EmbeddingFailed(String),

    #[error("Completion request failed: {0}")]
    CompletionFailed(String),

    #[error("Invalid character data format received")]
    InvalidCharacterData(String),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}
