use thiserror::Error;

use crate::domain::errors::DomainError;

/// Errors that can occur when talking to the OpenAI-compatible API
#[derive(Error, Debug)]
pub enum OpenAiApiError {
    /// Invalid request parameters or malformed request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Authentication failed due to invalid or missing API key
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Rate limit or quota exceeded upstream
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// API server encountered an internal error
    #[error("API server error: {0}")]
    ServerError(String),

    /// Network error occurred during request
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON serialization or deserialization error
    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// API key is neither configured nor present in the environment
    #[error("API key not set. Set OPENAI_API_KEY or configure openai.api_key")]
    MissingApiKey,

    /// Unknown error occurred
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl OpenAiApiError {
    /// Create an error from an HTTP status code and response body.
    pub fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        match status.as_u16() {
            400 => OpenAiApiError::InvalidRequest(body),
            401 | 403 => OpenAiApiError::AuthenticationFailed(body),
            429 => OpenAiApiError::RateLimitExceeded(body),
            500..=599 => OpenAiApiError::ServerError(body),
            _ => OpenAiApiError::Unknown(format!("HTTP {}: {}", status, body)),
        }
    }
}

impl From<OpenAiApiError> for DomainError {
    fn from(err: OpenAiApiError) -> Self {
        DomainError::CompletionFailed(err.to_string())
    }
}
