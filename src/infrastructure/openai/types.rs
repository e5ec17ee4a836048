/// Request and response types for the OpenAI-compatible API
use serde::{Deserialize, Serialize};

use crate::domain::models::ChatMessage;

/// Chat completion request body for `/chat/completions`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    /// Model identifier (e.g., "gpt-4o-mini")
    pub model: String,

    /// Array of messages in the conversation
    pub messages: Vec<ChatMessage>,

    /// Temperature for sampling (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Nucleus sampling probability (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,

    /// Enable streaming (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

/// Chat completion response for non-streaming calls
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub choices: Vec<ChatChoice>,
}

impl ChatCompletionResponse {
    /// Content of the first choice, if present.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.as_ref())
            .map(|m| m.content.as_str())
    }
}

/// A single completion choice
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    /// Full message (non-streaming responses)
    #[serde(default)]
    pub message: Option<ChoiceMessage>,

    /// Incremental delta (streaming chunks)
    #[serde(default)]
    pub delta: Option<ChoiceDelta>,

    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Message body of a non-streaming choice
#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    pub role: String,
    pub content: String,
}

/// Incremental content of a streaming chunk
#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceDelta {
    #[serde(default)]
    pub content: Option<String>,
}

/// One streamed chunk of a chat completion
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionChunk {
    pub choices: Vec<ChatChoice>,
}

impl ChatCompletionChunk {
    /// Text delta carried by this chunk, if any.
    pub fn delta_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.delta.as_ref())
            .and_then(|d| d.content.as_deref())
    }
}

/// Embeddings request body for `/embeddings`
#[derive(Debug, Clone, Serialize)]
pub struct EmbeddingsRequest {
    pub model: String,
    pub input: Vec<String>,
}

/// Embeddings response
#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingsResponse {
    pub data: Vec<EmbeddingData>,
}

/// A single embedding result
#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingData {
    pub embedding: Vec<f32>,
    pub index: usize,
}
