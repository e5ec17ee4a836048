//! Wire types for the HTTP API.
//!
//! Field names are camelCase to match the browser client.

use serde::{Deserialize, Serialize};

use crate::domain::models::{Character, ChatMessage, Segment};

/// Response envelope shared by the non-streaming endpoints.
///
/// Exactly one of `error` and `payload` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<T>,
}

impl<T> Envelope<T> {
    pub fn ok(payload: T) -> Self {
        Self {
            error: None,
            payload: Some(payload),
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            payload: None,
        }
    }
}

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

/// Body of `POST /api/splitandembed`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitAndEmbedRequest {
    pub document: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

/// Payload of a successful splitandembed response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitAndEmbedPayload {
    pub nodes_with_embedding: Vec<Segment>,
}

/// Body of `POST /api/retrieveandquery`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrieveAndQueryRequest {
    pub nodes_with_embedding: Vec<Segment>,

    /// Number of neighbors to retrieve; the form default when omitted.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    pub temperature: f32,
    pub top_p: f32,
}

const fn default_top_k() -> usize {
    2
}

/// Payload of a successful retrieveandquery response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrieveAndQueryPayload {
    pub response: Vec<Character>,
}
