//! Completion client port.
//!
//! The seam between services and the hosted chat-completion API. One
//! blocking call for extraction queries, one streaming call for the
//! chat proxy.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::domain::errors::DomainResult;
use crate::domain::models::ChatMessage;

/// Parameters for a single completion call.
#[derive(Debug, Clone, Default)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
}

impl CompletionRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            temperature: None,
            top_p: None,
        }
    }

    pub fn with_sampling(mut self, temperature: f32, top_p: f32) -> Self {
        self.temperature = Some(temperature);
        self.top_p = Some(top_p);
        self
    }
}

/// A stream of text deltas from a streaming completion.
pub type CompletionStream = BoxStream<'static, DomainResult<String>>;

/// Trait for chat-completion clients.
///
/// Failures propagate to the caller; there is no retry or backpressure
/// control here. Dropping a `CompletionStream` is the only cancellation
/// mechanism.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Run a completion to finish, returning the full response text.
    async fn complete(&self, request: CompletionRequest) -> DomainResult<String>;

    /// Run a streaming completion, yielding text deltas as they arrive.
    async fn complete_stream(&self, request: CompletionRequest) -> DomainResult<CompletionStream>;
}
