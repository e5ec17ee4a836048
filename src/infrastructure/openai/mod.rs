//! OpenAI-compatible API integration: chat completions and embeddings.

pub mod client;
pub mod embeddings;
pub mod error;
pub mod streaming;
pub mod types;

pub use client::OpenAiClient;
pub use embeddings::OpenAiEmbeddingProvider;
pub use error::OpenAiApiError;
pub use streaming::DeltaStream;
