//! Ports (trait seams) between services and external providers.

pub mod completion;
pub mod embedding;

pub use completion::{CompletionClient, CompletionRequest, CompletionStream};
pub use embedding::EmbeddingProvider;
