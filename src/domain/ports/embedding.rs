//! Embedding provider port for semantic vector generation.
//!
//! Defines the trait for embedding providers that convert text into
//! dense vector representations for semantic similarity search.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;

/// Trait for embedding providers.
///
/// Implementations must preserve input order in batch results and
/// propagate transport or quota errors unchanged; no retry is performed
/// at this seam.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Provider name (e.g., "openai").
    fn name(&self) -> &'static str;

    /// Embedding dimension for this provider/model.
    fn dimension(&self) -> usize;

    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> DomainResult<Vec<f32>>;

    /// Generate embeddings for multiple texts, one vector per text,
    /// same order.
    ///
    /// Implementations should split the input if the provider has
    /// per-request limits.
    async fn embed_batch(&self, texts: &[String]) -> DomainResult<Vec<Vec<f32>>>;

    /// Maximum number of texts per single API call.
    fn max_batch_size(&self) -> usize;
}
