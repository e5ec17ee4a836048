//! OpenAI embedding provider.
//!
//! Calls the `/embeddings` endpoint of an OpenAI-compatible API.
//! Compatible with Azure OpenAI and local servers exposing the same
//! surface.

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use std::time::Duration;
use tracing::debug;

use super::client::resolve_api_key;
use super::error::OpenAiApiError;
use super::types::{EmbeddingsRequest, EmbeddingsResponse};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::OpenAiConfig;
use crate::domain::ports::EmbeddingProvider;

/// Embedding provider backed by an OpenAI-compatible `/embeddings` endpoint.
pub struct OpenAiEmbeddingProvider {
    http_client: ReqwestClient,
    api_key: String,
    base_url: String,
    model: String,
    dimension: usize,
    max_batch_size: usize,
}

impl OpenAiEmbeddingProvider {
    pub fn new(config: &OpenAiConfig) -> Result<Self, OpenAiApiError> {
        let api_key = resolve_api_key(config)?;

        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(Self {
            http_client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.embedding_model.clone(),
            dimension: config.embedding_dimension,
            max_batch_size: config.max_batch_size,
        })
    }

    async fn call_embeddings_api(&self, texts: Vec<String>) -> DomainResult<Vec<Vec<f32>>> {
        let url = format!("{}/embeddings", self.base_url);
        debug!("POST {} ({} texts)", url, texts.len());

        let request_body = EmbeddingsRequest {
            model: self.model.clone(),
            input: texts,
        };

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| DomainError::EmbeddingFailed(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read response body".to_string());
            let err = OpenAiApiError::from_status(status, body);
            return Err(DomainError::EmbeddingFailed(err.to_string()));
        }

        let result: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| DomainError::EmbeddingFailed(format!("invalid response body: {}", e)))?;

        // Sort by index to maintain input order.
        let mut data = result.data;
        data.sort_by_key(|d| d.index);

        Ok(data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> DomainResult<Vec<f32>> {
        let results = self.call_embeddings_api(vec![text.to_string()]).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::EmbeddingFailed("empty embedding response".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> DomainResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut all_vectors = Vec::with_capacity(texts.len());

        for chunk in texts.chunks(self.max_batch_size) {
            let vectors = self.call_embeddings_api(chunk.to_vec()).await?;

            if vectors.len() != chunk.len() {
                return Err(DomainError::EmbeddingFailed(format!(
                    "provider returned {} vectors for {} texts",
                    vectors.len(),
                    chunk.len()
                )));
            }

            all_vectors.extend(vectors);
        }

        Ok(all_vectors)
    }

    fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }
}
