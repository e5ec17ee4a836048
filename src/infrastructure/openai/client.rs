//! HTTP client for the OpenAI-compatible chat completions API.
//!
//! One pooled `reqwest::Client` serves both blocking and streaming
//! completions. Errors from the upstream service propagate to the caller
//! unchanged; there is no retry.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client as ReqwestClient;
use std::time::Duration;
use tracing::{debug, error, info};

use super::error::OpenAiApiError;
use super::streaming::DeltaStream;
use super::types::{ChatCompletionRequest, ChatCompletionResponse};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::OpenAiConfig;
use crate::domain::ports::{CompletionClient, CompletionRequest, CompletionStream};

/// Client for an OpenAI-compatible chat completions endpoint.
pub struct OpenAiClient {
    http_client: ReqwestClient,
    api_key: String,
    base_url: String,
    chat_model: String,
}

impl OpenAiClient {
    /// Create a new client from configuration.
    ///
    /// The API key falls back to the `OPENAI_API_KEY` environment variable
    /// when not configured explicitly.
    pub fn new(config: &OpenAiConfig) -> Result<Self, OpenAiApiError> {
        let api_key = resolve_api_key(config)?;

        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(10)
            .tcp_nodelay(true)
            .build()?;

        info!(
            "Initializing completion client: base_url={}, model={}",
            config.base_url, config.chat_model
        );

        Ok(Self {
            http_client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            chat_model: config.chat_model.clone(),
        })
    }

    fn build_body(&self, request: &CompletionRequest, stream: bool) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.chat_model.clone(),
            messages: request.messages.clone(),
            temperature: request.temperature,
            top_p: request.top_p,
            stream: stream.then_some(true),
        }
    }

    async fn post_completions(
        &self,
        body: &ChatCompletionRequest,
    ) -> Result<reqwest::Response, OpenAiApiError> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!("POST {}", url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());
            error!("Completion request failed ({}): {}", status, body);
            return Err(OpenAiApiError::from_status(status, body));
        }

        Ok(response)
    }
}

/// Resolve the API key from config or environment.
pub(super) fn resolve_api_key(config: &OpenAiConfig) -> Result<String, OpenAiApiError> {
    config
        .api_key
        .clone()
        .or_else(|| std::env::var("OPENAI_API_KEY").ok())
        .ok_or(OpenAiApiError::MissingApiKey)
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> DomainResult<String> {
        let body = self.build_body(&request, false);
        let response = self.post_completions(&body).await?;

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| DomainError::CompletionFailed(format!("invalid response body: {}", e)))?;

        parsed
            .first_content()
            .map(str::to_owned)
            .ok_or_else(|| DomainError::CompletionFailed("response had no choices".to_string()))
    }

    async fn complete_stream(&self, request: CompletionRequest) -> DomainResult<CompletionStream> {
        let body = self.build_body(&request, true);
        let response = self.post_completions(&body).await?;

        let deltas = DeltaStream::new(response.bytes_stream())
            .map(|item| item.map_err(DomainError::from));

        Ok(deltas.boxed())
    }
}
