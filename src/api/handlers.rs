//! HTTP handlers for the three API routes.
//!
//! Domain failures are surfaced as an `error` string in the response
//! envelope; the client shows the message and the user may retry the
//! same action. Nothing here aborts the process.

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use futures::StreamExt;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::api::types::{
    ChatRequest, Envelope, RetrieveAndQueryPayload, RetrieveAndQueryRequest, SplitAndEmbedPayload,
    SplitAndEmbedRequest,
};
use crate::domain::models::{ChunkingConfig, SamplingParams};
use crate::domain::ports::{CompletionClient, CompletionRequest};
use crate::services::{compose_messages, ExtractionService};

/// Shared per-request application state.
///
/// All configuration is injected here; there is no process-wide mutable
/// state.
#[derive(Clone)]
pub struct AppState {
    pub extraction: Arc<ExtractionService>,
    pub completions: Arc<dyn CompletionClient>,
}

/// `POST /api/chat`
///
/// Prepends the fixed storyteller system prompt and relays the upstream
/// token stream unmodified. Closing the response body is the only
/// cancellation mechanism.
pub async fn chat(State(state): State<AppState>, Json(request): Json<ChatRequest>) -> Response {
    debug!("Chat request with {} messages", request.messages.len());

    let messages = compose_messages(&request.messages);

    match state
        .completions
        .complete_stream(CompletionRequest::new(messages))
        .await
    {
        Ok(stream) => {
            let body = Body::from_stream(stream.map(|item| item.map(Bytes::from)));
            (
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                body,
            )
                .into_response()
        }
        Err(err) => {
            error!("Chat stream setup failed: {}", err);
            (
                StatusCode::BAD_GATEWAY,
                Json(Envelope::<()>::err(err.to_string())),
            )
                .into_response()
        }
    }
}

/// `POST /api/splitandembed`
///
/// Chunks the document and embeds each chunk, returning segments for the
/// client to hold until the query step.
pub async fn split_and_embed(
    State(state): State<AppState>,
    Json(request): Json<SplitAndEmbedRequest>,
) -> Json<Envelope<SplitAndEmbedPayload>> {
    let chunking = ChunkingConfig::new(request.chunk_size, request.chunk_overlap);

    match state
        .extraction
        .split_and_embed(&request.document, chunking)
        .await
    {
        Ok(segments) => {
            info!("Embedded {} segments", segments.len());
            Json(Envelope::ok(SplitAndEmbedPayload {
                nodes_with_embedding: segments,
            }))
        }
        Err(err) => {
            error!("splitandembed failed: {}", err);
            Json(Envelope::err(err.to_string()))
        }
    }
}

/// `POST /api/retrieveandquery`
///
/// Rebuilds the index from the posted segments, runs the extraction
/// query, and returns the parsed character records.
pub async fn retrieve_and_query(
    State(state): State<AppState>,
    Json(request): Json<RetrieveAndQueryRequest>,
) -> Json<Envelope<RetrieveAndQueryPayload>> {
    let sampling = SamplingParams {
        top_k: request.top_k,
        temperature: request.temperature,
        top_p: request.top_p,
    };

    match state
        .extraction
        .extract_characters(request.nodes_with_embedding, sampling)
        .await
    {
        Ok(characters) => Json(Envelope::ok(RetrieveAndQueryPayload {
            response: characters,
        })),
        Err(err) => {
            error!("retrieveandquery failed: {}", err);
            Json(Envelope::err(err.to_string()))
        }
    }
}
