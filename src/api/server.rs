//! HTTP server assembly.

use anyhow::{Context, Result};
use axum::routing::post;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::handlers::{self, AppState};
use crate::domain::models::Config;
use crate::domain::ports::{CompletionClient, EmbeddingProvider};
use crate::infrastructure::openai::{OpenAiClient, OpenAiEmbeddingProvider};
use crate::services::ExtractionService;

/// Build application state from configuration.
pub fn build_state(config: &Config) -> Result<AppState> {
    let completions: Arc<dyn CompletionClient> = Arc::new(
        OpenAiClient::new(&config.openai).context("Failed to create completion client")?,
    );
    let embeddings: Arc<dyn EmbeddingProvider> = Arc::new(
        OpenAiEmbeddingProvider::new(&config.openai)
            .context("Failed to create embedding provider")?,
    );

    let extraction = Arc::new(ExtractionService::new(embeddings, completions.clone()));

    Ok(AppState {
        extraction,
        completions,
    })
}

/// Build the router over the given state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(handlers::chat))
        .route("/api/splitandembed", post(handlers::split_and_embed))
        .route("/api/retrieveandquery", post(handlers::retrieve_and_query))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until shutdown.
pub async fn serve(config: Config) -> Result<()> {
    let state = build_state(&config)?;
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind {}", addr))?;

    info!("Storyweaver listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
