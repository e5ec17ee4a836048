//! Storyweaver - AI Storytelling Backend
//!
//! Storyweaver is the backend for a collaborative storytelling app: it proxies
//! streaming chat completions with a fixed storyteller persona, and extracts
//! character rosters from uploaded source texts through a retrieval-augmented
//! pipeline (chunk, embed, index, query).
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Pure business logic and domain models
//! - **Service Layer** (`services`): Business logic coordination
//! - **Infrastructure Layer** (`infrastructure`): External integrations and adapters
//! - **API Layer** (`api`): HTTP surface
//!
//! # Example
//!
//! ```ignore
//! use storyweaver::infrastructure::config::ConfigLoader;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::load()?;
//!     storyweaver::api::serve(config).await
//! }
//! ```

pub mod api;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    Character, CharacterRoster, ChatMessage, ChunkingConfig, Config, Genre, SamplingParams,
    Segment, StoryRequest, Tone,
};
pub use domain::{DomainError, DomainResult};
