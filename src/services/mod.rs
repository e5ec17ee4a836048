//! Service layer: orchestration over domain models and providers.

pub mod extraction;
pub mod story;

pub use extraction::ExtractionService;
pub use story::{compose_messages, STORYTELLER_SYSTEM_PROMPT};
