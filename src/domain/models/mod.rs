//! Domain models for the Storyweaver service.

pub mod character;
pub mod chunking;
pub mod config;
pub mod story;
pub mod upload_flow;

pub use character::{parse_character_array, Character, CharacterRoster};
pub use config::{Config, LoggingConfig, OpenAiConfig, ServerConfig};
pub use chunking::{ChunkingConfig, SamplingParams, Segment};
pub use story::{ChatMessage, Genre, Role, StoryRequest, Tone, Transcript};
pub use upload_flow::{UploadFlow, UploadFlowState};
