//! Story request and conversation models.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::models::Character;

/// Story genre selected in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Genre {
    Fantasy,
    Mystery,
    Romance,
    #[serde(rename = "Sci-Fi")]
    SciFi,
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Genre::Fantasy => "Fantasy",
            Genre::Mystery => "Mystery",
            Genre::Romance => "Romance",
            Genre::SciFi => "Sci-Fi",
        };
        write!(f, "{}", s)
    }
}

/// Story tone selected in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tone {
    Happy,
    Sad,
    Sarcastic,
    Funny,
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Tone::Happy => "Happy",
            Tone::Sad => "Sad",
            Tone::Sarcastic => "Sarcastic",
            Tone::Funny => "Funny",
        };
        write!(f, "{}", s)
    }
}

/// The assembled genre/tone/character payload for one "Generate Story" action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryRequest {
    pub genre: Genre,
    pub tone: Tone,
    pub characters: Vec<Character>,
}

impl StoryRequest {
    pub fn new(genre: Genre, tone: Tone, characters: Vec<Character>) -> Self {
        Self {
            genre,
            tone,
            characters,
        }
    }

    /// A request is submittable once genre, tone, and at least one
    /// character are present.
    pub fn is_ready(&self) -> bool {
        !self.characters.is_empty()
    }

    /// Render the user prompt for this request.
    pub fn prompt(&self) -> String {
        let characters_prompt = if self.characters.is_empty() {
            String::new()
        } else {
            let listing = self
                .characters
                .iter()
                .map(|c| {
                    format!(
                        "- {}: {}. Personality: {}",
                        c.name, c.description, c.personality
                    )
                })
                .collect::<Vec<_>>()
                .join("\n");
            format!("Include these characters in the story:\n{}", listing)
        };

        format!(
            "Generate a {} story in a {} tone. {}",
            self.genre, self.tone, characters_prompt
        )
    }
}

/// Role of a conversation participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// An ordered, append-only conversation transcript.
///
/// Messages are never deduplicated: re-submitting identical content
/// appends a new entry after the prior one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
