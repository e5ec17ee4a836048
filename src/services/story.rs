//! Story chat composition.
//!
//! The storyteller persona is fixed server-side; the caller only supplies
//! the conversation transcript.

use crate::domain::models::ChatMessage;

/// The fixed system instruction for the storytelling persona.
pub const STORYTELLER_SYSTEM_PROMPT: &str = "You are a professional storyteller who has been hired to write a short story based on the provided characters. The story should be captivating, imaginative, and thought-provoking. It should explore a variety of themes and genres, from science fiction and fantasy to mystery and romance. The story should be unique and memorable, with compelling characters and unexpected plot twists. After the story, write a paragraph about the summary of each character's role in the story.";

/// Prepend the fixed system prompt to the caller's transcript.
///
/// Everything after the system message passes through unmodified, in order.
pub fn compose_messages(transcript: &[ChatMessage]) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(transcript.len() + 1);
    messages.push(ChatMessage::system(STORYTELLER_SYSTEM_PROMPT));
    messages.extend_from_slice(transcript);
    messages
}
