//! Token-aware text chunking.
//!
//! Splits a document into overlapping chunks measured in tokens, using
//! the cl100k_base tokenizer shared by most embedding models.

use tiktoken_rs::{CoreBPE, Rank};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::ChunkingConfig;

/// Token-aware text chunker.
///
/// Produces an ordered sequence of chunks covering the whole document,
/// each at most `chunk_size` tokens, with consecutive chunks sharing
/// `chunk_overlap` tokens.
pub struct Chunker {
    config: ChunkingConfig,
    tokenizer: CoreBPE,
}

impl Chunker {
    /// Create a chunker with the given configuration.
    ///
    /// Fails fast on an invalid configuration rather than inheriting
    /// undefined behavior from the tokenizer.
    pub fn new(config: ChunkingConfig) -> DomainResult<Self> {
        config.validate()?;

        let tokenizer = tiktoken_rs::cl100k_base()
            .map_err(|e| DomainError::InvalidChunking(format!("failed to load tokenizer: {}", e)))?;

        Ok(Self { config, tokenizer })
    }

    /// Split a document into overlapping chunks.
    ///
    /// An empty (or whitespace-only) document is rejected. No produced
    /// chunk is empty, and original order is preserved.
    pub fn chunk(&self, document: &str) -> DomainResult<Vec<String>> {
        if document.trim().is_empty() {
            return Err(DomainError::EmptyDocument);
        }

        let tokens = self.tokenizer.encode_with_special_tokens(document);
        if tokens.is_empty() {
            return Err(DomainError::EmptyDocument);
        }

        let mut chunks = Vec::new();
        let mut start = 0;

        while start < tokens.len() {
            let mut end = (start + self.config.chunk_size).min(tokens.len());

            // Token boundaries are byte boundaries, not character
            // boundaries: a window edge can land inside a multi-byte
            // character. Extend the window until its tail completes a
            // character, then drop leading continuation bytes the
            // previous window already covers.
            let mut bytes = self.window_bytes(&tokens[start..end]);
            while end < tokens.len() && incomplete_suffix_len(&bytes) > 0 {
                end += 1;
                bytes = self.window_bytes(&tokens[start..end]);
            }

            let lead = continuation_prefix_len(&bytes);
            let chunk_text = String::from_utf8(bytes[lead..].to_vec()).map_err(|e| {
                DomainError::InvalidChunking(format!("failed to decode tokens: {}", e))
            })?;

            if !chunk_text.is_empty() {
                chunks.push(chunk_text);
            }

            if end >= tokens.len() {
                break;
            }

            start = end.saturating_sub(self.config.chunk_overlap);
        }

        Ok(chunks)
    }

    /// Raw bytes of a token window, without UTF-8 validation.
    fn window_bytes(&self, window: &[Rank]) -> Vec<u8> {
        self.tokenizer
            ._decode_native_and_split(window.to_vec())
            .flatten()
            .collect()
    }

    /// Count tokens in a text.
    pub fn count_tokens(&self, text: &str) -> usize {
        self.tokenizer.encode_with_special_tokens(text).len()
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }
}

/// Number of leading continuation bytes (`0b10xxxxxx`).
fn continuation_prefix_len(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|&&b| b & 0xC0 == 0x80).count()
}

/// Length of a trailing incomplete UTF-8 sequence, 0 if the last
/// character is whole.
fn incomplete_suffix_len(bytes: &[u8]) -> usize {
    for back in 1..=bytes.len().min(4) {
        let byte = bytes[bytes.len() - back];
        if byte & 0xC0 != 0x80 {
            let width = utf8_sequence_len(byte);
            return if width > back { back } else { 0 };
        }
    }
    0
}

fn utf8_sequence_len(first: u8) -> usize {
    if first < 0x80 {
        1
    } else if first & 0xE0 == 0xC0 {
        2
    } else if first & 0xF0 == 0xE0 {
        3
    } else {
        4
    }
}
