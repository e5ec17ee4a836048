//! Chunking and retrieval parameter models.
//!
//! Segments round-trip between client and server: splitandembed produces
//! them, retrieveandquery consumes them. The index itself is never
//! persisted server-side between calls.

use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};

/// A chunk of source text paired with its embedding vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub embedding: Vec<f32>,
}

impl Segment {
    pub fn new(text: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            text: text.into(),
            embedding,
        }
    }

    pub fn dimension(&self) -> usize {
        self.embedding.len()
    }
}

/// Configuration for document chunking, in tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum size of each chunk in tokens.
    pub chunk_size: usize,

    /// Overlap between consecutive chunks in tokens.
    pub chunk_overlap: usize,
}

impl ChunkingConfig {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    /// Validate the chunking configuration.
    ///
    /// The UI leaves these unchecked; the server enforces them and fails
    /// fast rather than inheriting undefined behavior downstream.
    pub fn validate(&self) -> DomainResult<()> {
        if self.chunk_size == 0 {
            return Err(DomainError::InvalidChunking(
                "chunk_size must be greater than 0".to_string(),
            ));
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err(DomainError::InvalidChunking(
                "chunk_overlap must be less than chunk_size".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for ChunkingConfig {
    /// Defaults match the upload form: 1024-token chunks, 20-token overlap.
    fn default() -> Self {
        Self {
            chunk_size: 1024,
            chunk_overlap: 20,
        }
    }
}

/// Sampling parameters for the retrieve-and-query call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    /// Number of nearest segments to retrieve.
    pub top_k: usize,

    /// Completion sampling temperature.
    pub temperature: f32,

    /// Nucleus sampling probability.
    pub top_p: f32,
}

impl SamplingParams {
    pub fn validate(&self) -> DomainResult<()> {
        if self.top_k == 0 {
            return Err(DomainError::InvalidSampling(
                "topK must be at least 1".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(DomainError::InvalidSampling(format!(
                "temperature {} out of range [0, 2]",
                self.temperature
            )));
        }

        if !(self.top_p > 0.0 && self.top_p <= 1.0) {
            return Err(DomainError::InvalidSampling(format!(
                "topP {} out of range (0, 1]",
                self.top_p
            )));
        }

        Ok(())
    }
}

impl Default for SamplingParams {
    /// Defaults match the upload form: topK 2, temperature 0.1, topP 1.
    fn default() -> Self {
        Self {
            top_k: 2,
            temperature: 0.1,
            top_p: 1.0,
        }
    }
}
