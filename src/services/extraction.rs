//! Character extraction pipeline.
//!
//! High-level orchestration for the two halves of the upload flow:
//! split-and-embed turns a document into segments, retrieve-and-query
//! rebuilds an in-memory index from those segments, retrieves context
//! for a fixed extraction query, and parses the completion output into
//! character records.

use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    parse_character_array, Character, ChatMessage, ChunkingConfig, SamplingParams, Segment,
};
use crate::domain::ports::{CompletionClient, CompletionRequest, EmbeddingProvider};
use crate::infrastructure::vector::{Chunker, Retrieved, VectorIndex};

/// The fixed retrieval query for character extraction.
const EXTRACTION_QUERY: &str =
    "List the name, description, and personality of every character";

/// Orchestrates chunking, embedding, retrieval, and extraction.
pub struct ExtractionService {
    embeddings: Arc<dyn EmbeddingProvider>,
    completions: Arc<dyn CompletionClient>,
}

impl ExtractionService {
    pub fn new(
        embeddings: Arc<dyn EmbeddingProvider>,
        completions: Arc<dyn CompletionClient>,
    ) -> Self {
        Self {
            embeddings,
            completions,
        }
    }

    /// Split a document into overlapping chunks and embed each one.
    ///
    /// Returns segments in document order, one embedding per chunk.
    pub async fn split_and_embed(
        &self,
        document: &str,
        chunking: ChunkingConfig,
    ) -> DomainResult<Vec<Segment>> {
        let chunker = Chunker::new(chunking)?;
        let chunks = chunker.chunk(document)?;

        info!(
            "Chunked document into {} chunks (size {}, overlap {})",
            chunks.len(),
            chunking.chunk_size,
            chunking.chunk_overlap
        );

        let vectors = self.embeddings.embed_batch(&chunks).await?;

        if vectors.len() != chunks.len() {
            return Err(DomainError::EmbeddingFailed(format!(
                "expected {} embeddings, got {}",
                chunks.len(),
                vectors.len()
            )));
        }

        Ok(chunks
            .into_iter()
            .zip(vectors)
            .map(|(text, embedding)| Segment::new(text, embedding))
            .collect())
    }

    /// Rebuild the index from the posted segments, retrieve context for
    /// the extraction query, and parse the completion output.
    ///
    /// The index exists only for this call; repeat queries rebuild it
    /// from the segment payload sent with each request.
    pub async fn extract_characters(
        &self,
        segments: Vec<Segment>,
        sampling: SamplingParams,
    ) -> DomainResult<Vec<Character>> {
        sampling.validate()?;

        let index = VectorIndex::build(segments)?;
        debug!(
            "Built ephemeral index over {} segments (dimension {})",
            index.len(),
            index.dimension()
        );

        let query_vector = self.embeddings.embed(EXTRACTION_QUERY).await?;
        let retrieved = index.retrieve(&query_vector, sampling.top_k)?;

        debug!("Retrieved {} segments for extraction", retrieved.len());

        let prompt = build_extraction_prompt(&retrieved);
        let request = CompletionRequest::new(vec![ChatMessage::user(prompt)])
            .with_sampling(sampling.temperature, sampling.top_p);

        let response = self.completions.complete(request).await?;

        let characters = parse_character_array(&response)?;
        info!("Extracted {} characters", characters.len());

        Ok(characters)
    }
}

/// Assemble the extraction prompt from retrieved context.
fn build_extraction_prompt(context: &[Retrieved]) -> String {
    let context_str = context
        .iter()
        .enumerate()
        .map(|(i, r)| format!("[Context {}]\n{}\n", i + 1, r.text))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Use the following context to answer the query. Respond with only the requested JSON, without commentary.

## Context

{}

## Format

Please provide the following information in JSON format:
[
  {{
    "id": Object ID / Number,
    "name": "Object Name",
    "description": "Object Description",
    "personality": "Object Personality"
  }}
]

## Query

{}"#,
        context_str, EXTRACTION_QUERY
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::domain::ports::CompletionStream;
    use std::sync::Mutex;

    /// Deterministic embedding provider: vector depends on text length.
    struct StubEmbeddings {
        dimension: usize,
    }

    #[async_trait]
    impl EmbeddingProvider for StubEmbeddings {
        fn name(&self) -> &'static str {
            "stub"
        }

        fn dimension(&self) -> usize {
            self.dimension
        }

        async fn embed(&self, text: &str) -> DomainResult<Vec<f32>> {
            let mut v = vec![0.0; self.dimension];
            v[text.len() % self.dimension] = 1.0;
            Ok(v)
        }

        async fn embed_batch(&self, texts: &[String]) -> DomainResult<Vec<Vec<f32>>> {
            let mut out = Vec::new();
            for text in texts {
                out.push(self.embed(text).await?);
            }
            Ok(out)
        }

        fn max_batch_size(&self) -> usize {
            2048
        }
    }

    /// Completion client returning a canned response and recording requests.
    struct StubCompletions {
        response: String,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl StubCompletions {
        fn new(response: &str) -> Self {
            Self {
                response: response.to_string(),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionClient for StubCompletions {
        async fn complete(&self, request: CompletionRequest) -> DomainResult<String> {
            self.seen.lock().unwrap().push(request);
            Ok(self.response.clone())
        }

        async fn complete_stream(
            &self,
            _request: CompletionRequest,
        ) -> DomainResult<CompletionStream> {
            unimplemented!("not used in extraction tests")
        }
    }

    fn service(response: &str) -> (ExtractionService, Arc<StubCompletions>) {
        let completions = Arc::new(StubCompletions::new(response));
        let service = ExtractionService::new(
            Arc::new(StubEmbeddings { dimension: 8 }),
            completions.clone(),
        );
        (service, completions)
    }

    #[tokio::test]
    async fn test_split_and_embed_single_segment() {
        let (service, _) = service("[]");
        let segments = service
            .split_and_embed("Alice is brave. Bob is cowardly.", ChunkingConfig::new(1024, 20))
            .await
            .unwrap();

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "Alice is brave. Bob is cowardly.");
        assert_eq!(segments[0].dimension(), 8);
    }

    #[tokio::test]
    async fn test_split_and_embed_rejects_empty_document() {
        let (service, _) = service("[]");
        let err = service
            .split_and_embed("", ChunkingConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::EmptyDocument));
    }

    #[tokio::test]
    async fn test_split_and_embed_rejects_bad_overlap() {
        let (service, _) = service("[]");
        let err = service
            .split_and_embed("some text", ChunkingConfig::new(10, 10))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidChunking(_)));
    }

    #[tokio::test]
    async fn test_extract_characters_happy_path() {
        let (service, completions) = service(
            r#"[{"id":1,"name":"Alice","description":"An explorer","personality":"brave"}]"#,
        );

        let segments = vec![Segment::new("Alice is brave.", unit_vec(8, 0))];
        let characters = service
            .extract_characters(segments, SamplingParams::default())
            .await
            .unwrap();

        assert_eq!(characters.len(), 1);
        assert_eq!(characters[0].name, "Alice");

        // The completion request carries the sampling parameters and the
        // retrieved context.
        let seen = completions.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].temperature, Some(0.1));
        assert_eq!(seen[0].top_p, Some(1.0));
        assert!(seen[0].messages[0].content.contains("Alice is brave."));
        assert!(seen[0].messages[0].content.contains("JSON format"));
    }

    #[tokio::test]
    async fn test_extract_characters_malformed_response() {
        let (service, _) = service("Sure! The characters are Alice and Bob.");

        let segments = vec![Segment::new("Alice is brave.", unit_vec(8, 0))];
        let err = service
            .extract_characters(segments, SamplingParams::default())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Invalid character data format received");
    }

    #[tokio::test]
    async fn test_extract_characters_rejects_empty_segments() {
        let (service, _) = service("[]");
        let err = service
            .extract_characters(vec![], SamplingParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::EmptyIndex));
    }

    #[tokio::test]
    async fn test_extract_characters_rejects_bad_sampling() {
        let (service, _) = service("[]");
        let segments = vec![Segment::new("text", unit_vec(8, 0))];
        let mut sampling = SamplingParams::default();
        sampling.top_k = 0;

        let err = service.extract_characters(segments, sampling).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidSampling(_)));
    }

    #[tokio::test]
    async fn test_extract_characters_dimension_mismatch() {
        let (service, _) = service("[]");
        // Segments are 4-dimensional, the stub provider embeds queries in 8.
        let segments = vec![Segment::new("text", unit_vec(4, 0))];

        let err = service
            .extract_characters(segments, SamplingParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DimensionMismatch { .. }));
    }

    fn unit_vec(dim: usize, hot: usize) -> Vec<f32> {
        let mut v = vec![0.0; dim];
        v[hot] = 1.0;
        v
    }
}
