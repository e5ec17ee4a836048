//! Chunking and in-memory vector search.

pub mod chunker;
pub mod index;

pub use chunker::Chunker;
pub use index::{cosine_distance, Retrieved, VectorIndex};
