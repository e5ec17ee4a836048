//! Ephemeral in-memory vector index.
//!
//! Built from scratch for every retrieve-and-query request and dropped
//! afterwards; nothing is persisted or shared between requests.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::Segment;

/// A retrieved segment with its distance to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct Retrieved {
    /// Position of the segment in the original document order.
    pub index: usize,
    pub text: String,
    pub distance: f32,
}

/// In-memory vector index over one request's segments.
#[derive(Debug)]
pub struct VectorIndex {
    segments: Vec<Segment>,
    dimension: usize,
}

impl VectorIndex {
    /// Build an index from the full segment set of one query session.
    ///
    /// Rejects an empty set and any segment whose embedding dimension
    /// differs from the first segment's.
    pub fn build(segments: Vec<Segment>) -> DomainResult<Self> {
        let Some(first) = segments.first() else {
            return Err(DomainError::EmptyIndex);
        };

        let dimension = first.dimension();
        if dimension == 0 {
            return Err(DomainError::DimensionMismatch {
                expected: 1,
                got: 0,
            });
        }

        for segment in &segments {
            if segment.dimension() != dimension {
                return Err(DomainError::DimensionMismatch {
                    expected: dimension,
                    got: segment.dimension(),
                });
            }
        }

        Ok(Self {
            segments,
            dimension,
        })
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Return the `k` segments nearest to the query vector by cosine
    /// distance, ascending.
    ///
    /// Ties are broken by original segment order (stable sort), so
    /// retrieval is deterministic.
    pub fn retrieve(&self, query: &[f32], k: usize) -> DomainResult<Vec<Retrieved>> {
        if query.len() != self.dimension {
            return Err(DomainError::DimensionMismatch {
                expected: self.dimension,
                got: query.len(),
            });
        }

        let mut scored: Vec<Retrieved> = self
            .segments
            .iter()
            .enumerate()
            .map(|(index, segment)| Retrieved {
                index,
                text: segment.text.clone(),
                distance: cosine_distance(query, &segment.embedding),
            })
            .collect();

        scored.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        scored.truncate(k);

        Ok(scored)
    }
}

/// Cosine distance between two vectors of equal length.
///
/// Zero-magnitude vectors compare as maximally distant.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return f32::MAX;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        return f32::MAX;
    }

    1.0 - (dot / (mag_a * mag_b))
}
