//! Vector index trait and types.
//!
//! Defines the interface the memory subsystem uses for vector similarity
//! search. Embedding generation and persistence sit outside this seam.

use crate::batch::{BatchItem, BatchOptions};
use crate::error::VectorError;
use crate::graph::NodeId;
use crate::hnsw::HnswIndex;

/// Result of a vector search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult<P> {
    /// Caller-supplied vector ID
    pub id: NodeId,
    /// Distance to the query (lower = more similar for every metric)
    pub distance: f32,
    /// Payload stored with the vector
    pub payload: P,
}

impl<P> SearchResult<P> {
    pub fn new(id: NodeId, distance: f32, payload: P) -> Self {
        Self {
            id,
            distance,
            payload,
        }
    }
}

/// Index statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexStats {
    /// Number of vectors in the index
    pub node_count: usize,
    /// Embedding dimension
    pub dimension: usize,
    /// Highest level held by any node
    pub max_level: usize,
    /// Node every descent starts from
    pub entry_point: Option<NodeId>,
    /// Mean adjacency entries per node, summed over all of its levels
    pub avg_connections: f64,
}

/// Trait for vector indexes.
///
/// Implementations must be safe to share for concurrent read access.
pub trait VectorIndex: Send + Sync {
    /// Opaque data stored next to each vector
    type Payload: Clone + Send + Sync;

    /// Get the embedding dimension
    fn dimension(&self) -> usize;

    /// Get the number of vectors in the index
    fn len(&self) -> usize;

    /// Check if the index is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Add a vector with the given ID.
    /// Returns error if ID already exists.
    fn add(&mut self, id: NodeId, vector: &[f32], payload: Self::Payload)
        -> Result<(), VectorError>;

    /// Add multiple vectors in chunks of `options.batch_size`.
    fn add_batch(
        &mut self,
        items: Vec<BatchItem<Self::Payload>>,
        options: &BatchOptions,
    ) -> Result<(), VectorError> {
        options.validate()?;
        for item in items {
            self.add(item.id, &item.vector, item.payload)?;
        }
        Ok(())
    }

    /// Search for k nearest neighbors.
    /// Returns results sorted by distance (best first).
    fn search(
        &self,
        query: &[f32],
        k: usize,
    ) -> Result<Vec<SearchResult<Self::Payload>>, VectorError>;

    /// Remove a vector by ID. `Ok(false)` when the ID is unknown.
    fn remove(&mut self, id: NodeId) -> Result<bool, VectorError>;

    /// Check if a vector ID exists
    fn contains(&self, id: NodeId) -> bool;

    /// Get index statistics
    fn stats(&self) -> IndexStats;

    /// Clear all vectors from the index
    fn clear(&mut self) -> Result<(), VectorError>;
}

impl<P: Clone + Send + Sync> VectorIndex for HnswIndex<P> {
    type Payload = P;

    fn dimension(&self) -> usize {
        HnswIndex::dimension(self)
    }

    fn len(&self) -> usize {
        HnswIndex::len(self)
    }

    fn add(&mut self, id: NodeId, vector: &[f32], payload: P) -> Result<(), VectorError> {
        HnswIndex::add(self, id, vector, payload)
    }

    fn add_batch(
        &mut self,
        items: Vec<BatchItem<P>>,
        options: &BatchOptions,
    ) -> Result<(), VectorError> {
        HnswIndex::add_batch(self, items, options)
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchResult<P>>, VectorError> {
        HnswIndex::search(self, query, k)
    }

    fn remove(&mut self, id: NodeId) -> Result<bool, VectorError> {
        Ok(HnswIndex::remove(self, id))
    }

    fn contains(&self, id: NodeId) -> bool {
        HnswIndex::contains(self, id)
    }

    fn stats(&self) -> IndexStats {
        HnswIndex::stats(self)
    }

    fn clear(&mut self) -> Result<(), VectorError> {
        HnswIndex::clear(self);
        Ok(())
    }
}
