//! Batch insertion.
//!
//! The whole batch is validated before anything is inserted, so a bad item
//! leaves the index untouched. Levels for every item are drawn up front
//! (pure and independent per item); edge construction then runs serially
//! because it mutates shared neighbor lists.

use std::collections::HashSet;

use memory_types::VectorSettings;
use tracing::{debug, info};

use crate::error::VectorError;
use crate::graph::NodeId;
use crate::hnsw::HnswIndex;

/// One vector to insert.
#[derive(Debug, Clone)]
pub struct BatchItem<P> {
    pub id: NodeId,
    pub vector: Vec<f32>,
    pub payload: P,
}

impl<P> BatchItem<P> {
    pub fn new(id: NodeId, vector: Vec<f32>, payload: P) -> Self {
        Self {
            id,
            vector,
            payload,
        }
    }
}

/// Batch insertion options
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Items per chunk
    pub batch_size: usize,
    /// Log progress after every chunk
    pub show_progress: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            batch_size: 100,
            show_progress: false,
        }
    }
}

impl BatchOptions {
    pub fn from_settings(settings: &VectorSettings) -> Self {
        Self {
            batch_size: settings.batch_size,
            show_progress: settings.show_progress,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn validate(&self) -> Result<(), VectorError> {
        if self.batch_size == 0 {
            return Err(VectorError::Config("batch_size must be > 0".to_string()));
        }
        Ok(())
    }
}

impl<P> HnswIndex<P> {
    /// Insert many vectors. Same per-item contract as [`HnswIndex::add`],
    /// checked for the whole batch before the first insert.
    pub fn add_batch(
        &mut self,
        items: Vec<BatchItem<P>>,
        options: &BatchOptions,
    ) -> Result<(), VectorError> {
        options.validate()?;

        let mut seen: HashSet<NodeId> = HashSet::with_capacity(items.len());
        for item in &items {
            self.check_dimension(&item.vector)?;
            if self.graph.contains(item.id) || !seen.insert(item.id) {
                return Err(VectorError::DuplicateId(item.id));
            }
        }

        let total = items.len();
        if total == 0 {
            debug!("No items to index");
            return Ok(());
        }

        let levels: Vec<usize> = (0..total).map(|_| self.levels.random_level()).collect();

        let mut processed = 0usize;
        for (item, level) in items.into_iter().zip(levels) {
            self.insert_at_level(item.id, &item.vector, item.payload, level);
            processed += 1;

            if processed % options.batch_size == 0 || processed == total {
                if options.show_progress {
                    info!(processed = processed, total = total, "Batch insert progress");
                } else {
                    debug!(processed = processed, total = total, "Batch chunk complete");
                }
            }
        }

        Ok(())
    }
}
