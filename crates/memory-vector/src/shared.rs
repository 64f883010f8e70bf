//! Shared index handle.
//!
//! Enforces single-writer, multiple-reader access around any
//! [`VectorIndex`]: searches take the read lock and may run concurrently,
//! `add`/`remove`/`clear` take the write lock.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::batch::{BatchItem, BatchOptions};
use crate::error::VectorError;
use crate::graph::NodeId;
use crate::index::{IndexStats, SearchResult, VectorIndex};

/// Cloneable, thread-safe handle to an index.
pub struct SharedIndex<I> {
    inner: Arc<RwLock<I>>,
}

impl<I> Clone for SharedIndex<I> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<I: VectorIndex> SharedIndex<I> {
    pub fn new(index: I) -> Self {
        Self {
            inner: Arc::new(RwLock::new(index)),
        }
    }

    /// Read access for operations not covered by the wrapper.
    pub fn read(&self) -> Result<RwLockReadGuard<'_, I>, VectorError> {
        self.inner.read().map_err(|_| VectorError::LockPoisoned)
    }

    /// Exclusive access for operations not covered by the wrapper.
    pub fn write(&self) -> Result<RwLockWriteGuard<'_, I>, VectorError> {
        self.inner.write().map_err(|_| VectorError::LockPoisoned)
    }

    pub fn add(&self, id: NodeId, vector: &[f32], payload: I::Payload) -> Result<(), VectorError> {
        self.write()?.add(id, vector, payload)
    }

    pub fn add_batch(
        &self,
        items: Vec<BatchItem<I::Payload>>,
        options: &BatchOptions,
    ) -> Result<(), VectorError> {
        self.write()?.add_batch(items, options)
    }

    pub fn search(
        &self,
        query: &[f32],
        k: usize,
    ) -> Result<Vec<SearchResult<I::Payload>>, VectorError> {
        self.read()?.search(query, k)
    }

    pub fn remove(&self, id: NodeId) -> Result<bool, VectorError> {
        self.write()?.remove(id)
    }

    pub fn contains(&self, id: NodeId) -> Result<bool, VectorError> {
        Ok(self.read()?.contains(id))
    }

    pub fn len(&self) -> Result<usize, VectorError> {
        Ok(self.read()?.len())
    }

    pub fn stats(&self) -> Result<IndexStats, VectorError> {
        Ok(self.read()?.stats())
    }

    pub fn clear(&self) -> Result<(), VectorError> {
        self.write()?.clear()
    }
}
