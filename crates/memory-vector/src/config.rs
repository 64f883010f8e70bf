//! HNSW construction parameters.
//!
//! Defaults are tuned for quality over speed:
//! - M = 16 (connections per upper layer, 2*M on layer 0)
//! - ef_construction = 200 (build-time quality)
//! - ef_search = 64 (search-time quality)

use memory_types::{Metric, VectorSettings};
use serde::{Deserialize, Serialize};

use crate::error::VectorError;
use crate::select::NeighborSelection;

/// HNSW index configuration. Immutable once the index is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HnswConfig {
    /// Embedding dimension (must match the encoder)
    pub dimension: usize,
    /// Number of connections per upper layer (M parameter)
    pub m: usize,
    /// Build-time search depth (ef_construction)
    pub ef_construction: usize,
    /// Query-time search depth (ef_search)
    pub ef_search: usize,
    /// Distance metric
    pub metric: Metric,
    /// Seed for level assignment
    #[serde(default)]
    pub seed: Option<u64>,
    /// Neighbor selection strategy
    #[serde(default)]
    pub selection: NeighborSelection,
    /// Reconnect former neighbors of removed nodes
    #[serde(default)]
    pub repair_on_remove: bool,
}

impl Default for HnswConfig {
    fn default() -> Self {
        Self {
            dimension: 384, // all-MiniLM-L6-v2
            m: 16,
            ef_construction: 200,
            ef_search: 64,
            metric: Metric::Cosine,
            seed: None,
            selection: NeighborSelection::Simple,
            repair_on_remove: false,
        }
    }
}

impl HnswConfig {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            ..Default::default()
        }
    }

    /// Build a config from loaded settings, rejecting out-of-range values.
    pub fn from_settings(settings: &VectorSettings) -> Result<Self, VectorError> {
        settings.validate()?;

        let selection = if settings.heuristic_selection {
            NeighborSelection::Heuristic
        } else {
            NeighborSelection::Simple
        };
        let config = Self {
            dimension: settings.dimension,
            m: settings.m,
            ef_construction: settings.ef_construction,
            ef_search: settings.ef_search,
            metric: settings.metric,
            seed: settings.seed,
            selection,
            repair_on_remove: settings.repair_on_remove,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_connectivity(mut self, m: usize) -> Self {
        self.m = m;
        self
    }

    pub fn with_expansion(mut self, ef_construction: usize, ef_search: usize) -> Self {
        self.ef_construction = ef_construction;
        self.ef_search = ef_search;
        self
    }

    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_selection(mut self, selection: NeighborSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_repair_on_remove(mut self, repair: bool) -> Self {
        self.repair_on_remove = repair;
        self
    }

    /// Fail fast on parameters the index cannot work with.
    pub fn validate(&self) -> Result<(), VectorError> {
        if self.dimension == 0 {
            return Err(VectorError::Config("dimension must be > 0".to_string()));
        }
        // ln(1) = 0 would make the level multiplier infinite
        if self.m < 2 {
            return Err(VectorError::Config(format!(
                "m must be >= 2, got {}",
                self.m
            )));
        }
        if self.ef_construction == 0 {
            return Err(VectorError::Config(
                "ef_construction must be > 0".to_string(),
            ));
        }
        if self.ef_search == 0 {
            return Err(VectorError::Config("ef_search must be > 0".to_string()));
        }
        Ok(())
    }

    /// Fan-out cap on layer 0.
    pub fn m_max0(&self) -> usize {
        self.m * 2
    }

    /// Fan-out cap for a given layer.
    pub fn max_connections(&self, layer: usize) -> usize {
        if layer == 0 {
            self.m_max0()
        } else {
            self.m
        }
    }
}
