//! # memory-vector
//!
//! Vector index for Agent Memory using the HNSW algorithm.
//!
//! Stores embedding vectors with opaque payloads and answers k-nearest
//! neighbor queries by greedily traversing a multi-layer proximity graph.
//!
//! ## Features
//! - Cosine, Euclidean and dot-product distance
//! - Seeded, injectable level assignment for reproducible graphs
//! - Nearest-M or diversity-aware neighbor selection
//! - Batch insertion with up-front validation
//! - Structural snapshots (serde) that restore bit-identical search results
//!
//! Embedding generation and persistence are the caller's concern.
//!
//! ## Example
//!
//! ```
//! use memory_vector::{HnswConfig, HnswIndex, Metric};
//!
//! let config = HnswConfig::new(4).with_connectivity(4).with_metric(Metric::Euclidean);
//! let mut index = HnswIndex::new(config).unwrap();
//! index.add(1, &[1.0, 0.0, 0.0, 0.0], "first").unwrap();
//! index.add(2, &[0.0, 1.0, 0.0, 0.0], "second").unwrap();
//!
//! let results = index.search(&[1.0, 0.0, 0.0, 0.0], 1).unwrap();
//! assert_eq!(results[0].id, 1);
//! assert_eq!(results[0].payload, "first");
//! ```

pub mod batch;
pub mod config;
pub mod distance;
pub mod error;
pub mod graph;
pub mod hnsw;
pub mod index;
pub mod level;
pub mod queue;
pub mod search;
pub mod select;
pub mod shared;
pub mod snapshot;

pub use batch::{BatchItem, BatchOptions};
pub use config::HnswConfig;
pub use distance::distance;
pub use error::VectorError;
pub use graph::NodeId;
pub use hnsw::HnswIndex;
pub use index::{IndexStats, SearchResult, VectorIndex};
pub use level::{FixedLevels, LevelGenerator, SeededLevelGenerator, MAX_LEVEL};
pub use memory_types::Metric;
pub use select::NeighborSelection;
pub use shared::SharedIndex;
pub use snapshot::{HnswSnapshot, NodeSnapshot};
