//! # memory-types
//!
//! Shared domain types for the Agent Memory vector index.
//!
//! This crate defines the pieces that both the index library and its
//! callers need to agree on:
//! - Metric: which distance function an index is built with
//! - Settings: layered configuration (defaults, config file, env vars)
//! - MemoryError: configuration and input errors
//!
//! ## Usage
//!
//! ```rust
//! use memory_types::{Metric, Settings};
//!
//! let settings = Settings::default();
//! assert_eq!(settings.vector.metric, Metric::Cosine);
//! ```

pub mod config;
pub mod error;
pub mod metric;

pub use config::{Settings, VectorSettings};
pub use error::MemoryError;
pub use metric::Metric;
