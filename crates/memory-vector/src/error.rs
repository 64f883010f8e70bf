//! Vector index error types.

use thiserror::Error;

/// Errors that can occur during vector operations.
#[derive(Debug, Error)]
pub enum VectorError {
    /// Invalid construction parameters
    #[error("Configuration error: {0}")]
    Config(String),

    /// Dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Id already present in the index
    #[error("Duplicate id: {0}")]
    DuplicateId(u64),

    /// Snapshot failed structural validation
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A thread panicked while holding the index lock
    #[error("Index lock poisoned")]
    LockPoisoned,
}

impl From<memory_types::MemoryError> for VectorError {
    fn from(err: memory_types::MemoryError) -> Self {
        VectorError::Config(err.to_string())
    }
}
