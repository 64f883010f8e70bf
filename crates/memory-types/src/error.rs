//! Error types for the agent-memory system.

use thiserror::Error;

/// Unified error type for memory configuration and input handling.
#[derive(Debug, Error)]
pub enum MemoryError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
