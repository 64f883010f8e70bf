//! Configuration loading for agent-memory.
//!
//! Layered config: defaults -> config file -> env vars -> CLI flags.
//! The default config file lives at ~/.config/agent-memory/config.toml.

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::MemoryError;
use crate::metric::Metric;

/// Vector index settings.
///
/// Mirrors the index construction parameters plus the batch ingestion knobs
/// used by callers of `add_batch`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorSettings {
    /// Embedding dimension (must match the encoder)
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// Max connections per node on upper layers (M). Layer 0 allows 2*M.
    #[serde(default = "default_m")]
    pub m: usize,

    /// Build-time beam width
    #[serde(default = "default_ef_construction")]
    pub ef_construction: usize,

    /// Query-time beam width
    #[serde(default = "default_ef_search")]
    pub ef_search: usize,

    /// Distance metric
    #[serde(default)]
    pub metric: Metric,

    /// Seed for level assignment. Unset means a fresh random seed per index.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Use the diversity-aware neighbor selection instead of nearest-M.
    #[serde(default)]
    pub heuristic_selection: bool,

    /// Reconnect former neighbors when a node is removed.
    #[serde(default)]
    pub repair_on_remove: bool,

    /// Items per chunk for batch insertion
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Log progress after each batch chunk
    #[serde(default)]
    pub show_progress: bool,
}

fn default_dimension() -> usize {
    384 // all-MiniLM-L6-v2
}

fn default_m() -> usize {
    16
}

fn default_ef_construction() -> usize {
    200
}

fn default_ef_search() -> usize {
    64
}

fn default_batch_size() -> usize {
    100
}

impl Default for VectorSettings {
    fn default() -> Self {
        Self {
            dimension: default_dimension(),
            m: default_m(),
            ef_construction: default_ef_construction(),
            ef_search: default_ef_search(),
            metric: Metric::default(),
            seed: None,
            heuristic_selection: false,
            repair_on_remove: false,
            batch_size: default_batch_size(),
            show_progress: false,
        }
    }
}

impl VectorSettings {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), MemoryError> {
        if self.dimension == 0 {
            return Err(MemoryError::Config("dimension must be > 0".to_string()));
        }
        if self.m < 2 {
            return Err(MemoryError::Config(format!(
                "m must be >= 2, got {}",
                self.m
            )));
        }
        if self.ef_construction == 0 || self.ef_search == 0 {
            return Err(MemoryError::Config(
                "ef_construction and ef_search must be > 0".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(MemoryError::Config("batch_size must be > 0".to_string()));
        }
        Ok(())
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Vector index configuration
    #[serde(default)]
    pub vector: VectorSettings,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            vector: VectorSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/agent-memory/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (MEMORY_LOG_LEVEL, MEMORY_VECTOR__EF_SEARCH, ...)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, MemoryError> {
        let config_dir = ProjectDirs::from("", "", "agent-memory")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            // 1. Built-in defaults
            .set_default("log_level", default_log_level())
            .map_err(|e| MemoryError::Config(e.to_string()))?
            .set_default("vector.dimension", default_dimension() as i64)
            .map_err(|e| MemoryError::Config(e.to_string()))?
            .set_default("vector.m", default_m() as i64)
            .map_err(|e| MemoryError::Config(e.to_string()))?
            .set_default("vector.ef_construction", default_ef_construction() as i64)
            .map_err(|e| MemoryError::Config(e.to_string()))?
            .set_default("vector.ef_search", default_ef_search() as i64)
            .map_err(|e| MemoryError::Config(e.to_string()))?
            .set_default("vector.metric", Metric::default().as_str())
            .map_err(|e| MemoryError::Config(e.to_string()))?
            .set_default("vector.batch_size", default_batch_size() as i64)
            .map_err(|e| MemoryError::Config(e.to_string()))?
            // 2. Default config file
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        // 3. CLI-specified config file (higher precedence than default)
        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // 4. Environment variables. Nested keys use a double underscore so
        // that field names like ef_search survive.
        builder = builder.add_source(
            Environment::with_prefix("MEMORY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| MemoryError::Config(e.to_string()))?;

        let settings: Settings = config
            .try_deserialize()
            .map_err(|e| MemoryError::Config(e.to_string()))?;
        settings.vector.validate()?;
        Ok(settings)
    }
}
