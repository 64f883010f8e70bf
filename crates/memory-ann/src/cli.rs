//! CLI argument parsing for the ANN tool.
//!
//! CLI flags override all other config sources.

use clap::{Parser, Subcommand};

use memory_types::Metric;

/// Agent Memory ANN tool
///
/// Benchmarks, exports and verifies HNSW vector indexes.
#[derive(Parser, Debug)]
#[command(name = "memory-ann")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/agent-memory/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Index construction overrides shared by the build commands
#[derive(clap::Args, Debug, Clone, Default)]
pub struct IndexArgs {
    /// Override embedding dimension
    #[arg(long)]
    pub dimension: Option<usize>,

    /// Override connectivity (M)
    #[arg(short, long)]
    pub m: Option<usize>,

    /// Override build-time beam width
    #[arg(long)]
    pub ef_construction: Option<usize>,

    /// Override distance metric (cosine, euclidean, dot)
    #[arg(long)]
    pub metric: Option<Metric>,

    /// Seed for level assignment and the generated dataset
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Tool commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Measure recall@k and query latency against brute force
    Bench {
        /// Number of vectors to index
        #[arg(short = 'n', long, default_value = "2000")]
        count: usize,

        /// Number of queries
        #[arg(short, long, default_value = "100")]
        queries: usize,

        /// Neighbors per query
        #[arg(short, long, default_value = "10")]
        k: usize,

        /// Comma-separated ef_search values to compare
        #[arg(long, value_delimiter = ',', default_value = "16,32,64,128")]
        ef_search: Vec<usize>,

        #[command(flatten)]
        index: IndexArgs,
    },

    /// Build a random index and write its JSON snapshot
    Snapshot {
        /// Number of vectors to index
        #[arg(short = 'n', long, default_value = "1000")]
        count: usize,

        /// Output file
        #[arg(short, long)]
        out: String,

        #[command(flatten)]
        index: IndexArgs,
    },

    /// Load a JSON snapshot, print stats and check self-match
    Verify {
        /// Snapshot file
        #[arg(short, long)]
        input: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_bench_defaults() {
        let cli = Cli::parse_from(["memory-ann", "bench"]);
        match cli.command {
            Commands::Bench {
                count,
                queries,
                k,
                ef_search,
                index,
            } => {
                assert_eq!(count, 2000);
                assert_eq!(queries, 100);
                assert_eq!(k, 10);
                assert_eq!(ef_search, vec![16, 32, 64, 128]);
                assert!(index.dimension.is_none());
            }
            _ => panic!("Expected Bench command"),
        }
    }

    #[test]
    fn test_cli_bench_overrides() {
        let cli = Cli::parse_from([
            "memory-ann",
            "bench",
            "-n",
            "500",
            "--ef-search",
            "8,200",
            "--dimension",
            "32",
            "--metric",
            "euclidean",
            "--seed",
            "7",
        ]);
        match cli.command {
            Commands::Bench {
                count,
                ef_search,
                index,
                ..
            } => {
                assert_eq!(count, 500);
                assert_eq!(ef_search, vec![8, 200]);
                assert_eq!(index.dimension, Some(32));
                assert_eq!(index.metric, Some(Metric::Euclidean));
                assert_eq!(index.seed, Some(7));
            }
            _ => panic!("Expected Bench command"),
        }
    }

    #[test]
    fn test_cli_snapshot() {
        let cli = Cli::parse_from(["memory-ann", "snapshot", "--out", "/tmp/index.json"]);
        match cli.command {
            Commands::Snapshot { count, out, .. } => {
                assert_eq!(count, 1000);
                assert_eq!(out, "/tmp/index.json");
            }
            _ => panic!("Expected Snapshot command"),
        }
    }

    #[test]
    fn test_cli_verify_with_global_flags() {
        let cli = Cli::parse_from([
            "memory-ann",
            "verify",
            "--input",
            "index.json",
            "--log-level",
            "debug",
            "--config",
            "custom.toml",
        ]);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert_eq!(cli.config.as_deref(), Some("custom.toml"));
        match cli.command {
            Commands::Verify { input } => assert_eq!(input, "index.json"),
            _ => panic!("Expected Verify command"),
        }
    }
}
