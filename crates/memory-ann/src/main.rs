//! Agent Memory ANN tool
//!
//! Builds HNSW vector indexes over generated data to measure recall and
//! latency, and exports or checks JSON snapshots.
//!
//! # Usage
//!
//! ```bash
//! memory-ann bench [-n COUNT] [--ef-search 16,32,64] [--metric euclidean]
//! memory-ann snapshot --out index.json [-n COUNT]
//! memory-ann verify --input index.json
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/agent-memory/config.toml)
//! 3. Environment variables (MEMORY_*)
//! 4. CLI flags

use anyhow::Result;
use clap::Parser;

use memory_ann::{handle_bench, handle_snapshot, handle_verify, init, Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = init(cli.config.as_deref(), cli.log_level.as_deref())?;

    match cli.command {
        Commands::Bench {
            count,
            queries,
            k,
            ef_search,
            index,
        } => {
            handle_bench(&settings, &index, count, queries, k, &ef_search)?;
        }
        Commands::Snapshot { count, out, index } => {
            handle_snapshot(&settings, &index, count, &out)?;
        }
        Commands::Verify { input } => {
            handle_verify(&input)?;
        }
    }

    Ok(())
}
