//! Memory ANN library exports.
//!
//! This crate provides the command-line tool for building, benchmarking and
//! checking Agent Memory vector indexes.
//!
//! # Modules
//!
//! - `cli`: Command-line argument parsing with clap
//! - `commands`: Command implementations (bench, snapshot, verify)

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands, IndexArgs};
pub use commands::{
    build_config, handle_bench, handle_snapshot, handle_verify, init, run_bench, verify_snapshot,
    BenchRow, VerifyReport,
};
