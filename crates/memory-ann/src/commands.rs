//! Command implementations for the ANN tool.
//!
//! Handles:
//! - bench: build a seeded random index and compare recall@k per ef_search
//! - snapshot: build a random index and export it as JSON
//! - verify: restore a JSON snapshot and check that every vector finds itself

use std::fs;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use memory_types::{Metric, Settings};
use memory_vector::{distance, BatchItem, BatchOptions, HnswConfig, HnswIndex, HnswSnapshot};

use crate::cli::IndexArgs;

/// Load configuration and install the tracing subscriber.
///
/// Precedence: defaults -> config file -> env -> CLI flags.
pub fn init(config_path: Option<&str>, log_level_override: Option<&str>) -> Result<Settings> {
    let mut settings = Settings::load(config_path).context("Failed to load configuration")?;
    if let Some(log_level) = log_level_override {
        settings.log_level = log_level.to_string();
    }

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.log_level)),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    Ok(settings)
}

/// Apply CLI overrides on top of loaded settings.
pub fn build_config(settings: &Settings, args: &IndexArgs) -> Result<HnswConfig> {
    let mut vector = settings.vector.clone();
    if let Some(dimension) = args.dimension {
        vector.dimension = dimension;
    }
    if let Some(m) = args.m {
        vector.m = m;
    }
    if let Some(ef) = args.ef_construction {
        vector.ef_construction = ef;
    }
    if let Some(metric) = args.metric {
        vector.metric = metric;
    }
    if let Some(seed) = args.seed {
        vector.seed = Some(seed);
    }

    HnswConfig::from_settings(&vector).context("Invalid index configuration")
}

/// Uniform random vectors in [-1, 1).
pub fn random_vectors(count: usize, dimension: usize, seed: u64) -> Vec<Vec<f32>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            (0..dimension)
                .map(|_| rng.random::<f32>() * 2.0 - 1.0)
                .collect()
        })
        .collect()
}

/// Exact k nearest ids by linear scan.
pub fn brute_force(metric: Metric, data: &[Vec<f32>], query: &[f32], k: usize) -> Result<Vec<u64>> {
    let mut scored: Vec<(f32, u64)> = Vec::with_capacity(data.len());
    for (i, v) in data.iter().enumerate() {
        scored.push((distance(metric, query, v)?, i as u64));
    }
    scored.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    Ok(scored.into_iter().take(k).map(|(_, id)| id).collect())
}

/// Build an index over `data` with ids 0..n and "vec-{id}" payloads.
pub fn build_index(
    config: HnswConfig,
    data: &[Vec<f32>],
    options: &BatchOptions,
) -> Result<HnswIndex<String>> {
    let mut index = HnswIndex::new(config).context("Failed to create index")?;
    let items = data
        .iter()
        .enumerate()
        .map(|(i, v)| BatchItem::new(i as u64, v.clone(), format!("vec-{}", i)))
        .collect();
    index
        .add_batch(items, options)
        .context("Failed to build index")?;
    Ok(index)
}

/// One row of benchmark output
#[derive(Debug, Clone)]
pub struct BenchRow {
    pub ef_search: usize,
    pub recall: f64,
    pub mean_latency: Duration,
}

/// Measure recall@k and mean latency for every ef value.
pub fn run_bench(
    settings: &Settings,
    args: &IndexArgs,
    count: usize,
    queries: usize,
    k: usize,
    ef_values: &[usize],
) -> Result<Vec<BenchRow>> {
    let config = build_config(settings, args)?;
    let seed = config.seed.unwrap_or(0);
    let metric = config.metric;

    let data = random_vectors(count, config.dimension, seed);
    let query_set = random_vectors(queries, config.dimension, seed.wrapping_add(1));

    info!(count = count, dimension = config.dimension, m = config.m, "Building index");
    let started = Instant::now();
    let index = build_index(config, &data, &BatchOptions::from_settings(&settings.vector))?;
    info!(elapsed_ms = started.elapsed().as_millis() as u64, "Index built");

    let truth: Vec<Vec<u64>> = query_set
        .iter()
        .map(|q| brute_force(metric, &data, q, k))
        .collect::<Result<_>>()?;

    let mut rows = Vec::with_capacity(ef_values.len());
    for &ef in ef_values {
        let mut hits = 0usize;
        let mut expected = 0usize;
        let mut elapsed = Duration::ZERO;

        for (query, exact) in query_set.iter().zip(&truth) {
            let started = Instant::now();
            let results = index.search_with_ef(query, k, ef)?;
            elapsed += started.elapsed();

            hits += results.iter().filter(|r| exact.contains(&r.id)).count();
            expected += exact.len();
        }

        let recall = if expected == 0 {
            1.0
        } else {
            hits as f64 / expected as f64
        };
        let mean_latency = if query_set.is_empty() {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(elapsed.as_secs_f64() / query_set.len() as f64)
        };
        rows.push(BenchRow {
            ef_search: ef,
            recall,
            mean_latency,
        });
    }

    Ok(rows)
}

pub fn handle_bench(
    settings: &Settings,
    args: &IndexArgs,
    count: usize,
    queries: usize,
    k: usize,
    ef_values: &[usize],
) -> Result<()> {
    let rows = run_bench(settings, args, count, queries, k, ef_values)?;

    println!("{:>10}  {:>10}  {:>12}", "ef_search", "recall@k", "latency_us");
    for row in rows {
        println!(
            "{:>10}  {:>10.4}  {:>12.1}",
            row.ef_search,
            row.recall,
            row.mean_latency.as_secs_f64() * 1e6
        );
    }
    Ok(())
}

pub fn handle_snapshot(
    settings: &Settings,
    args: &IndexArgs,
    count: usize,
    out: &str,
) -> Result<()> {
    let config = build_config(settings, args)?;
    let data = random_vectors(count, config.dimension, config.seed.unwrap_or(0));
    let index = build_index(config, &data, &BatchOptions::from_settings(&settings.vector))?;

    let json = index
        .serialize()
        .to_json()
        .context("Failed to serialize index")?;
    fs::write(out, json).with_context(|| format!("Failed to write snapshot to {}", out))?;

    let stats = index.stats();
    info!(path = out, nodes = stats.node_count, "Wrote snapshot");
    println!(
        "Wrote {} vectors (max level {}) to {}",
        stats.node_count, stats.max_level, out
    );
    Ok(())
}

/// Outcome of verifying a snapshot
#[derive(Debug, Clone)]
pub struct VerifyReport {
    pub node_count: usize,
    pub max_level: usize,
    pub avg_connections: f64,
    /// Ids whose own vector did not come back first
    pub misses: Vec<u64>,
}

pub fn verify_snapshot(input: &str) -> Result<VerifyReport> {
    let json =
        fs::read_to_string(input).with_context(|| format!("Failed to read snapshot {}", input))?;
    let snapshot: HnswSnapshot<String> =
        HnswSnapshot::from_json(&json).context("Failed to parse snapshot")?;
    let vectors: Vec<(u64, Vec<f32>)> = snapshot
        .nodes
        .iter()
        .map(|n| (n.id, n.vector.clone()))
        .collect();

    let index = HnswIndex::deserialize(snapshot).context("Snapshot failed validation")?;

    let mut misses = Vec::new();
    for (id, vector) in &vectors {
        let results = index.search(vector, 1)?;
        if results.first().map(|r| r.id) != Some(*id) {
            misses.push(*id);
        }
    }

    let stats = index.stats();
    Ok(VerifyReport {
        node_count: stats.node_count,
        max_level: stats.max_level,
        avg_connections: stats.avg_connections,
        misses,
    })
}

pub fn handle_verify(input: &str) -> Result<()> {
    let report = verify_snapshot(input)?;

    println!("Nodes:           {}", report.node_count);
    println!("Max level:       {}", report.max_level);
    println!("Avg connections: {:.2}", report.avg_connections);

    if report.misses.is_empty() {
        println!("Self-match:      ok");
        return Ok(());
    }

    warn!(misses = report.misses.len(), "Some vectors did not find themselves");
    println!(
        "Self-match:      {} of {} missed",
        report.misses.len(),
        report.node_count
    );
    bail!(
        "Snapshot verification failed: {} of {} vectors missed self-match",
        report.misses.len(),
        report.node_count
    )
}
