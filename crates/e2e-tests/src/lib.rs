//! End-to-end test infrastructure for the agent-memory vector index.
//!
//! Provides a shared TestHarness with a seeded dataset, plus exact
//! nearest-neighbor helpers used to score recall.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use memory_types::Metric;
use memory_vector::{distance, BatchItem, BatchOptions, HnswConfig, HnswIndex};

/// Shared test harness for E2E tests.
///
/// Holds a reproducible dataset and query set for one metric.
pub struct TestHarness {
    /// Keeps temp dir alive for the lifetime of the harness
    pub _temp_dir: tempfile::TempDir,
    /// Indexed vectors; the id of `data[i]` is `i`
    pub data: Vec<Vec<f32>>,
    /// Query vectors drawn from the same distribution
    pub queries: Vec<Vec<f32>>,
    pub metric: Metric,
}

impl TestHarness {
    /// Create a harness with `count` vectors and `queries` queries of `dimension`.
    pub fn new(count: usize, queries: usize, dimension: usize, metric: Metric, seed: u64) -> Self {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        Self {
            _temp_dir: temp_dir,
            data: random_vectors(count, dimension, seed),
            queries: random_vectors(queries, dimension, seed.wrapping_add(1)),
            metric,
        }
    }

    /// Path inside the harness temp dir.
    pub fn path(&self, name: &str) -> String {
        self._temp_dir.path().join(name).to_string_lossy().to_string()
    }

    /// Build an index over the harness data with "doc-{id}" payloads.
    pub fn build_index(&self, config: HnswConfig) -> HnswIndex<String> {
        let mut index = HnswIndex::new(config).expect("Failed to create index");
        let items = self
            .data
            .iter()
            .enumerate()
            .map(|(i, v)| BatchItem::new(i as u64, v.clone(), format!("doc-{}", i)))
            .collect();
        index
            .add_batch(items, &BatchOptions::default())
            .expect("Failed to build index");
        index
    }

    /// Exact top-k ids for every query.
    pub fn ground_truth(&self, k: usize) -> Vec<Vec<u64>> {
        self.queries
            .iter()
            .map(|q| brute_force_knn(self.metric, &self.data, q, k))
            .collect()
    }

    /// Mean recall@k of `index` over the query set at layer-0 width `ef`.
    pub fn recall(
        &self,
        index: &HnswIndex<String>,
        truth: &[Vec<u64>],
        k: usize,
        ef: usize,
    ) -> f64 {
        let found: Vec<Vec<u64>> = self
            .queries
            .iter()
            .map(|q| {
                index
                    .search_with_ef(q, k, ef)
                    .expect("Search failed")
                    .into_iter()
                    .map(|r| r.id)
                    .collect()
            })
            .collect();
        recall_at_k(&found, truth)
    }
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

/// Exact k nearest ids by linear scan, ties broken by id.
pub fn brute_force_knn(metric: Metric, data: &[Vec<f32>], query: &[f32], k: usize) -> Vec<u64> {
    let mut scored: Vec<(f32, u64)> = data
        .iter()
        .enumerate()
        .map(|(i, v)| (distance(metric, query, v).expect("Dimension mismatch"), i as u64))
        .collect();
    scored.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    scored.into_iter().take(k).map(|(_, id)| id).collect()
}

/// Fraction of true neighbors found, pooled over all queries.
pub fn recall_at_k(found: &[Vec<u64>], truth: &[Vec<u64>]) -> f64 {
    let mut hits = 0usize;
    let mut expected = 0usize;
    for (f, t) in found.iter().zip(truth) {
        hits += f.iter().filter(|id| t.contains(id)).count();
        expected += t.len();
    }
    if expected == 0 {
        1.0
    } else {
        hits as f64 / expected as f64
    }
}
