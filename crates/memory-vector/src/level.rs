//! Level assignment for newly inserted nodes.
//!
//! Uses the formula floor(-ln(uniform(0,1)) * m_L) with m_L = 1/ln(M),
//! which gives an exponential distribution where the probability of
//! reaching layer L is roughly 1/M^L.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Highest level any node may be assigned.
pub const MAX_LEVEL: usize = 16;

/// Source of node levels.
///
/// Injected into the index so tests can pin the exact layer structure.
pub trait LevelGenerator: Send + Sync {
    /// Draw the level for the next inserted node, in `0..=MAX_LEVEL`.
    fn random_level(&mut self) -> usize;

    /// Return to the initial state. Called when the index is cleared.
    fn reset(&mut self) {}
}

/// Seeded exponential level generator.
pub struct SeededLevelGenerator {
    rng: StdRng,
    seed: u64,
    level_mult: f64,
}

impl SeededLevelGenerator {
    /// Create a generator for connectivity `m`. Without a seed a random one
    /// is drawn once, so `reset` still replays the same sequence.
    pub fn new(m: usize, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(rand::random);
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
            level_mult: 1.0 / (m as f64).ln(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl LevelGenerator for SeededLevelGenerator {
    fn random_level(&mut self) -> usize {
        // random() is in [0, 1); flip it to (0, 1] to avoid ln(0)
        let uniform = 1.0 - self.rng.random::<f64>();
        let level = (-uniform.ln() * self.level_mult).floor();
        (level as usize).min(MAX_LEVEL)
    }

    fn reset(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
    }
}

/// Replays a fixed sequence of levels, then yields level 0.
#[derive(Debug, Clone, Default)]
pub struct FixedLevels {
    initial: Vec<usize>,
    remaining: VecDeque<usize>,
}

impl FixedLevels {
    pub fn new(levels: impl IntoIterator<Item = usize>) -> Self {
        let initial: Vec<usize> = levels.into_iter().collect();
        Self {
            remaining: initial.iter().copied().collect(),
            initial,
        }
    }
}

impl LevelGenerator for FixedLevels {
    fn random_level(&mut self) -> usize {
        self.remaining.pop_front().unwrap_or(0).min(MAX_LEVEL)
    }

    fn reset(&mut self) {
        self.remaining = self.initial.iter().copied().collect();
    }
}
