//! HNSW index: insertion, query and deletion over the layered graph.
//!
//! The index is synchronous and single-threaded. `add`/`remove` mutate
//! adjacency in place and need exclusive access; wrap the index in
//! [`SharedIndex`](crate::SharedIndex) for single-writer, multi-reader use.

use memory_types::Metric;
use tracing::{debug, info};

use crate::config::HnswConfig;
use crate::distance::raw_distance;
use crate::error::VectorError;
use crate::graph::{Graph, Node, NodeId};
use crate::index::{IndexStats, SearchResult};
use crate::level::{LevelGenerator, SeededLevelGenerator};
use crate::queue::Candidate;
use crate::search::search_layer;
use crate::select::select_neighbors;

/// Hierarchical Navigable Small World index with opaque payloads.
pub struct HnswIndex<P> {
    pub(crate) config: HnswConfig,
    pub(crate) graph: Graph<P>,
    pub(crate) levels: Box<dyn LevelGenerator>,
}

impl<P> HnswIndex<P> {
    /// Create an empty index. Levels come from a generator seeded with
    /// `config.seed` (or a random seed when unset).
    pub fn new(config: HnswConfig) -> Result<Self, VectorError> {
        let levels = SeededLevelGenerator::new(config.m, config.seed);
        Self::with_level_generator(config, levels)
    }

    /// Create an empty index with an injected level generator.
    pub fn with_level_generator(
        config: HnswConfig,
        levels: impl LevelGenerator + 'static,
    ) -> Result<Self, VectorError> {
        config.validate()?;
        Ok(Self {
            config,
            graph: Graph::new(),
            levels: Box::new(levels),
        })
    }

    pub fn config(&self) -> &HnswConfig {
        &self.config
    }

    pub fn dimension(&self) -> usize {
        self.config.dimension
    }

    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.graph.contains(id)
    }

    /// Stored vector and payload for `id`.
    pub fn get(&self, id: NodeId) -> Option<(&[f32], &P)> {
        self.graph.node(id).map(|n| (n.vector(), n.payload()))
    }

    /// Level assigned to `id` at insertion.
    pub fn level_of(&self, id: NodeId) -> Option<usize> {
        self.graph.node(id).map(|n| n.level())
    }

    /// Adjacency of `id` at `level`, if the node exists.
    pub fn neighbors(&self, id: NodeId, level: usize) -> Option<&[NodeId]> {
        self.graph.node(id).map(|n| n.neighbors(level))
    }

    pub fn entry_point(&self) -> Option<NodeId> {
        self.graph.entry_point()
    }

    pub fn max_level(&self) -> usize {
        self.graph.max_level()
    }

    pub(crate) fn check_dimension(&self, vector: &[f32]) -> Result<(), VectorError> {
        if vector.len() != self.config.dimension {
            return Err(VectorError::DimensionMismatch {
                expected: self.config.dimension,
                actual: vector.len(),
            });
        }
        Ok(())
    }

    /// Insert a vector under a caller-supplied id.
    pub fn add(&mut self, id: NodeId, vector: &[f32], payload: P) -> Result<(), VectorError> {
        self.check_dimension(vector)?;
        if self.graph.contains(id) {
            return Err(VectorError::DuplicateId(id));
        }

        let level = self.levels.random_level();
        self.insert_at_level(id, vector, payload, level);
        Ok(())
    }

    /// Link a validated, new node into the graph at a pre-drawn level.
    pub(crate) fn insert_at_level(&mut self, id: NodeId, vector: &[f32], payload: P, level: usize) {
        let Some(mut entry) = self.graph.entry_point() else {
            self.graph.insert_node(Node::new(id, vector.into(), level, payload));
            self.graph.set_entry_point(id, level);
            debug!(id = id, level = level, "Added first vector");
            return;
        };

        let metric = self.config.metric;
        let top = self.graph.max_level();

        // Greedy descent through the layers above the new node
        for layer in (level + 1..=top).rev() {
            let nearest = search_layer(&self.graph, metric, vector, entry, layer, 1);
            if let Some(nearest) = nearest.first() {
                entry = nearest.id;
            }
        }

        // Pick neighbors on every shared layer before touching the graph;
        // edges at one layer never influence the search on the next.
        let mut selections: Vec<(usize, Vec<NodeId>)> = Vec::new();
        for layer in (0..=level.min(top)).rev() {
            let candidates = search_layer(
                &self.graph,
                metric,
                vector,
                entry,
                layer,
                self.config.ef_construction,
            );
            let graph = &self.graph;
            let chosen = select_neighbors(
                self.config.selection,
                &candidates,
                self.config.max_connections(layer),
                |a, b| pair_distance(graph, metric, a, b),
            );
            if let Some(nearest) = candidates.first() {
                entry = nearest.id;
            }
            selections.push((layer, chosen));
        }

        self.graph.insert_node(Node::new(id, vector.into(), level, payload));

        for (layer, neighbors) in selections {
            for &neighbor in &neighbors {
                self.graph.connect(id, neighbor, layer);
            }
            for &neighbor in &neighbors {
                self.shrink(neighbor, layer);
            }
        }

        if level > top {
            self.graph.set_entry_point(id, level);
        }

        debug!(id = id, level = level, "Added vector");
    }

    /// Prune `id`'s adjacency at `layer` back to the layer cap, keeping the
    /// nearest by true distance. Dropped edges are removed on both sides.
    fn shrink(&mut self, id: NodeId, layer: usize) {
        let cap = self.config.max_connections(layer);
        let metric = self.config.metric;

        let dropped: Vec<NodeId> = {
            let Some(node) = self.graph.node(id) else {
                return;
            };
            let neighbors = node.neighbors(layer);
            if neighbors.len() <= cap {
                return;
            }

            let mut scored: Vec<Candidate> = neighbors
                .iter()
                .filter_map(|&n| {
                    let other = self.graph.node(n)?;
                    let dist = raw_distance(metric, node.vector(), other.vector());
                    Some(Candidate::new(n, dist))
                })
                .collect();
            scored.sort();
            scored.into_iter().skip(cap).map(|c| c.id).collect()
        };

        for other in dropped {
            self.graph.disconnect(id, other, layer);
        }
    }

    /// k nearest neighbors of `query`, nearest first, using `ef_search`.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchResult<P>>, VectorError>
    where
        P: Clone,
    {
        self.search_with_ef(query, k, self.config.ef_search)
    }

    /// k nearest neighbors of `query` with an explicit layer-0 beam width.
    /// The effective width is `max(k, ef)`.
    pub fn search_with_ef(
        &self,
        query: &[f32],
        k: usize,
        ef: usize,
    ) -> Result<Vec<SearchResult<P>>, VectorError>
    where
        P: Clone,
    {
        self.check_dimension(query)?;

        let Some(mut entry) = self.graph.entry_point() else {
            return Ok(Vec::new());
        };
        if k == 0 {
            return Ok(Vec::new());
        }

        let metric = self.config.metric;
        for layer in (1..=self.graph.max_level()).rev() {
            if let Some(nearest) = search_layer(&self.graph, metric, query, entry, layer, 1).first()
            {
                entry = nearest.id;
            }
        }

        let candidates = search_layer(&self.graph, metric, query, entry, 0, k.max(ef));

        let results: Vec<SearchResult<P>> = candidates
            .into_iter()
            .take(k)
            .filter_map(|c| {
                self.graph
                    .node(c.id)
                    .map(|node| SearchResult::new(c.id, c.distance, node.payload().clone()))
            })
            .collect();

        debug!(k = k, found = results.len(), "Search complete");
        Ok(results)
    }

    /// Remove `id`. Returns `false` when the id is unknown.
    ///
    /// Neighbors are unlinked but not reconnected unless `repair_on_remove`
    /// is set, so heavy churn can degrade recall.
    pub fn remove(&mut self, id: NodeId) -> bool {
        let Some(removed) = self.graph.remove_node(id) else {
            return false;
        };

        if self.config.repair_on_remove {
            self.repair(&removed);
        }

        debug!(id = id, "Removed vector");
        true
    }

    /// Offer each former neighbor of a removed node the node's other
    /// neighbors at the same layer, nearest first, while both sides have room.
    fn repair(&mut self, removed: &Node<P>) {
        let metric = self.config.metric;

        for (layer, former) in removed.connections.iter().enumerate() {
            let cap = self.config.max_connections(layer);

            for &a in former {
                let mut options: Vec<Candidate> = {
                    let Some(node_a) = self.graph.node(a) else {
                        continue;
                    };
                    former
                        .iter()
                        .filter(|&&b| b != a && !node_a.neighbors(layer).contains(&b))
                        .filter_map(|&b| {
                            let node_b = self.graph.node(b)?;
                            let dist = raw_distance(metric, node_a.vector(), node_b.vector());
                            Some(Candidate::new(b, dist))
                        })
                        .collect()
                };
                options.sort();

                for option in options {
                    if self.graph.neighbors(a, layer).len() >= cap {
                        break;
                    }
                    if self.graph.neighbors(option.id, layer).len() < cap {
                        self.graph.connect(a, option.id, layer);
                    }
                }
            }
        }
    }

    /// Reset to the empty-index state.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.levels.reset();
        info!("Cleared vector index");
    }

    pub fn stats(&self) -> IndexStats {
        let node_count = self.graph.len();
        let avg_connections = if node_count == 0 {
            0.0
        } else {
            self.graph.total_connections() as f64 / node_count as f64
        };

        IndexStats {
            node_count,
            dimension: self.config.dimension,
            max_level: self.graph.max_level(),
            entry_point: self.graph.entry_point(),
            avg_connections,
        }
    }
}

fn pair_distance<P>(graph: &Graph<P>, metric: Metric, a: NodeId, b: NodeId) -> f32 {
    match (graph.node(a), graph.node(b)) {
        (Some(x), Some(y)) => raw_distance(metric, x.vector(), y.vector()),
        _ => f32::MAX,
    }
}
