//! Structural export and import of the whole graph.
//!
//! A snapshot carries the config, entry point, max level and every node with
//! its vector, level, per-level adjacency and payload. Restoring it yields an
//! index with identical structure, so searches return identical results.
//! Where the snapshot is stored is up to the caller.

use std::collections::{HashMap, HashSet};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::HnswConfig;
use crate::error::VectorError;
use crate::graph::{Graph, Node, NodeId};
use crate::hnsw::HnswIndex;
use crate::level::{SeededLevelGenerator, MAX_LEVEL};

/// One node of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot<P> {
    pub id: NodeId,
    pub vector: Vec<f32>,
    pub level: usize,
    /// Neighbor ids for levels `0..=level`
    pub connections: Vec<Vec<NodeId>>,
    pub payload: P,
}

/// Snapshot of a whole index. Nodes are ordered by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HnswSnapshot<P> {
    pub config: HnswConfig,
    pub entry_point: Option<NodeId>,
    pub max_level: usize,
    pub nodes: Vec<NodeSnapshot<P>>,
}

impl<P: Serialize> HnswSnapshot<P> {
    pub fn to_json(&self) -> Result<String, VectorError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, VectorError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl<P: DeserializeOwned> HnswSnapshot<P> {
    pub fn from_json(json: &str) -> Result<Self, VectorError> {
        Ok(serde_json::from_str(json)?)
    }
}

fn invalid(msg: impl Into<String>) -> VectorError {
    VectorError::InvalidSnapshot(msg.into())
}

impl<P: Clone> HnswIndex<P> {
    /// Export the index structure.
    pub fn serialize(&self) -> HnswSnapshot<P> {
        let mut nodes: Vec<NodeSnapshot<P>> = self
            .graph
            .nodes()
            .map(|node| NodeSnapshot {
                id: node.id(),
                vector: node.vector().to_vec(),
                level: node.level(),
                connections: node.connections.clone(),
                payload: node.payload().clone(),
            })
            .collect();
        nodes.sort_by_key(|n| n.id);

        HnswSnapshot {
            config: self.config.clone(),
            entry_point: self.graph.entry_point(),
            max_level: self.graph.max_level(),
            nodes,
        }
    }
}

impl<P> HnswIndex<P> {
    /// Rebuild an index from a snapshot after validating its structure.
    ///
    /// The level generator is reseeded from `config.seed`; it does not resume
    /// the sequence of the exported index.
    pub fn deserialize(snapshot: HnswSnapshot<P>) -> Result<Self, VectorError> {
        let HnswSnapshot {
            config,
            entry_point,
            max_level,
            nodes,
        } = snapshot;
        config.validate()?;

        let mut levels_by_id = HashMap::with_capacity(nodes.len());
        for node in &nodes {
            if node.vector.len() != config.dimension {
                return Err(invalid(format!(
                    "node {} has dimension {}, expected {}",
                    node.id,
                    node.vector.len(),
                    config.dimension
                )));
            }
            if node.level > MAX_LEVEL {
                return Err(invalid(format!(
                    "node {} has level {} above {}",
                    node.id, node.level, MAX_LEVEL
                )));
            }
            if node.connections.len() != node.level + 1 {
                return Err(invalid(format!(
                    "node {} has {} adjacency levels for level {}",
                    node.id,
                    node.connections.len(),
                    node.level
                )));
            }
            if levels_by_id.insert(node.id, node.level).is_some() {
                return Err(invalid(format!("duplicate node {}", node.id)));
            }
        }

        let position: HashMap<NodeId, usize> =
            nodes.iter().enumerate().map(|(i, n)| (n.id, i)).collect();

        for node in &nodes {
            for (level, neighbors) in node.connections.iter().enumerate() {
                let cap = config.max_connections(level);
                if neighbors.len() > cap {
                    return Err(invalid(format!(
                        "node {} has {} neighbors at level {}, cap is {}",
                        node.id,
                        neighbors.len(),
                        level,
                        cap
                    )));
                }

                let mut unique: HashSet<NodeId> = HashSet::with_capacity(neighbors.len());
                for &neighbor in neighbors {
                    let Some(&at) = position.get(&neighbor) else {
                        return Err(invalid(format!(
                            "node {} links unknown node {}",
                            node.id, neighbor
                        )));
                    };
                    let other = &nodes[at];
                    if other.level < level {
                        return Err(invalid(format!(
                            "node {} links {} at level {} above its level",
                            node.id, neighbor, level
                        )));
                    }
                    if neighbor == node.id || !unique.insert(neighbor) {
                        return Err(invalid(format!(
                            "node {} has a self or repeated edge at level {}",
                            node.id, level
                        )));
                    }
                    if !other.connections[level].contains(&node.id) {
                        return Err(invalid(format!(
                            "node {} links {} at level {} but not the reverse",
                            node.id, neighbor, level
                        )));
                    }
                }
            }
        }

        let top = nodes.iter().map(|n| n.level).max();
        match (entry_point, top) {
            (None, None) if max_level == 0 => {}
            (Some(ep), Some(top)) if max_level == top && levels_by_id.get(&ep) == Some(&top) => {}
            _ => {
                return Err(invalid(format!(
                    "entry point {:?} at max level {} does not match the node table",
                    entry_point, max_level
                )))
            }
        }

        let mut graph = Graph::new();
        let count = nodes.len();
        for node in nodes {
            graph.insert_node(Node::from_parts(
                node.id,
                node.vector.into_boxed_slice(),
                node.connections,
                node.payload,
            ));
        }
        if let Some(ep) = entry_point {
            graph.set_entry_point(ep, max_level);
        }

        let levels = SeededLevelGenerator::new(config.m, config.seed);
        info!(nodes = count, max_level = max_level, "Restored vector index from snapshot");

        Ok(Self {
            config,
            graph,
            levels: Box::new(levels),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::FixedLevels;
    use memory_types::Metric;

    fn build() -> HnswIndex<String> {
        let config = HnswConfig::new(2)
            .with_connectivity(3)
            .with_metric(Metric::Euclidean)
            .with_seed(21);
        let mut index = HnswIndex::new(config).unwrap();
        for i in 0..40u64 {
            let v = [(i % 7) as f32, (i / 7) as f32];
            index.add(i, &v, format!("entry-{}", i)).unwrap();
        }
        index
    }

    #[test]
    fn test_round_trip_structure() {
        let index = build();
        let snapshot = index.serialize();
        assert_eq!(snapshot.nodes.len(), 40);
        assert!(snapshot.nodes.windows(2).all(|w| w[0].id < w[1].id));

        let restored = HnswIndex::deserialize(snapshot.clone()).unwrap();
        assert_eq!(restored.serialize(), snapshot);
        assert_eq!(restored.entry_point(), index.entry_point());
        assert_eq!(restored.max_level(), index.max_level());
    }

    #[test]
    fn test_round_trip_search_identical() {
        let index = build();
        let restored = HnswIndex::deserialize(index.serialize()).unwrap();
        for q in [[0.0, 0.0], [3.3, 2.1], [6.0, 5.0], [-1.0, 9.0]] {
            assert_eq!(index.search(&q, 5).unwrap(), restored.search(&q, 5).unwrap());
        }
    }

    #[test]
    fn test_json_round_trip() {
        let index = build();
        let json = index.serialize().to_json().unwrap();
        let snapshot: HnswSnapshot<String> = HnswSnapshot::from_json(&json).unwrap();
        let restored = HnswIndex::deserialize(snapshot).unwrap();
        assert_eq!(restored.serialize(), index.serialize());
    }

    #[test]
    fn test_empty_round_trip() {
        let index: HnswIndex<()> = HnswIndex::new(HnswConfig::new(3)).unwrap();
        let restored = HnswIndex::deserialize(index.serialize()).unwrap();
        assert!(restored.is_empty());
        assert_eq!(restored.entry_point(), None);
    }

    #[test]
    fn test_rejects_dangling_neighbor() {
        let mut snapshot = build().serialize();
        snapshot.nodes[0].connections[0].push(999);
        assert!(matches!(
            HnswIndex::deserialize(snapshot),
            Err(VectorError::InvalidSnapshot(_))
        ));
    }

    #[test]
    fn test_rejects_one_way_edge() {
        let config = HnswConfig::new(2).with_metric(Metric::Euclidean);
        let mut index =
            HnswIndex::with_level_generator(config, FixedLevels::new([0, 0, 0])).unwrap();
        for i in 0..3u64 {
            index.add(i, &[i as f32, 0.0], format!("entry-{}", i)).unwrap();
        }
        let mut snapshot = index.serialize();
        assert!(snapshot.nodes[0].connections[0].contains(&2));

        // Keep 0 -> 2 but drop 2 -> 0
        snapshot.nodes[2].connections[0].retain(|&n| n != 0);
        assert!(matches!(
            HnswIndex::deserialize(snapshot),
            Err(VectorError::InvalidSnapshot(msg)) if msg.contains("reverse")
        ));
    }

    #[test]
    fn test_restored_graph_survives_remove() {
        let mut restored = HnswIndex::deserialize(build().serialize()).unwrap();
        for id in [0u64, 7, 13, 39] {
            assert!(restored.remove(id));
        }
        let again = HnswIndex::deserialize(restored.serialize()).unwrap();
        assert_eq!(again.len(), 36);
    }

    #[test]
    fn test_rejects_over_cap_adjacency() {
        let config = HnswConfig::new(2)
            .with_connectivity(2)
            .with_metric(Metric::Euclidean);
        let mut index =
            HnswIndex::with_level_generator(config, FixedLevels::new([0; 10])).unwrap();
        for i in 0..10u64 {
            index.add(i, &[i as f32, 0.0], format!("entry-{}", i)).unwrap();
        }
        let mut snapshot = index.serialize();

        // Fully connect layer 0: 9 edges per node against a cap of 4
        for node in &mut snapshot.nodes {
            node.connections[0] = (0..10u64).filter(|&n| n != node.id).collect();
        }
        assert!(matches!(
            HnswIndex::deserialize(snapshot),
            Err(VectorError::InvalidSnapshot(msg)) if msg.contains("cap")
        ));
    }

    #[test]
    fn test_rejects_wrong_dimension() {
        let mut snapshot = build().serialize();
        snapshot.nodes[3].vector.push(1.0);
        assert!(matches!(
            HnswIndex::deserialize(snapshot),
            Err(VectorError::InvalidSnapshot(_))
        ));
    }

    #[test]
    fn test_rejects_bad_entry_point() {
        let mut snapshot = build().serialize();
        snapshot.max_level += 1;
        assert!(matches!(
            HnswIndex::deserialize(snapshot),
            Err(VectorError::InvalidSnapshot(_))
        ));
    }
}
