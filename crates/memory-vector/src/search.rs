//! Best-first search over a single graph layer.
//!
//! Shared by insertion (ef = ef_construction, or 1 for the greedy descent)
//! and queries (ef = 1 on upper layers, max(k, ef_search) on layer 0).

use std::collections::HashSet;

use memory_types::Metric;

use crate::distance::raw_distance;
use crate::graph::{Graph, NodeId};
use crate::queue::{Candidate, MaxQueue, MinQueue};

/// Search one layer starting from `entry`.
///
/// Returns at most `ef` candidates sorted nearest first. Every node is
/// visited at most once. An entry missing from the graph yields no results;
/// an entry below `level` simply has no neighbors there.
pub fn search_layer<P>(
    graph: &Graph<P>,
    metric: Metric,
    query: &[f32],
    entry: NodeId,
    level: usize,
    ef: usize,
) -> Vec<Candidate> {
    let Some(entry_node) = graph.node(entry) else {
        return Vec::new();
    };

    let mut candidates = MinQueue::new();
    let mut results = MaxQueue::with_capacity(ef);
    let mut visited: HashSet<NodeId> = HashSet::new();

    let start = Candidate::new(entry, raw_distance(metric, query, entry_node.vector()));
    candidates.push(start);
    results.push(start);
    visited.insert(entry);

    while let Some(current) = candidates.pop() {
        // Nothing left in the frontier can improve a full result set
        if results.is_full() {
            if let Some(worst) = results.peek_distance() {
                if current.distance > worst {
                    break;
                }
            }
        }

        for &neighbor_id in graph.neighbors(current.id, level) {
            if !visited.insert(neighbor_id) {
                continue;
            }
            let Some(neighbor) = graph.node(neighbor_id) else {
                continue;
            };

            let dist = raw_distance(metric, query, neighbor.vector());
            let improves = !results.is_full()
                || results.peek_distance().map(|w| dist < w).unwrap_or(true);

            if improves {
                let candidate = Candidate::new(neighbor_id, dist);
                candidates.push(candidate);
                results.push(candidate);
            }
        }
    }

    results.into_sorted_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Node;

    /// Points on a line, chained 0-1-2-...-n at layer 0.
    fn line_graph(n: u64) -> Graph<()> {
        let mut graph = Graph::new();
        for id in 0..n {
            graph.insert_node(Node::new(id, vec![id as f32].into_boxed_slice(), 0, ()));
        }
        for id in 1..n {
            graph.connect(id - 1, id, 0);
        }
        graph.set_entry_point(0, 0);
        graph
    }

    #[test]
    fn test_walks_to_nearest() {
        let graph = line_graph(10);
        let results = search_layer(&graph, Metric::Euclidean, &[7.2], 0, 0, 1);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, 7);
    }

    #[test]
    fn test_returns_sorted_and_bounded() {
        let graph = line_graph(10);
        let results = search_layer(&graph, Metric::Euclidean, &[4.0], 0, 0, 3);
        let ids: Vec<NodeId> = results.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![4, 3, 5]);
        for pair in results.windows(2) {
            assert!(pair[0].distance <= pair[1].distance);
        }
    }

    #[test]
    fn test_ef_larger_than_graph() {
        let graph = line_graph(4);
        let results = search_layer(&graph, Metric::Euclidean, &[0.0], 3, 0, 50);
        assert_eq!(results.len(), 4);
        assert_eq!(results[0].id, 0);
    }

    #[test]
    fn test_level_without_edges_returns_entry() {
        let graph = line_graph(5);
        let results = search_layer(&graph, Metric::Euclidean, &[4.0], 0, 3, 5);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, 0);
    }

    #[test]
    fn test_unknown_entry() {
        let graph = line_graph(3);
        assert!(search_layer(&graph, Metric::Euclidean, &[1.0], 99, 0, 5).is_empty());
    }
}
