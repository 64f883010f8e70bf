//! Neighbor selection: which candidates become permanent edges.

use serde::{Deserialize, Serialize};

use crate::graph::NodeId;
use crate::queue::Candidate;

/// A candidate is kept by the heuristic only if it is at least this much
/// closer to the query than to every neighbor already accepted.
pub const DIVERSITY_FACTOR: f32 = 1.0;

/// Neighbor selection strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborSelection {
    /// Take the `m` nearest candidates.
    #[default]
    Simple,
    /// Diversity-aware selection: walk candidates nearest first and skip any
    /// candidate that lies closer to an accepted neighbor than to the query
    /// (scaled by `DIVERSITY_FACTOR`). Pads with the nearest skipped
    /// candidates when fewer than `m` survive.
    Heuristic,
}

/// Select up to `m` neighbor ids from `candidates`.
///
/// `pair_distance` measures the distance between two stored nodes and is only
/// consulted by the heuristic strategy.
pub fn select_neighbors<F>(
    strategy: NeighborSelection,
    candidates: &[Candidate],
    m: usize,
    pair_distance: F,
) -> Vec<NodeId>
where
    F: FnMut(NodeId, NodeId) -> f32,
{
    match strategy {
        NeighborSelection::Simple => select_simple(candidates, m),
        NeighborSelection::Heuristic => select_heuristic(candidates, m, pair_distance),
    }
}

/// Nearest `m` by distance to the query.
pub fn select_simple(candidates: &[Candidate], m: usize) -> Vec<NodeId> {
    let mut sorted = candidates.to_vec();
    sorted.sort();
    sorted.into_iter().take(m).map(|c| c.id).collect()
}

/// Diversity-aware selection with padding.
pub fn select_heuristic<F>(candidates: &[Candidate], m: usize, mut pair_distance: F) -> Vec<NodeId>
where
    F: FnMut(NodeId, NodeId) -> f32,
{
    let mut sorted = candidates.to_vec();
    sorted.sort();

    let mut selected: Vec<NodeId> = Vec::with_capacity(m);
    let mut skipped: Vec<NodeId> = Vec::new();

    for candidate in &sorted {
        if selected.len() >= m {
            break;
        }
        let diverse = selected.iter().all(|&accepted| {
            pair_distance(candidate.id, accepted) >= candidate.distance * DIVERSITY_FACTOR
        });
        if diverse {
            selected.push(candidate.id);
        } else {
            skipped.push(candidate.id);
        }
    }

    // skipped is already nearest-first
    for id in skipped {
        if selected.len() >= m {
            break;
        }
        selected.push(id);
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cands(items: &[(NodeId, f32)]) -> Vec<Candidate> {
        items.iter().map(|&(id, d)| Candidate::new(id, d)).collect()
    }

    #[test]
    fn test_simple_takes_nearest() {
        let candidates = cands(&[(1, 3.0), (2, 1.0), (3, 2.0), (4, 0.5)]);
        assert_eq!(select_simple(&candidates, 2), vec![4, 2]);
        assert_eq!(select_simple(&candidates, 10).len(), 4);
    }

    #[test]
    fn test_heuristic_rejects_clustered_candidates() {
        // Points on a line, query at 0: 1 at x=1.0, 2 at x=1.1, 3 at x=-1.2
        let positions = |id: NodeId| match id {
            1 => 1.0f32,
            2 => 1.1,
            _ => -1.2,
        };
        let candidates = cands(&[(1, 1.0), (2, 1.1), (3, 1.2)]);
        let selected = select_heuristic(&candidates, 2, |a, b| (positions(a) - positions(b)).abs());
        // 2 sits right behind 1, so the opposite-side node 3 is preferred
        assert_eq!(selected, vec![1, 3]);
    }

    #[test]
    fn test_heuristic_pads_with_skipped() {
        let candidates = cands(&[(1, 1.0), (2, 1.1), (3, 1.2)]);
        // Everything is mutually close, so only the first survives the diversity check
        let selected = select_heuristic(&candidates, 3, |_, _| 0.01);
        assert_eq!(selected, vec![1, 2, 3]);
    }

    #[test]
    fn test_dispatch() {
        let candidates = cands(&[(1, 1.0), (2, 1.1), (3, 1.2)]);
        let simple = select_neighbors(NeighborSelection::Simple, &candidates, 2, |_, _| 0.0);
        assert_eq!(simple, vec![1, 2]);
        let heuristic =
            select_neighbors(NeighborSelection::Heuristic, &candidates, 2, |_, _| 0.0);
        assert_eq!(heuristic, vec![1, 2]);
    }
}
