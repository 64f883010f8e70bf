//! Concrete search scenario E2E tests for agent-memory.
//!
//! Small hand-built indexes whose exact results are known, plus the input
//! guards every public operation applies.

use pretty_assertions::assert_eq;

use memory_vector::{
    FixedLevels, HnswConfig, HnswIndex, Metric, SearchResult, VectorError, VectorIndex,
};

fn basis_index() -> HnswIndex<&'static str> {
    let config = HnswConfig::new(4)
        .with_connectivity(4)
        .with_metric(Metric::Euclidean)
        .with_seed(1);
    let mut index = HnswIndex::new(config).unwrap();
    index.add(1, &[1.0, 0.0, 0.0, 0.0], "x").unwrap();
    index.add(2, &[0.0, 1.0, 0.0, 0.0], "y").unwrap();
    index.add(3, &[0.0, 0.0, 1.0, 0.0], "z").unwrap();
    index.add(4, &[0.0, 0.0, 0.0, 1.0], "w").unwrap();
    index.add(5, &[1.0, 1.0, 0.0, 0.0], "xy").unwrap();
    index
}

// ===== Exact Scenarios =====

/// Exact match for a stored basis vector comes back alone at distance 0.
#[test]
fn test_exact_match_single_result() {
    let index = basis_index();

    let results = index.search(&[1.0, 0.0, 0.0, 0.0], 1).unwrap();

    assert_eq!(results, vec![SearchResult::new(1, 0.0, "x")]);
}

/// Top-3 for [1,1,0,0]: itself first, then the two basis vectors at distance 1.
#[test]
fn test_top_three_ordered_by_distance() {
    let index = basis_index();

    let results = index.search(&[1.0, 1.0, 0.0, 0.0], 3).unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].id, 5);
    assert_eq!(results[0].distance, 0.0);
    assert!(results.windows(2).all(|w| w[0].distance <= w[1].distance));

    let ids: Vec<u64> = results.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![5, 1, 2]);
    assert!((results[1].distance - 1.0).abs() < 1e-6);
    assert!((results[2].distance - 1.0).abs() < 1e-6);
}

/// Searching an empty index is not an error.
#[test]
fn test_empty_index_returns_nothing() {
    let index: HnswIndex<()> = HnswIndex::new(HnswConfig::new(4)).unwrap();

    let results = index.search(&[0.5, 0.5, 0.5, 0.5], 5).unwrap();

    assert!(results.is_empty());
}

/// Asking for more results than stored returns every vector once.
#[test]
fn test_k_larger_than_index() {
    let index = basis_index();

    let results = index.search(&[0.0, 0.0, 0.0, 0.0], 50).unwrap();

    let mut ids: Vec<u64> = results.iter().map(|r| r.id).collect();
    ids.sort();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
}

/// Forced levels put the tallest node at the entry point.
#[test]
fn test_injected_levels_choose_entry_point() {
    let config = HnswConfig::new(2).with_metric(Metric::Euclidean);
    let mut index =
        HnswIndex::with_level_generator(config, FixedLevels::new([0, 2, 1, 0])).unwrap();
    for id in 0..4u64 {
        index.add(id, &[id as f32, 0.0], ()).unwrap();
    }

    assert_eq!(index.entry_point(), Some(1));
    assert_eq!(index.max_level(), 2);
    assert_eq!(index.level_of(2), Some(1));

    let results = index.search(&[2.9, 0.0], 1).unwrap();
    assert_eq!(results[0].id, 3);
}

// ===== Input Guards =====

/// Wrong-length vectors are rejected on add and search, for every metric.
#[test]
fn test_dimension_guard() {
    for metric in [Metric::Cosine, Metric::Euclidean, Metric::Dot] {
        let mut index: HnswIndex<()> =
            HnswIndex::new(HnswConfig::new(3).with_metric(metric)).unwrap();
        index.add(1, &[1.0, 0.0, 0.0], ()).unwrap();

        let add = index.add(2, &[1.0, 0.0], ());
        assert!(matches!(
            add,
            Err(VectorError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        ));

        let search = index.search(&[1.0, 0.0, 0.0, 0.0], 1);
        assert!(matches!(
            search,
            Err(VectorError::DimensionMismatch {
                expected: 3,
                actual: 4
            })
        ));
        assert_eq!(index.len(), 1);
    }
}

/// A reused id is rejected and leaves the stored vector alone.
#[test]
fn test_duplicate_id_rejected() {
    let mut index = basis_index();

    let result = index.add(3, &[9.0, 9.0, 9.0, 9.0], "again");

    assert!(matches!(result, Err(VectorError::DuplicateId(3))));
    assert_eq!(index.len(), 5);
    let (vector, payload) = index.get(3).unwrap();
    assert_eq!(vector.to_vec(), vec![0.0f32, 0.0, 1.0, 0.0]);
    assert_eq!(*payload, "z");
}

/// Invalid construction parameters fail at creation time.
#[test]
fn test_invalid_config_rejected() {
    assert!(matches!(
        HnswIndex::<()>::new(HnswConfig::new(0)),
        Err(VectorError::Config(_))
    ));
    assert!(matches!(
        HnswIndex::<()>::new(HnswConfig::new(4).with_connectivity(1)),
        Err(VectorError::Config(_))
    ));
}

/// The trait surface reports the same state as the concrete index.
#[test]
fn test_trait_object_surface() {
    let mut index = basis_index();
    {
        let dyn_index: &mut dyn VectorIndex<Payload = &'static str> = &mut index;
        assert!(dyn_index.contains(5));
        assert!(dyn_index.remove(5).unwrap());
        assert!(!dyn_index.remove(5).unwrap());
        assert_eq!(dyn_index.stats().node_count, 4);
    }
    assert!(!index.contains(5));
}
