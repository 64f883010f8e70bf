//! Snapshot E2E tests for agent-memory.
//!
//! Exports an index to a JSON file, restores it, and checks that structure
//! and search results survive unchanged.

use pretty_assertions::assert_eq;

use e2e_tests::TestHarness;
use memory_vector::{HnswConfig, HnswIndex, HnswSnapshot, Metric, VectorError};

fn config() -> HnswConfig {
    HnswConfig::new(10)
        .with_connectivity(8)
        .with_expansion(100, 40)
        .with_metric(Metric::Cosine)
        .with_seed(2024)
}

/// File round trip restores an index that answers identically.
#[test]
fn test_snapshot_file_round_trip() {
    let harness = TestHarness::new(300, 25, 10, Metric::Cosine, 8);
    let index = harness.build_index(config());
    let path = harness.path("index.json");

    // 1. Export
    let json = index.serialize().to_json().unwrap();
    std::fs::write(&path, &json).unwrap();

    // 2. Restore
    let loaded = std::fs::read_to_string(&path).unwrap();
    let snapshot: HnswSnapshot<String> = HnswSnapshot::from_json(&loaded).unwrap();
    let restored = HnswIndex::deserialize(snapshot).unwrap();

    // 3. Same structure
    assert_eq!(restored.len(), index.len());
    assert_eq!(restored.entry_point(), index.entry_point());
    assert_eq!(restored.max_level(), index.max_level());
    assert_eq!(restored.stats(), index.stats());
    assert_eq!(restored.config(), index.config());

    // 4. Same answers
    for query in &harness.queries {
        assert_eq!(restored.search(query, 10).unwrap(), index.search(query, 10).unwrap());
    }
}

/// The JSON carries config, entry point and per-node adjacency.
#[test]
fn test_snapshot_json_shape() {
    let harness = TestHarness::new(20, 0, 10, Metric::Cosine, 8);
    let index = harness.build_index(config());

    let value: serde_json::Value =
        serde_json::from_str(&index.serialize().to_json().unwrap()).unwrap();

    assert_eq!(value["config"]["dimension"], 10);
    assert_eq!(value["config"]["metric"], "cosine");
    assert_eq!(value["nodes"].as_array().unwrap().len(), 20);
    assert_eq!(value["entry_point"], index.entry_point().unwrap());

    let first = &value["nodes"][0];
    assert_eq!(first["id"], 0);
    assert_eq!(first["payload"], "doc-0");
    assert_eq!(
        first["connections"].as_array().unwrap().len(),
        first["level"].as_u64().unwrap() as usize + 1
    );
}

/// Same seed and insertion order give the same graph.
#[test]
fn test_seeded_builds_are_identical() {
    let harness = TestHarness::new(200, 0, 10, Metric::Cosine, 31);

    let first = harness.build_index(config()).serialize();
    let second = harness.build_index(config()).serialize();

    assert_eq!(first, second);
}

/// A restored index keeps accepting inserts.
#[test]
fn test_restored_index_accepts_inserts() {
    let harness = TestHarness::new(100, 0, 10, Metric::Cosine, 12);
    let index = harness.build_index(config());
    let mut restored = HnswIndex::deserialize(index.serialize()).unwrap();

    let vector = vec![0.5f32; 10];
    restored.add(1000, &vector, "late".to_string()).unwrap();

    assert_eq!(restored.len(), 101);
    assert_eq!(restored.search(&vector, 1).unwrap()[0].id, 1000);
    assert!(matches!(
        restored.add(1000, &vector, "dup".to_string()),
        Err(VectorError::DuplicateId(1000))
    ));
}

/// Corrupt JSON and structurally broken snapshots are both rejected.
#[test]
fn test_rejects_broken_snapshots() {
    assert!(matches!(
        HnswSnapshot::<String>::from_json("{not json"),
        Err(VectorError::Serialization(_))
    ));

    let harness = TestHarness::new(30, 0, 10, Metric::Cosine, 4);
    let mut snapshot = harness.build_index(config()).serialize();
    snapshot.nodes[5].connections.push(Vec::new());
    assert!(matches!(
        HnswIndex::deserialize(snapshot),
        Err(VectorError::InvalidSnapshot(_))
    ));
}
