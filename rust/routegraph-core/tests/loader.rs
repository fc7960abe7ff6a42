//! Integration tests for `routegraph_core::loader` against the bundled
//! six-airport fixtures.

use std::fs;
use std::path::{Path, PathBuf};

use ordered_float::OrderedFloat;
use routegraph_core::{Airport, LoadError, Loader, Weighting};

// ===========================================================================
// Helpers
// ===========================================================================

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn times() -> PathBuf {
    fixture("airportsTime.gv")
}

fn costs() -> PathBuf {
    fixture("airports.gv")
}

fn airports() -> [Airport; 6] {
    [
        Airport::new("Denver International Airport"),
        Airport::new("Dallas Fort/Worth"),
        Airport::new("Orlando International Airport"),
        Airport::new("Salt Lake City International"),
        Airport::new("O'Hare International Airport"),
        Airport::new("Dane County Regional Airport"),
    ]
}

/// Write `contents` to a fresh file under the system temp dir.
fn scratch_file(name: &str, contents: &[u8]) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("routegraph-loader-test-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("create scratch dir");
    let path = dir.join(name);
    fs::write(&path, contents).expect("write scratch file");
    path
}

// ===========================================================================
// 1. Successful loads
// ===========================================================================

#[test]
fn fixtures_load() {
    let net = Loader::new()
        .load(Some(times().as_path()), Some(costs().as_path()))
        .expect("fixtures should load");
    assert!(!net.time_graph().is_empty());
    assert!(!net.cost_graph().is_empty());
    assert_eq!(net.labels().len(), 6);
}

#[test]
fn every_airport_is_in_both_graphs_fully_connected() {
    let net = Loader::new().load(Some(times().as_path()), Some(costs().as_path())).unwrap();
    let list = airports();
    for a in &list {
        assert!(net.cost_graph().contains_vertex(a), "{} missing from cost graph", a);
        assert!(net.time_graph().contains_vertex(a), "{} missing from time graph", a);
        for b in &list {
            if a != b {
                assert!(net.time_graph().contains_edge(a, b), "time {} -> {}", a, b);
                assert!(net.cost_graph().contains_edge(a, b), "cost {} -> {}", a, b);
            }
        }
    }
    assert_eq!(net.time_graph().edge_count(), 30);
    assert_eq!(net.cost_graph().edge_count(), 30);
}

#[test]
fn label_table_maps_codes_to_airports() {
    let net = Loader::new().load(Some(times().as_path()), Some(costs().as_path())).unwrap();
    for (code, airport) in "ABCDEF".chars().zip(airports()) {
        assert_eq!(net.airport(&code.to_string()), Some(&airport));
    }
    assert_eq!(net.airport("Z"), None);
}

#[test]
fn spanning_tree_exists_from_every_airport() {
    let net = Loader::new().load(Some(times().as_path()), Some(costs().as_path())).unwrap();
    for a in airports() {
        let tree = net.time_graph().min_spanning_tree(&a).unwrap();
        assert_eq!(tree.vertex_count(), 6);
        assert_eq!(net.time_graph().min_spanning_tree_cost(&a), Ok(tree.cost()));
    }
}

#[test]
fn cheapest_route_uses_connection() {
    let net = Loader::new().load(Some(times().as_path()), Some(costs().as_path())).unwrap();
    let [denver, _, orlando, _, ohare, _] = airports();
    let graph = net.graph(Weighting::Cost);
    assert_eq!(graph.edge_weight(&denver, &ohare), Some(OrderedFloat(331.0)));
    assert_eq!(graph.path_cost(&denver, &ohare), Ok(OrderedFloat(321.0)));
    assert_eq!(
        graph.shortest_path(&denver, &ohare),
        Ok(vec![denver.clone(), orlando, ohare])
    );
    assert_eq!(graph.min_spanning_tree_cost(&denver), Ok(OrderedFloat(632.0)));
}

// ===========================================================================
// 2. Source validation
// ===========================================================================

fn assert_not_found(result: Result<routegraph_core::RouteNetwork, LoadError>, which: &str) {
    match result {
        Err(LoadError::SourceNotFound { which: w, .. }) => assert_eq!(w, which),
        Err(other) => panic!("expected SourceNotFound, got {}", other),
        Ok(_) => panic!("expected SourceNotFound, load succeeded"),
    }
}

#[test]
fn missing_sources_are_not_found() {
    let loader = Loader::new();
    assert_not_found(loader.load(None, None), "time");
    assert_not_found(loader.load(None, Some(costs().as_path())), "time");
    assert_not_found(loader.load(Some(times().as_path()), None), "cost");
}

#[test]
fn wrong_extensions_are_not_found() {
    let loader = Loader::new();
    let png = Path::new("airport.png");
    let dummy = Path::new("dummy.png");
    assert_not_found(loader.load(Some(png), Some(dummy)), "time");
    assert_not_found(loader.load(Some(png), Some(costs().as_path())), "time");
    assert_not_found(loader.load(Some(times().as_path()), Some(dummy)), "cost");
}

#[test]
fn nonexistent_file_is_not_found() {
    let missing = fixture("no-such-file.gv");
    assert_not_found(Loader::new().load(Some(times().as_path()), Some(missing.as_path())), "cost");
}

#[test]
fn unexpected_content_is_not_found() {
    let binary = scratch_file("binary.gv", &[0xff, 0xfe, 0x00, 0x9f]);
    assert_not_found(Loader::new().load(Some(binary.as_path()), Some(costs().as_path())), "time");

    let headerless = scratch_file("headerless.gv", b"A [label=\"Alpha\"]\n");
    assert_not_found(Loader::new().load(Some(times().as_path()), Some(headerless.as_path())), "cost");
}

#[test]
fn configured_extensions_are_honoured() {
    let dot = scratch_file("times.dot", fs::read(times()).unwrap().as_slice());
    assert_not_found(Loader::new().load(Some(dot.as_path()), Some(costs().as_path())), "time");

    let loader = Loader::with_extensions(["gv", "dot"]);
    let net = loader.load(Some(dot.as_path()), Some(costs().as_path())).unwrap();
    assert_eq!(net.time_graph().edge_count(), 30);
}

// ===========================================================================
// 3. Parse failures abort the load
// ===========================================================================

#[test]
fn parse_error_aborts_with_location() {
    let broken = scratch_file(
        "broken.gv",
        b"digraph {\n  A [label=\"Alpha\"]\n  A->Q [weight=3]\n}\n",
    );
    let err = Loader::new()
        .load(Some(times().as_path()), Some(broken.as_path()))
        .unwrap_err();
    match err {
        LoadError::Parse { path, line, .. } => {
            assert!(path.ends_with("broken.gv"), "{}", path);
            assert_eq!(line, 3);
        }
        other => panic!("expected parse error, got {}", other),
    }
}

#[test]
fn bad_weight_aborts_with_location() {
    let broken = scratch_file(
        "badweight.gv",
        b"digraph {\n  A [label=\"Alpha\"]\n  B [label=\"Beta\"]\n  A->B [weight=fast]\n}\n",
    );
    let err = Loader::new().load(Some(broken.as_path()), Some(costs().as_path())).unwrap_err();
    assert!(err.to_string().contains("badweight.gv:4"), "{}", err);
}
