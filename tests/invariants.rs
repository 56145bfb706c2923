// Structural invariant coverage: live endpoints, no self-loops, pair
// uniqueness, and cascade precision under arbitrary edit sequences

mod fixtures;

use assert_matches::assert_matches;
use fixtures::sample_graphs::*;
use graph_node_editor::*;
use proptest::prelude::*;
use std::collections::HashSet;

#[derive(Debug, Clone)]
enum Op {
    AddNode(String),
    RemoveNode(String),
    AddEdge(String, String),
    RemoveEdgeBetween(String, String),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let name = (0..8u8).prop_map(|i| ((b'a' + i) as char).to_string());
    prop_oneof![
        name.clone().prop_map(Op::AddNode),
        name.clone().prop_map(Op::RemoveNode),
        (name.clone(), name.clone()).prop_map(|(s, t)| Op::AddEdge(s, t)),
        (name.clone(), name).prop_map(|(a, b)| Op::RemoveEdgeBetween(a, b)),
    ]
}

fn apply(store: &mut GraphStore, op: &Op) {
    match op {
        Op::AddNode(id) => {
            let _ = store.add_node(id, NodeAttrs::at(0.0, 0.0));
        }
        Op::RemoveNode(id) => {
            let _ = store.remove_node(id);
        }
        Op::AddEdge(source, target) => {
            let _ = store.add_edge(source, target, EdgeAttrs::default());
        }
        Op::RemoveEdgeBetween(a, b) => {
            if let Some(id) = store.edge_between(a, b).map(|edge| edge.id.clone()) {
                let _ = store.remove_edge(&id);
            }
        }
    }
}

fn assert_invariants(store: &GraphStore) {
    let mut seen_pairs = HashSet::new();
    for edge in store.edges() {
        assert_ne!(edge.source, edge.target, "self-loop: {}", edge.id);
        assert!(
            store.node(&edge.source).is_some(),
            "dangling source on {}",
            edge.id
        );
        assert!(
            store.node(&edge.target).is_some(),
            "dangling target on {}",
            edge.id
        );

        let pair = if edge.source <= edge.target {
            (edge.source.clone(), edge.target.clone())
        } else {
            (edge.target.clone(), edge.source.clone())
        };
        assert!(seen_pairs.insert(pair), "duplicate pair on {}", edge.id);

        // The pair lookup must agree with the edge list
        let indexed = store.edge_between(&edge.source, &edge.target);
        assert_eq!(indexed.map(|e| e.id.as_str()), Some(edge.id.as_str()));
        assert!(edge.size >= EDGE_SIZE_FLOOR);
    }
    for node in store.nodes() {
        assert!(node.size >= NODE_SIZE_FLOOR);
    }
}

proptest! {
    #[test]
    fn prop_random_edits_never_break_invariants(
        ops in prop::collection::vec(op_strategy(), 1..40)
    ) {
        let mut store = GraphStore::new();
        for op in &ops {
            apply(&mut store, op);
            assert_invariants(&store);
        }
    }

    #[test]
    fn prop_scaling_respects_size_floors(factor in 0.0001f64..3.0) {
        let mut store = create_styled_graph();
        scale_graph(&mut store, factor);
        for node in store.nodes() {
            prop_assert!(node.size >= NODE_SIZE_FLOOR);
        }
        for edge in store.edges() {
            prop_assert!(edge.size >= EDGE_SIZE_FLOOR);
        }
    }
}

#[test]
fn test_removing_endpoint_drops_the_edge() {
    let (mut store, edge_id) = create_pair_graph();

    store.remove_node("a").unwrap();

    assert_eq!(store.node_count(), 1);
    assert_eq!(store.edge_count(), 0);
    assert!(store.edge(&edge_id).is_none());
    assert!(store.edge_between("a", "b").is_none());
}

#[test]
fn test_remove_node_cascades_to_incident_edges() {
    let mut store = create_hub_graph(3);
    store.add_edge("spoke0", "spoke1", EdgeAttrs::default()).unwrap();

    store.remove_node("hub").unwrap();

    assert_eq!(store.node_count(), 3);
    assert_eq!(store.edge_count(), 1);
    assert!(store.edge_between("spoke0", "spoke1").is_some());
    assert_invariants(&store);
}

#[test]
fn test_remove_edges_of_clears_only_incident_edges() {
    let mut store = create_hub_graph(3);
    store.add_edge("spoke0", "spoke1", EdgeAttrs::default()).unwrap();

    let removed = store.remove_edges_of("hub").unwrap();

    assert_eq!(removed.len(), 3);
    assert!(store.node("hub").is_some());
    assert_eq!(store.edge_count(), 1);
    assert!(store.edge_between("spoke0", "spoke1").is_some());
    assert_invariants(&store);
}

#[test]
fn test_pair_can_reconnect_after_edge_removal() {
    let (mut store, edge_id) = create_pair_graph();

    store.remove_edge(&edge_id).unwrap();
    let new_id = store.add_edge("b", "a", EdgeAttrs::default()).unwrap();

    assert_ne!(new_id, edge_id);
    assert_eq!(store.edge_count(), 1);
    assert!(store.edge_between("a", "b").is_some());
}

#[test]
fn test_duplicate_pair_returns_existing_edge() {
    let (mut store, edge_id) = create_pair_graph();

    let reversed = store.add_edge("b", "a", EdgeAttrs::default()).unwrap();

    assert_eq!(reversed, edge_id);
    assert_eq!(store.edge_count(), 1);
}

#[test]
fn test_rejected_edges_leave_store_unchanged() {
    let (mut store, _) = create_pair_graph();

    assert_matches!(
        store.add_edge("a", "a", EdgeAttrs::default()),
        Err(GraphError::SelfLoop(_))
    );
    assert_matches!(
        store.add_edge("a", "missing", EdgeAttrs::default()),
        Err(GraphError::NotFound(_))
    );
    assert_eq!(store.node_count(), 2);
    assert_eq!(store.edge_count(), 1);
    assert_invariants(&store);
}

#[test]
fn test_duplicate_node_id_rejected() {
    let (mut store, _) = create_pair_graph();

    let result = store.add_node("a", NodeAttrs::at(9.0, 9.0).with_label("Other"));

    assert_matches!(result, Err(GraphError::DuplicateId(_)));
    assert_eq!(store.node("a").unwrap().label, "A");
}

#[test]
fn test_edge_mode_walkthrough_keeps_store_consistent() {
    let (mut store, _) = create_pair_graph();
    let mut controller = InteractionController::new();

    controller.click_node(&mut store, "a");
    assert_eq!(controller.selected(), Some("a"));

    // Both passes target an already-connected pair; neither may add a
    // parallel edge
    controller.toggle_edge_mode();
    assert_eq!(controller.selected(), None);
    controller.click_node(&mut store, "a");
    controller.click_node(&mut store, "b");
    assert!(!controller.is_edge_mode());

    controller.toggle_edge_mode();
    controller.click_node(&mut store, "b");
    controller.click_node(&mut store, "a");

    assert_eq!(store.edge_count(), 1);
    assert_invariants(&store);
}
