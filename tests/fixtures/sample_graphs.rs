// Helper functions to generate test graphs with various configurations

use graph_node_editor::{Attachment, EdgeAttrs, GraphStore, NodeAttrs, NodeShape};
use std::path::Path;

/// Create a store with two connected nodes "a" and "b"
pub fn create_pair_graph() -> (GraphStore, String) {
    let mut store = GraphStore::new();
    store
        .add_node("a", NodeAttrs::at(0.0, 0.0).with_label("A"))
        .unwrap();
    store
        .add_node("b", NodeAttrs::at(100.0, 0.0).with_label("B"))
        .unwrap();
    let edge_id = store.add_edge("a", "b", EdgeAttrs::default()).unwrap();

    (store, edge_id)
}

/// Create a store exercising every node and edge attribute
pub fn create_styled_graph() -> GraphStore {
    let mut store = GraphStore::new();

    store
        .add_node(
            "plan",
            NodeAttrs::at(-40.0, 12.5)
                .with_label("Plan")
                .with_description("Quarterly planning notes")
                .with_color("#8b5cf6")
                .with_size(24.0)
                .with_shape(NodeShape::Square),
        )
        .unwrap();

    store
        .add_node(
            "build",
            NodeAttrs::at(60.0, -30.0)
                .with_label("Build")
                .with_color("#10b981")
                .with_shape(NodeShape::Triangle),
        )
        .unwrap();

    store
        .add_node("ship", NodeAttrs::at(160.0, 40.0).with_label("Ship"))
        .unwrap();

    store
        .add_edge(
            "plan",
            "build",
            EdgeAttrs {
                size: 4.0,
                color: "#ef4444".to_string(),
            },
        )
        .unwrap();
    store.add_edge("build", "ship", EdgeAttrs::default()).unwrap();

    store
}

/// Create a store with one node carrying an inline attachment
pub fn create_inline_attachment_graph() -> GraphStore {
    let mut store = GraphStore::new();
    store
        .add_node("doc", NodeAttrs::at(0.0, 0.0).with_label("Doc"))
        .unwrap();

    let attachment = Attachment::inline("readme.md", "text/markdown", b"# Hello\n");
    store.set_node_attachment("doc", Some(attachment)).unwrap();

    store
}

/// Stage a file of `len` patterned bytes onto a "payload" node; returns the exact bytes written
pub fn create_staged_attachment_graph(
    dir: &Path,
    file_name: &str,
    len: usize,
) -> (GraphStore, Vec<u8>) {
    let bytes: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
    let path = dir.join(file_name);
    std::fs::write(&path, &bytes).unwrap();

    let mut store = GraphStore::new();
    store
        .add_node("payload", NodeAttrs::at(0.0, 0.0).with_label("Payload"))
        .unwrap();
    let attachment = Attachment::stage_file(&path).unwrap();
    store.set_node_attachment("payload", Some(attachment)).unwrap();

    (store, bytes)
}

/// Create a "hub" node connected to `spokes` numbered spoke nodes
pub fn create_hub_graph(spokes: usize) -> GraphStore {
    let mut store = GraphStore::new();
    store
        .add_node("hub", NodeAttrs::at(0.0, 0.0).with_label("Hub"))
        .unwrap();

    for index in 0..spokes {
        let id = format!("spoke{}", index);
        store
            .add_node(&id, NodeAttrs::at(index as f64 * 50.0, 80.0))
            .unwrap();
        store.add_edge("hub", &id, EdgeAttrs::default()).unwrap();
    }

    store
}
