/// Example: Simple Editing Session
///
/// Demonstrates:
/// - Building a graph from scratch
/// - Selecting and editing nodes through the interaction controller
/// - Creating edges in edge-creation mode
/// - Attaching a file, archiving the session, and restoring it
use anyhow::Result;
use graph_node_editor::*;

#[tokio::main]
async fn main() -> Result<()> {
    println!("Simple Editing Session");
    println!("======================\n");

    // Step 1: Build a small graph
    println!("Step 1: Building the graph...");
    let mut store = GraphStore::new();
    store.add_node(
        "ideas",
        NodeAttrs::at(0.0, 0.0).with_label("Ideas").with_color("#3b82f6"),
    )?;
    store.add_node(
        "research",
        NodeAttrs::at(120.0, 0.0)
            .with_label("Research")
            .with_color("#10b981"),
    )?;
    store.add_node(
        "draft",
        NodeAttrs::at(60.0, 100.0)
            .with_label("Draft")
            .with_color("#f59e0b"),
    )?;
    store.add_edge("ideas", "research", EdgeAttrs::default())?;
    println!(
        "  ✓ {} nodes, {} edges",
        store.node_count(),
        store.edge_count()
    );

    // Step 2: Select and restyle a node
    println!("\nStep 2: Editing the Draft node...");
    let mut controller = InteractionController::new();
    controller.click_node(&mut store, "draft");
    controller.update_description(&mut store, "First full draft of the write-up");
    controller.update_size(&mut store, 22.0);
    controller.update_shape(&mut store, NodeShape::Square);
    println!("  ✓ Selected: {}", controller.selected().unwrap_or("-"));

    // Step 3: Connect nodes in edge-creation mode
    println!("\nStep 3: Connecting research to draft...");
    controller.toggle_edge_mode();
    println!("  Hint: {}", controller.edge_mode_hint().unwrap_or(""));
    controller.click_node(&mut store, "research");
    println!("  Hint: {}", controller.edge_mode_hint().unwrap_or(""));
    controller.click_node(&mut store, "draft");
    println!("  ✓ Edges: {}", store.edge_count());

    // Step 4: Attach a file to the selected node
    println!("\nStep 4: Attaching a file...");
    let dir = tempfile::tempdir()?;
    let notes = dir.path().join("outline.md");
    std::fs::write(&notes, b"# Outline\n\n1. Intro\n2. Findings\n")?;
    controller.click_node(&mut store, "draft");
    controller.attach_file(&mut store, &notes)?;
    println!("  ✓ Attached outline.md to draft");

    // Step 5: Run the layout and archive the session
    println!("\nStep 5: Laying out and archiving...");
    apply_layout(&mut store, 100);
    let archive_path = dir.path().join(default_export_filename("zip"));
    let report = save_archive_file(&store, &archive_path).await?;
    println!("  ✓ {}", report.summary());

    // Step 6: Restore into a fresh store
    println!("\nStep 6: Restoring from the archive...");
    let mut restored = GraphStore::new();
    let report = load_archive_file(&mut restored, &archive_path).await?;
    println!("  ✓ {}", report.summary());
    if let Some(attachment) = restored
        .node("draft")
        .and_then(|node| node.attached_file.as_ref())
    {
        println!(
            "  ✓ Attachment restored: {} ({} bytes)",
            attachment.name, attachment.byte_size
        );
    }

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
