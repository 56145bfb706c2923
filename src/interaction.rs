use crate::attachment::Attachment;
use crate::edge::EdgeAttrs;
use crate::error::Result;
use crate::node::{Node, NodeShape};
use crate::store::GraphStore;
use std::path::Path;
use tracing::debug;

/// What the pointer was over when an event fired
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerTarget {
    /// A node, identified by id
    Node(String),

    /// The empty canvas
    Stage,
}

/// Edge-creation mode progress
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EdgeCreationState {
    /// Mode off; clicks select
    #[default]
    Off,

    /// Waiting for the first endpoint
    AwaitingFirst,

    /// First endpoint picked; waiting for the second
    AwaitingSecond(String),
}

/// Drag gesture progress
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,

    /// Pointer is down on this node; moves reposition it
    Dragging(String),
}

/// Editable snapshot of the selected node's attributes
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDraft {
    pub label: String,
    pub description: String,
    pub color: String,
    pub size: f64,
    pub shape: NodeShape,
}

impl NodeDraft {
    /// Snapshot a node's editable attributes
    pub fn of(node: &Node) -> Self {
        Self {
            label: node.label.clone(),
            description: node.description.clone(),
            color: node.color.clone(),
            size: node.size,
            shape: node.shape,
        }
    }
}

/// Turns pointer and control events into graph mutations
///
/// Selection, edge creation, and dragging are tracked separately and all
/// evaluated on the same event stream: a pointer-up first ends any drag, then
/// runs click classification against the current mode.
#[derive(Debug, Default)]
pub struct InteractionController {
    /// Currently selected node, if any
    selected: Option<String>,

    /// Editable snapshot of the selected node
    draft: Option<NodeDraft>,

    /// Edge-creation mode progress
    edge_creation: EdgeCreationState,

    /// Drag gesture progress
    drag: DragState,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Pointer Events ==========

    /// Pointer pressed; a press on a live node starts a drag
    pub fn pointer_down(&mut self, store: &GraphStore, target: &PointerTarget) {
        if let PointerTarget::Node(id) = target {
            if store.contains_node(id) {
                self.drag = DragState::Dragging(id.clone());
            }
        }
    }

    /// Pointer moved; while dragging, the node follows the pointer.
    /// Returns true when the renderer should suppress camera panning.
    pub fn pointer_move(&mut self, store: &mut GraphStore, x: f64, y: f64) -> bool {
        let DragState::Dragging(id) = &self.drag else {
            return false;
        };
        let id = id.clone();

        if store.set_node_position(&id, x, y).is_err() {
            // Node vanished mid-gesture; abandon the drag
            self.drag = DragState::Idle;
            return false;
        }
        true
    }

    /// Pointer released; ends any drag, then classifies the click
    pub fn pointer_up(&mut self, store: &mut GraphStore, target: &PointerTarget) {
        self.drag = DragState::Idle;
        match target {
            PointerTarget::Node(id) => self.click_node(store, id),
            PointerTarget::Stage => self.click_stage(),
        }
    }

    /// A completed click on a node
    pub fn click_node(&mut self, store: &mut GraphStore, id: &str) {
        let Some(node) = store.node(id) else {
            // Stale id; nothing to do
            return;
        };

        match self.edge_creation.clone() {
            EdgeCreationState::Off => {
                self.selected = Some(id.to_string());
                self.draft = Some(NodeDraft::of(node));
            }
            EdgeCreationState::AwaitingFirst => {
                self.edge_creation = EdgeCreationState::AwaitingSecond(id.to_string());
            }
            EdgeCreationState::AwaitingSecond(first) => {
                if first != id {
                    if let Err(e) = store.add_edge(&first, id, EdgeAttrs::default()) {
                        debug!("Edge not created between {} and {}: {}", first, id, e);
                    }
                }
                self.edge_creation = EdgeCreationState::Off;
            }
        }
    }

    /// A completed click on the empty canvas
    pub fn click_stage(&mut self) {
        if self.edge_creation != EdgeCreationState::Off {
            self.edge_creation = EdgeCreationState::Off;
        } else {
            self.selected = None;
            self.draft = None;
        }
    }

    // ========== Mode Control ==========

    /// Enter or leave edge-creation mode; entering clears the selection
    pub fn toggle_edge_mode(&mut self) {
        if self.edge_creation == EdgeCreationState::Off {
            self.selected = None;
            self.draft = None;
            self.edge_creation = EdgeCreationState::AwaitingFirst;
        } else {
            self.edge_creation = EdgeCreationState::Off;
        }
    }

    pub fn is_edge_mode(&self) -> bool {
        self.edge_creation != EdgeCreationState::Off
    }

    /// Status line for the current edge-creation step
    pub fn edge_mode_hint(&self) -> Option<&'static str> {
        match self.edge_creation {
            EdgeCreationState::Off => None,
            EdgeCreationState::AwaitingFirst => Some("Click the first node"),
            EdgeCreationState::AwaitingSecond(_) => Some("Now click the second node"),
        }
    }

    // ========== Selected-Node Editing ==========

    /// Rename the selected node; whitespace-only input is ignored
    pub fn update_label(&mut self, store: &mut GraphStore, label: &str) {
        let Some(id) = self.selected.clone() else {
            return;
        };
        let label = label.trim();
        if label.is_empty() {
            return;
        }

        if store.set_node_label(&id, label).is_err() {
            self.drop_selection();
            return;
        }
        self.refresh_draft(store);
    }

    /// Change the selected node's description
    pub fn update_description(&mut self, store: &mut GraphStore, description: &str) {
        let Some(id) = self.selected.clone() else {
            return;
        };

        if store.set_node_description(&id, description).is_err() {
            self.drop_selection();
            return;
        }
        self.refresh_draft(store);
    }

    /// Change the selected node's color
    pub fn update_color(&mut self, store: &mut GraphStore, color: &str) {
        let Some(id) = self.selected.clone() else {
            return;
        };

        if store.set_node_color(&id, color).is_err() {
            self.drop_selection();
            return;
        }
        self.refresh_draft(store);
    }

    /// Change the selected node's size; the store clamps to the floor
    pub fn update_size(&mut self, store: &mut GraphStore, size: f64) {
        let Some(id) = self.selected.clone() else {
            return;
        };

        if store.set_node_size(&id, size).is_err() {
            self.drop_selection();
            return;
        }
        self.refresh_draft(store);
    }

    /// Change the selected node's shape
    pub fn update_shape(&mut self, store: &mut GraphStore, shape: NodeShape) {
        let Some(id) = self.selected.clone() else {
            return;
        };

        if store.set_node_shape(&id, shape).is_err() {
            self.drop_selection();
            return;
        }
        self.refresh_draft(store);
    }

    /// Stage a file from disk and attach it to the selected node
    pub fn attach_file(&mut self, store: &mut GraphStore, path: impl AsRef<Path>) -> Result<()> {
        let Some(id) = self.selected.clone() else {
            return Ok(());
        };

        let attachment = Attachment::stage_file(path)?;
        store.set_node_attachment(&id, Some(attachment))?;
        self.refresh_draft(store);
        Ok(())
    }

    /// Detach the selected node's file, releasing its backing resources
    pub fn remove_attachment(&mut self, store: &mut GraphStore) {
        let Some(id) = self.selected.clone() else {
            return;
        };

        if store.set_node_attachment(&id, None).is_err() {
            self.drop_selection();
            return;
        }
        self.refresh_draft(store);
    }

    /// Delete the selected node (and its edges); returns the removed node
    pub fn delete_selected_node(&mut self, store: &mut GraphStore) -> Option<Node> {
        let id = self.selected.take()?;
        self.draft = None;
        if self.drag == DragState::Dragging(id.clone()) {
            self.drag = DragState::Idle;
        }

        store.remove_node(&id).ok()
    }

    /// Delete every edge touching the selected node; returns the removed ids
    pub fn delete_selected_edges(&mut self, store: &mut GraphStore) -> Vec<String> {
        let Some(id) = self.selected.clone() else {
            return Vec::new();
        };

        store.remove_edges_of(&id).unwrap_or_default()
    }

    // ========== Accessors ==========

    /// Id of the selected node, if any
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// The selected node, re-validated against the store
    pub fn selected_node<'a>(&self, store: &'a GraphStore) -> Option<&'a Node> {
        self.selected.as_deref().and_then(|id| store.node(id))
    }

    /// Editable snapshot of the selected node
    pub fn draft(&self) -> Option<&NodeDraft> {
        self.draft.as_ref()
    }

    pub fn edge_creation(&self) -> &EdgeCreationState {
        &self.edge_creation
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    /// Node to highlight while a drag is active
    pub fn highlighted_node(&self) -> Option<&str> {
        match &self.drag {
            DragState::Dragging(id) => Some(id),
            DragState::Idle => None,
        }
    }

    fn refresh_draft(&mut self, store: &GraphStore) {
        self.draft = self
            .selected
            .as_deref()
            .and_then(|id| store.node(id))
            .map(NodeDraft::of);
    }

    fn drop_selection(&mut self) {
        self.selected = None;
        self.draft = None;
    }
}
