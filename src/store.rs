use crate::attachment::Attachment;
use crate::change::{ChangeEvent, ChangeKind};
use crate::edge::{Edge, EdgeAttrs, EDGE_SIZE_FLOOR};
use crate::error::{GraphError, Result};
use crate::node::{Node, NodeAttrs, NodeShape, NODE_SIZE_FLOOR};
use std::collections::BTreeMap;
use std::mem;
use ulid::Ulid;

/// Owns the nodes and edges of one diagram and records every mutation
#[derive(Debug, Clone)]
pub struct GraphStore {
    /// All nodes, keyed by id
    nodes: BTreeMap<String, Node>,

    /// All edges, keyed by id
    edges: BTreeMap<String, Edge>,

    /// Edge id per unordered endpoint pair, for duplicate detection
    pair_index: BTreeMap<(String, String), String>,

    /// Mutations recorded since the last drain
    changes: Vec<ChangeEvent>,
}

impl GraphStore {
    /// Create an empty graph
    pub fn new() -> Self {
        Self {
            nodes: BTreeMap::new(),
            edges: BTreeMap::new(),
            pair_index: BTreeMap::new(),
            changes: Vec::new(),
        }
    }

    /// Create the starter graph shown on first launch
    pub fn with_demo_content() -> Self {
        let mut store = Self::new();
        let seeds = [
            ("node1", "Main Idea", "This is the main concept of the project", "#3b82f6"),
            ("node2", "Concept A", "First supporting concept", "#10b981"),
            ("node3", "Concept B", "Second supporting concept", "#f59e0b"),
        ];

        for (index, (id, label, description, color)) in seeds.iter().enumerate() {
            let angle = index as f64 * 2.0 * std::f64::consts::PI / seeds.len() as f64;
            let attrs = NodeAttrs::at(angle.cos() * 100.0, angle.sin() * 100.0)
                .with_label(*label)
                .with_description(*description)
                .with_color(*color);
            store.insert_node(Node::new(*id, attrs));
        }

        let edge_id = store.fresh_edge_id();
        let edge = Edge::new(edge_id.clone(), "node1", "node2", EdgeAttrs::default());
        store.pair_index.insert(pair_key("node1", "node2"), edge_id.clone());
        store.edges.insert(edge_id.clone(), edge);
        store.record(ChangeKind::EdgeAdded { id: edge_id });

        store
    }

    // ========== Node Operations ==========

    /// Add a node under a caller-chosen id
    pub fn add_node(&mut self, id: impl Into<String>, attrs: NodeAttrs) -> Result<()> {
        let id = id.into();
        if self.nodes.contains_key(&id) {
            return Err(GraphError::DuplicateId(id));
        }

        self.insert_node(Node::new(id, attrs));
        Ok(())
    }

    /// Add a node under a freshly minted id and return the id
    pub fn spawn_node(&mut self, attrs: NodeAttrs) -> String {
        let id = self.fresh_node_id();
        self.insert_node(Node::new(id.clone(), attrs));
        id
    }

    /// Remove a node and every edge touching it; returns the removed node
    pub fn remove_node(&mut self, id: &str) -> Result<Node> {
        let node = self
            .nodes
            .remove(id)
            .ok_or_else(|| GraphError::NotFound(id.to_string()))?;
        if let Some(attachment) = &node.attached_file {
            attachment.release();
        }

        let incident: Vec<String> = self
            .edges
            .values()
            .filter(|edge| edge.involves(id))
            .map(|edge| edge.id.clone())
            .collect();
        for edge_id in incident {
            self.remove_edge(&edge_id)?;
        }

        self.record(ChangeKind::NodeRemoved { id: id.to_string() });
        Ok(node)
    }

    /// Move a node
    pub fn set_node_position(&mut self, id: &str, x: f64, y: f64) -> Result<()> {
        let node = self.node_mut(id)?;
        node.set_position(x, y);
        self.record(ChangeKind::NodeUpdated { id: id.to_string() });
        Ok(())
    }

    /// Rename a node
    pub fn set_node_label(&mut self, id: &str, label: impl Into<String>) -> Result<()> {
        let node = self.node_mut(id)?;
        node.set_label(label);
        self.record(ChangeKind::NodeUpdated { id: id.to_string() });
        Ok(())
    }

    /// Change a node's description
    pub fn set_node_description(&mut self, id: &str, description: impl Into<String>) -> Result<()> {
        let node = self.node_mut(id)?;
        node.set_description(description);
        self.record(ChangeKind::NodeUpdated { id: id.to_string() });
        Ok(())
    }

    /// Change a node's color
    pub fn set_node_color(&mut self, id: &str, color: impl Into<String>) -> Result<()> {
        let node = self.node_mut(id)?;
        node.set_color(color);
        self.record(ChangeKind::NodeUpdated { id: id.to_string() });
        Ok(())
    }

    /// Change a node's display size, clamped to the floor
    pub fn set_node_size(&mut self, id: &str, size: f64) -> Result<()> {
        let node = self.node_mut(id)?;
        node.set_size(size.max(NODE_SIZE_FLOOR));
        self.record(ChangeKind::NodeUpdated { id: id.to_string() });
        Ok(())
    }

    /// Change a node's shape
    pub fn set_node_shape(&mut self, id: &str, shape: NodeShape) -> Result<()> {
        let node = self.node_mut(id)?;
        node.set_shape(shape);
        self.record(ChangeKind::NodeUpdated { id: id.to_string() });
        Ok(())
    }

    /// Attach a file to a node, or detach with None; a replaced attachment's
    /// backing resources are released
    pub fn set_node_attachment(&mut self, id: &str, attachment: Option<Attachment>) -> Result<()> {
        let node = self.node_mut(id)?;
        if let Some(old) = node.attached_file.take() {
            if attachment.as_ref() != Some(&old) {
                old.release();
            }
        }
        node.set_attachment(attachment);
        self.record(ChangeKind::NodeUpdated { id: id.to_string() });
        Ok(())
    }

    // ========== Edge Operations ==========

    /// Connect two nodes under a freshly minted edge id; returns the id of the
    /// edge between them, which is the existing one when the pair is already
    /// connected
    pub fn add_edge(&mut self, source: &str, target: &str, attrs: EdgeAttrs) -> Result<String> {
        let id = self.fresh_edge_id();
        self.insert_edge(id, source, target, attrs)
    }

    /// Connect two nodes under a caller-chosen edge id
    pub fn add_edge_with_id(
        &mut self,
        id: impl Into<String>,
        source: &str,
        target: &str,
        attrs: EdgeAttrs,
    ) -> Result<String> {
        let id = id.into();
        if self.edges.contains_key(&id) {
            return Err(GraphError::DuplicateId(id));
        }

        self.insert_edge(id, source, target, attrs)
    }

    /// Remove an edge; returns the removed edge
    pub fn remove_edge(&mut self, id: &str) -> Result<Edge> {
        let edge = self
            .edges
            .remove(id)
            .ok_or_else(|| GraphError::NotFound(id.to_string()))?;

        self.pair_index.remove(&pair_key(&edge.source, &edge.target));
        self.record(ChangeKind::EdgeRemoved { id: id.to_string() });
        Ok(edge)
    }

    /// Remove every edge touching a node; returns the removed edge ids
    pub fn remove_edges_of(&mut self, node_id: &str) -> Result<Vec<String>> {
        if !self.nodes.contains_key(node_id) {
            return Err(GraphError::NotFound(node_id.to_string()));
        }

        let incident: Vec<String> = self
            .edges
            .values()
            .filter(|edge| edge.involves(node_id))
            .map(|edge| edge.id.clone())
            .collect();
        for edge_id in &incident {
            self.remove_edge(edge_id)?;
        }

        Ok(incident)
    }

    /// Change an edge's thickness, clamped to the floor
    pub fn set_edge_size(&mut self, id: &str, size: f64) -> Result<()> {
        let edge = self
            .edges
            .get_mut(id)
            .ok_or_else(|| GraphError::NotFound(id.to_string()))?;
        edge.set_size(size.max(EDGE_SIZE_FLOOR));
        self.record(ChangeKind::EdgeUpdated { id: id.to_string() });
        Ok(())
    }

    /// Change an edge's color
    pub fn set_edge_color(&mut self, id: &str, color: impl Into<String>) -> Result<()> {
        let edge = self
            .edges
            .get_mut(id)
            .ok_or_else(|| GraphError::NotFound(id.to_string()))?;
        edge.set_color(color);
        self.record(ChangeKind::EdgeUpdated { id: id.to_string() });
        Ok(())
    }

    // ========== Queries ==========

    /// Look up a node by id
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Look up an edge by id
    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.get(id)
    }

    /// The edge connecting two nodes, in either direction
    pub fn edge_between(&self, a: &str, b: &str) -> Option<&Edge> {
        self.pair_index
            .get(&pair_key(a, b))
            .and_then(|id| self.edges.get(id))
    }

    /// All edges touching a node
    pub fn edges_of(&self, node_id: &str) -> Vec<&Edge> {
        self.edges
            .values()
            .filter(|edge| edge.involves(node_id))
            .collect()
    }

    /// Iterate over all nodes in id order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Iterate over all edges in id order
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// Snapshot of all node ids
    pub fn node_ids(&self) -> Vec<String> {
        self.nodes.keys().cloned().collect()
    }

    /// Snapshot of all edge ids
    pub fn edge_ids(&self) -> Vec<String> {
        self.edges.keys().cloned().collect()
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Drop all nodes and edges, releasing any staged attachment handles
    pub fn clear(&mut self) {
        for node in self.nodes.values() {
            if let Some(attachment) = &node.attached_file {
                attachment.release();
            }
        }
        self.nodes.clear();
        self.edges.clear();
        self.pair_index.clear();
        self.record(ChangeKind::Cleared);
    }

    // ========== Change Log ==========

    /// Changes recorded since the last drain
    pub fn changes(&self) -> &[ChangeEvent] {
        &self.changes
    }

    /// Drain the recorded changes
    pub fn take_changes(&mut self) -> Vec<ChangeEvent> {
        mem::take(&mut self.changes)
    }

    /// Drop the recorded changes
    pub fn clear_changes(&mut self) {
        self.changes.clear();
    }

    // ========== Internals ==========

    fn insert_node(&mut self, node: Node) {
        let id = node.id.clone();
        self.nodes.insert(id.clone(), node);
        self.record(ChangeKind::NodeAdded { id });
    }

    fn insert_edge(
        &mut self,
        id: String,
        source: &str,
        target: &str,
        attrs: EdgeAttrs,
    ) -> Result<String> {
        if source == target {
            return Err(GraphError::SelfLoop(source.to_string()));
        }
        if !self.nodes.contains_key(source) {
            return Err(GraphError::NotFound(source.to_string()));
        }
        if !self.nodes.contains_key(target) {
            return Err(GraphError::NotFound(target.to_string()));
        }

        let key = pair_key(source, target);
        if let Some(existing) = self.pair_index.get(&key) {
            // Already connected; hand back the existing edge instead of failing
            return Ok(existing.clone());
        }

        self.edges
            .insert(id.clone(), Edge::new(id.clone(), source, target, attrs));
        self.pair_index.insert(key, id.clone());
        self.record(ChangeKind::EdgeAdded { id: id.clone() });
        Ok(id)
    }

    fn node_mut(&mut self, id: &str) -> Result<&mut Node> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| GraphError::NotFound(id.to_string()))
    }

    fn fresh_node_id(&self) -> String {
        loop {
            let id = format!("node_{}", Ulid::new());
            if !self.nodes.contains_key(&id) {
                return id;
            }
        }
    }

    fn fresh_edge_id(&self) -> String {
        loop {
            let id = format!("edge_{}", Ulid::new());
            if !self.edges.contains_key(&id) {
                return id;
            }
        }
    }

    fn record(&mut self, change: ChangeKind) {
        self.changes.push(ChangeEvent::new(change));
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Unordered lookup key for an endpoint pair
fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}
