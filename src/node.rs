use crate::attachment::Attachment;
use serde::{Deserialize, Serialize};

/// Default display size for newly spawned nodes
pub const DEFAULT_NODE_SIZE: f64 = 15.0;

/// Default fill color for newly spawned nodes
pub const DEFAULT_NODE_COLOR: &str = "#3b82f6";

/// Default caption for newly spawned nodes
pub const DEFAULT_NODE_LABEL: &str = "New Node";

/// Smallest node size; creation and scaling clamp to this
pub const NODE_SIZE_FLOOR: f64 = 5.0;

/// A node in the diagram
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Unique identifier, immutable once created
    pub id: String,

    /// Graph-space position
    pub x: f64,
    pub y: f64,

    /// Display size (radius basis), kept at or above NODE_SIZE_FLOOR
    pub size: f64,

    /// User-editable caption
    pub label: String,

    /// Longer free-form text, empty by default
    pub description: String,

    /// Hex fill color, e.g. "#3b82f6"
    pub color: String,

    /// Rendered outline
    pub shape: NodeShape,

    /// At most one attached file
    pub attached_file: Option<Attachment>,
}

impl Node {
    /// Create a node from an id and initial attributes; size is clamped to the floor
    pub fn new(id: impl Into<String>, attrs: NodeAttrs) -> Self {
        Self {
            id: id.into(),
            x: attrs.x,
            y: attrs.y,
            size: attrs.size.max(NODE_SIZE_FLOOR),
            label: attrs.label,
            description: attrs.description,
            color: attrs.color,
            shape: attrs.shape,
            attached_file: attrs.attached_file,
        }
    }

    /// Move the node to a new position
    pub fn set_position(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    /// Update the node's caption
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// Update the node's description
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Update the node's color
    pub fn set_color(&mut self, color: impl Into<String>) {
        self.color = color.into();
    }

    /// Update the node's display size
    pub fn set_size(&mut self, size: f64) {
        self.size = size;
    }

    /// Update the node's shape
    pub fn set_shape(&mut self, shape: NodeShape) {
        self.shape = shape;
    }

    /// Replace the attached file; the previous attachment is dropped
    pub fn set_attachment(&mut self, attachment: Option<Attachment>) {
        self.attached_file = attachment;
    }

    /// Check whether the node carries an attachment
    pub fn has_attachment(&self) -> bool {
        self.attached_file.is_some()
    }
}

/// Attribute bundle used when creating a node
#[derive(Debug, Clone, PartialEq)]
pub struct NodeAttrs {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub label: String,
    pub description: String,
    pub color: String,
    pub shape: NodeShape,
    pub attached_file: Option<Attachment>,
}

impl NodeAttrs {
    /// Default attributes at a given position
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    /// Set the caption
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the color
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Set the display size
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    /// Set the shape
    pub fn with_shape(mut self, shape: NodeShape) -> Self {
        self.shape = shape;
        self
    }

    /// Attach a file
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attached_file = Some(attachment);
        self
    }
}

impl Default for NodeAttrs {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            size: DEFAULT_NODE_SIZE,
            label: DEFAULT_NODE_LABEL.to_string(),
            description: String::new(),
            color: DEFAULT_NODE_COLOR.to_string(),
            shape: NodeShape::Circle,
            attached_file: None,
        }
    }
}

/// Rendered node outline
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum NodeShape {
    #[default]
    Circle,
    Square,
    Triangle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_creation_defaults() {
        let node = Node::new("node_1", NodeAttrs::at(10.0, -4.5));

        assert_eq!(node.id, "node_1");
        assert_eq!(node.x, 10.0);
        assert_eq!(node.y, -4.5);
        assert_eq!(node.size, DEFAULT_NODE_SIZE);
        assert_eq!(node.label, DEFAULT_NODE_LABEL);
        assert_eq!(node.description, "");
        assert_eq!(node.color, DEFAULT_NODE_COLOR);
        assert_eq!(node.shape, NodeShape::Circle);
        assert!(!node.has_attachment());
    }

    #[test]
    fn test_node_size_clamped_at_creation() {
        let node = Node::new("node_1", NodeAttrs::at(0.0, 0.0).with_size(0.5));
        assert_eq!(node.size, NODE_SIZE_FLOOR);

        let node = Node::new("node_2", NodeAttrs::at(0.0, 0.0).with_size(40.0));
        assert_eq!(node.size, 40.0);
    }

    #[test]
    fn test_node_mutations() {
        let mut node = Node::new("node_1", NodeAttrs::default());

        node.set_position(3.0, 4.0);
        assert_eq!((node.x, node.y), (3.0, 4.0));

        node.set_label("Renamed");
        assert_eq!(node.label, "Renamed");

        node.set_description("More detail");
        assert_eq!(node.description, "More detail");

        node.set_color("#ff0000");
        assert_eq!(node.color, "#ff0000");

        node.set_size(22.0);
        assert_eq!(node.size, 22.0);

        node.set_shape(NodeShape::Triangle);
        assert_eq!(node.shape, NodeShape::Triangle);
    }

    #[test]
    fn test_attrs_builder() {
        let attrs = NodeAttrs::at(1.0, 2.0)
            .with_label("Main Idea")
            .with_color("#10b981")
            .with_size(18.0)
            .with_shape(NodeShape::Square);

        assert_eq!(attrs.x, 1.0);
        assert_eq!(attrs.label, "Main Idea");
        assert_eq!(attrs.color, "#10b981");
        assert_eq!(attrs.size, 18.0);
        assert_eq!(attrs.shape, NodeShape::Square);
    }

    #[test]
    fn test_shape_wire_strings() {
        assert_eq!(serde_json::to_string(&NodeShape::Circle).unwrap(), "\"circle\"");
        assert_eq!(serde_json::to_string(&NodeShape::Square).unwrap(), "\"square\"");
        assert_eq!(serde_json::to_string(&NodeShape::Triangle).unwrap(), "\"triangle\"");

        let shape: NodeShape = serde_json::from_str("\"triangle\"").unwrap();
        assert_eq!(shape, NodeShape::Triangle);
    }
}
