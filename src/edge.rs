use serde::{Deserialize, Serialize};

/// Default display thickness for new edges
pub const DEFAULT_EDGE_SIZE: f64 = 2.0;

/// Default stroke color for new edges
pub const DEFAULT_EDGE_COLOR: &str = "#64748b";

/// Smallest edge thickness; scaling clamps to this
pub const EDGE_SIZE_FLOOR: f64 = 1.0;

/// A connection between two distinct nodes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Edge {
    /// Unique identifier, immutable once created
    pub id: String,

    /// Id of the node the edge starts from
    pub source: String,

    /// Id of the node the edge ends at
    pub target: String,

    /// Display thickness
    #[serde(default = "default_size")]
    pub size: f64,

    /// Hex stroke color
    #[serde(default = "default_color")]
    pub color: String,
}

impl Edge {
    /// Create an edge from an id, endpoints, and attributes; size is clamped
    /// to the floor
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        attrs: EdgeAttrs,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            size: attrs.size.max(EDGE_SIZE_FLOOR),
            color: attrs.color,
        }
    }

    /// Check if this edge touches the given node
    pub fn involves(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }

    /// Update the edge's thickness
    pub fn set_size(&mut self, size: f64) {
        self.size = size;
    }

    /// Update the edge's color
    pub fn set_color(&mut self, color: impl Into<String>) {
        self.color = color.into();
    }
}

/// Attribute bundle used when creating an edge
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeAttrs {
    pub size: f64,
    pub color: String,
}

impl Default for EdgeAttrs {
    fn default() -> Self {
        Self {
            size: DEFAULT_EDGE_SIZE,
            color: DEFAULT_EDGE_COLOR.to_string(),
        }
    }
}

fn default_size() -> f64 {
    DEFAULT_EDGE_SIZE
}

fn default_color() -> String {
    DEFAULT_EDGE_COLOR.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_creation() {
        let edge = Edge::new("edge_1", "node_a", "node_b", EdgeAttrs::default());

        assert_eq!(edge.id, "edge_1");
        assert_eq!(edge.source, "node_a");
        assert_eq!(edge.target, "node_b");
        assert_eq!(edge.size, DEFAULT_EDGE_SIZE);
        assert_eq!(edge.color, DEFAULT_EDGE_COLOR);
    }

    #[test]
    fn test_edge_size_clamped_at_creation() {
        let edge = Edge::new(
            "edge_1",
            "a",
            "b",
            EdgeAttrs {
                size: 0.2,
                color: DEFAULT_EDGE_COLOR.to_string(),
            },
        );
        assert_eq!(edge.size, EDGE_SIZE_FLOOR);
    }

    #[test]
    fn test_edge_involves() {
        let edge = Edge::new("edge_1", "node_a", "node_b", EdgeAttrs::default());

        assert!(edge.involves("node_a"));
        assert!(edge.involves("node_b"));
        assert!(!edge.involves("node_c"));
    }

    #[test]
    fn test_edge_deserialization_fills_defaults() {
        let edge: Edge =
            serde_json::from_str(r#"{"id":"e1","source":"a","target":"b"}"#).unwrap();

        assert_eq!(edge.size, DEFAULT_EDGE_SIZE);
        assert_eq!(edge.color, DEFAULT_EDGE_COLOR);
    }

    #[test]
    fn test_edge_serialization_round_trip() {
        let original = Edge::new(
            "edge_1",
            "node_a",
            "node_b",
            EdgeAttrs {
                size: 3.5,
                color: "#ff00ff".to_string(),
            },
        );

        let json = serde_json::to_string(&original).unwrap();
        let restored: Edge = serde_json::from_str(&json).unwrap();

        assert_eq!(original, restored);
    }
}
