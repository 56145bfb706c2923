use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded mutation of the graph
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChangeEvent {
    /// When the change happened
    pub timestamp: DateTime<Utc>,

    /// What changed
    pub change: ChangeKind,
}

impl ChangeEvent {
    pub fn new(change: ChangeKind) -> Self {
        Self {
            timestamp: Utc::now(),
            change,
        }
    }
}

/// The kinds of graph mutations that get recorded
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ChangeKind {
    NodeAdded { id: String },
    NodeUpdated { id: String },
    NodeRemoved { id: String },
    EdgeAdded { id: String },
    EdgeUpdated { id: String },
    EdgeRemoved { id: String },
    Cleared,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_event_serialization() {
        let event = ChangeEvent::new(ChangeKind::NodeAdded {
            id: "node_1".to_string(),
        });

        let json = serde_json::to_string(&event).unwrap();
        let restored: ChangeEvent = serde_json::from_str(&json).unwrap();

        assert_eq!(event, restored);
    }

    #[test]
    fn test_change_event_has_timestamp() {
        let before = Utc::now();
        let event = ChangeEvent::new(ChangeKind::Cleared);
        let after = Utc::now();

        assert!(event.timestamp >= before && event.timestamp <= after);
    }
}
