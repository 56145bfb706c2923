use thiserror::Error;

/// Errors produced by graph operations and (de)serialization
#[derive(Debug, Error)]
pub enum GraphError {
    /// An id that must be unique already exists in the store
    #[error("Duplicate id: {0}")]
    DuplicateId(String),

    /// The referenced node or edge does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// An edge's source and target are the same node
    #[error("Self-loop rejected: {0}")]
    SelfLoop(String),

    /// An archive reference points at an entry the archive does not contain
    #[error("Missing archive entry: {0}")]
    MissingArchiveEntry(String),

    /// The attachment payload cannot be carried by the requested transport
    #[error("Unsupported attachment: {0}")]
    UnsupportedAttachment(String),

    /// The attachment payload is malformed or no longer readable
    #[error("Invalid attachment payload: {0}")]
    InvalidPayload(String),

    #[error("Document error: {0}")]
    Document(#[from] serde_json::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_error_display() {
        let err = GraphError::DuplicateId("node_1".to_string());
        assert_eq!(err.to_string(), "Duplicate id: node_1");

        let err = GraphError::SelfLoop("node_1".to_string());
        assert_eq!(err.to_string(), "Self-loop rejected: node_1");

        let err = GraphError::MissingArchiveEntry("files/node_1_a.bin".to_string());
        assert_eq!(err.to_string(), "Missing archive entry: files/node_1_a.bin");
    }

    #[test]
    fn test_error_from_serde_json() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{ not json }")
            .expect_err("must fail to parse");
        let err: GraphError = parse_err.into();
        assert_matches!(err, GraphError::Document(_));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: GraphError = io_err.into();
        assert_matches!(err, GraphError::Io(_));
    }
}
