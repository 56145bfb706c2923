// Graph Node Editor - Core Library

pub mod attachment;
pub mod change;
pub mod edge;
pub mod error;
pub mod interaction;
pub mod layout;
pub mod node;
pub mod serialization;
pub mod store;

// Re-export main types for convenience
pub use attachment::{Attachment, AttachmentPayload, EphemeralHandle, INLINE_SIZE_LIMIT};
pub use change::{ChangeEvent, ChangeKind};
pub use edge::{Edge, EdgeAttrs, DEFAULT_EDGE_COLOR, DEFAULT_EDGE_SIZE, EDGE_SIZE_FLOOR};
pub use error::{GraphError, Result};
pub use interaction::{
    DragState, EdgeCreationState, InteractionController, NodeDraft, PointerTarget,
};
pub use layout::{apply_layout, apply_layout_with_params, scale_graph, LayoutParams};
pub use node::{
    Node, NodeAttrs, NodeShape, DEFAULT_NODE_COLOR, DEFAULT_NODE_LABEL, DEFAULT_NODE_SIZE,
    NODE_SIZE_FLOOR,
};
pub use serialization::{
    default_export_filename, export_archive, export_archive_bytes, export_document, export_json,
    import_archive, import_archive_bytes, import_json, load_archive_file, load_json_file,
    save_archive_file, save_json_file, AttachmentRecord, ExportReport, GraphDocument,
    ImportReport, NodeRecord, ARCHIVE_BATCH_SIZE, MANIFEST_NAME,
};
pub use store::GraphStore;
