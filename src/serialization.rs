use crate::attachment::{self, Attachment, AttachmentPayload};
use crate::edge::{Edge, EdgeAttrs};
use crate::error::{GraphError, Result};
use crate::node::{Node, NodeAttrs, NodeShape, DEFAULT_NODE_COLOR, DEFAULT_NODE_SIZE};
use crate::store::GraphStore;
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Read, Seek, Write};
use std::path::Path;
use tracing::{info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Name of the manifest entry inside an archive
pub const MANIFEST_NAME: &str = "graph.json";

/// Attachments processed between cooperative yields
pub const ARCHIVE_BATCH_SIZE: usize = 10;

// ========== Wire Records ==========

/// Wire form of a node attachment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttachmentRecord {
    /// Original file name
    pub name: String,

    /// Inline data URI, or an entry path in archive form
    pub data: String,

    /// Content size in bytes
    pub size: u64,

    #[serde(rename = "type")]
    pub mime_type: String,

    #[serde(rename = "uploadDate")]
    pub upload_date: DateTime<Utc>,

    /// Marker left by live-handle exports; such records cannot be restored
    #[serde(rename = "isBlob", default, skip_serializing_if = "Option::is_none")]
    pub is_blob: Option<bool>,
}

/// Wire form of a node
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeRecord {
    pub id: String,
    pub x: f64,
    pub y: f64,
    #[serde(default = "default_size")]
    pub size: f64,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub shape: NodeShape,
    #[serde(rename = "attachedFile")]
    pub attached_file: Option<AttachmentRecord>,
}

/// The full export payload; the plain JSON document and the archive manifest
/// share this shape
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphDocument {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<Edge>,
}

fn default_size() -> f64 {
    DEFAULT_NODE_SIZE
}

fn default_color() -> String {
    DEFAULT_NODE_COLOR.to_string()
}

// ========== Reports ==========

/// Outcome summary of an import, for a single status notification
#[derive(Debug, Default)]
pub struct ImportReport {
    pub nodes: usize,
    pub edges: usize,
    pub attachments: usize,
    pub warnings: Vec<String>,
}

impl ImportReport {
    fn warn(&mut self, message: String) {
        warn!("{}", message);
        self.warnings.push(message);
    }

    /// One-line summary of what was imported
    pub fn summary(&self) -> String {
        if self.warnings.is_empty() {
            format!("Imported {} nodes and {} edges", self.nodes, self.edges)
        } else {
            format!(
                "Imported {} nodes and {} edges ({} warnings)",
                self.nodes,
                self.edges,
                self.warnings.len()
            )
        }
    }
}

/// Outcome summary of an archive export
#[derive(Debug, Default)]
pub struct ExportReport {
    pub nodes: usize,
    pub edges: usize,
    pub attachments: usize,
    pub warnings: Vec<String>,
}

impl ExportReport {
    fn warn(&mut self, message: String) {
        warn!("{}", message);
        self.warnings.push(message);
    }

    /// One-line summary of what was exported
    pub fn summary(&self) -> String {
        if self.warnings.is_empty() {
            format!(
                "Exported {} nodes, {} edges, {} attachments",
                self.nodes, self.edges, self.attachments
            )
        } else {
            format!(
                "Exported {} nodes, {} edges, {} attachments ({} warnings)",
                self.nodes,
                self.edges,
                self.attachments,
                self.warnings.len()
            )
        }
    }
}

// ========== Plain JSON ==========

/// Snapshot the store as a plain document; every attachment must be inline
pub fn export_document(store: &GraphStore) -> Result<GraphDocument> {
    let mut nodes = Vec::with_capacity(store.node_count());
    for node in store.nodes() {
        let mut record = bare_record(node);
        if let Some(attachment) = &node.attached_file {
            record.attached_file = Some(inline_record(&node.id, attachment)?);
        }
        nodes.push(record);
    }

    Ok(GraphDocument {
        nodes,
        edges: store.edges().cloned().collect(),
    })
}

/// Serialize the store as pretty-printed JSON
pub fn export_json(store: &GraphStore) -> Result<String> {
    let document = export_document(store)?;
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Replace the store's content with a parsed document. The store is left
/// untouched when the text cannot be parsed; malformed records inside a
/// well-formed document are skipped with a warning.
pub fn import_json(store: &mut GraphStore, json: &str) -> Result<ImportReport> {
    let document: GraphDocument = serde_json::from_str(json)?;
    Ok(apply_document(store, document))
}

fn apply_document(store: &mut GraphStore, document: GraphDocument) -> ImportReport {
    let GraphDocument { nodes, edges } = document;
    let mut report = ImportReport::default();
    store.clear();

    for record in nodes {
        let (id, mut attrs, attachment_record) = split_record(record);
        if let Some(record) = attachment_record {
            match restore_attachment(record) {
                Ok(attachment) => attrs = attrs.with_attachment(attachment),
                Err(e) => report.warn(format!("Dropping attachment on {}: {}", id, e)),
            }
        }
        finish_add_node(store, id, attrs, &mut report);
    }
    for edge in edges {
        add_edge_record(store, edge, &mut report);
    }

    info!("{}", report.summary());
    report
}

// ========== Archive ==========

/// Write the store as a compressed archive: one entry per attachment under
/// "files/", then the manifest. Yields between batches so a large export does
/// not starve the event loop.
pub async fn export_archive<W: Write + Seek>(
    store: &GraphStore,
    writer: W,
) -> Result<ExportReport> {
    let mut report = ExportReport::default();
    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut nodes = Vec::with_capacity(store.node_count());
    for (index, node) in store.nodes().enumerate() {
        if index > 0 && index % ARCHIVE_BATCH_SIZE == 0 {
            tokio::task::yield_now().await;
        }

        let mut record = bare_record(node);
        if let Some(attachment) = &node.attached_file {
            match attachment.materialize() {
                Ok(bytes) => {
                    let entry_path = attachment::archive_entry_path(&node.id, &attachment.name);
                    zip.start_file(entry_path.as_str(), options)?;
                    zip.write_all(&bytes)?;
                    record.attached_file = Some(AttachmentRecord {
                        name: attachment.name.clone(),
                        data: entry_path,
                        size: bytes.len() as u64,
                        mime_type: attachment.mime_type.clone(),
                        upload_date: attachment.uploaded_at,
                        is_blob: None,
                    });
                    report.attachments += 1;
                }
                Err(e) => {
                    report.warn(format!("Dropping attachment on {}: {}", node.id, e));
                }
            }
        }
        nodes.push(record);
        report.nodes += 1;
    }

    let document = GraphDocument {
        nodes,
        edges: store.edges().cloned().collect(),
    };
    report.edges = document.edges.len();

    zip.start_file(MANIFEST_NAME, options)?;
    zip.write_all(serde_json::to_string_pretty(&document)?.as_bytes())?;
    let mut inner = zip.finish()?;
    inner.flush()?;

    info!("{}", report.summary());
    Ok(report)
}

/// Replace the store's content from an archive. The store is left untouched
/// when the manifest is missing or cannot be parsed; a missing attachment
/// entry drops that attachment but keeps the node.
pub async fn import_archive<R: Read + Seek>(
    store: &mut GraphStore,
    reader: R,
) -> Result<ImportReport> {
    let mut archive = ZipArchive::new(reader)?;
    let manifest = attachment::read_archive_entry(&mut archive, MANIFEST_NAME)?;
    let document: GraphDocument = serde_json::from_slice(&manifest)?;

    let GraphDocument { nodes, edges } = document;
    let mut report = ImportReport::default();
    store.clear();

    for (index, record) in nodes.into_iter().enumerate() {
        if index > 0 && index % ARCHIVE_BATCH_SIZE == 0 {
            tokio::task::yield_now().await;
        }

        let (id, mut attrs, attachment_record) = split_record(record);
        if let Some(record) = attachment_record {
            match resolve_archive_attachment(&mut archive, record) {
                Ok(attachment) => attrs = attrs.with_attachment(attachment),
                Err(e) => report.warn(format!("Dropping attachment on {}: {}", id, e)),
            }
        }
        finish_add_node(store, id, attrs, &mut report);
    }
    for edge in edges {
        add_edge_record(store, edge, &mut report);
    }

    info!("{}", report.summary());
    Ok(report)
}

/// Export into an in-memory archive
pub async fn export_archive_bytes(store: &GraphStore) -> Result<(Vec<u8>, ExportReport)> {
    let mut buffer = Cursor::new(Vec::new());
    let report = export_archive(store, &mut buffer).await?;
    Ok((buffer.into_inner(), report))
}

/// Import from an in-memory archive
pub async fn import_archive_bytes(store: &mut GraphStore, bytes: &[u8]) -> Result<ImportReport> {
    import_archive(store, Cursor::new(bytes)).await
}

// ========== Record Conversion ==========

fn bare_record(node: &Node) -> NodeRecord {
    NodeRecord {
        id: node.id.clone(),
        x: node.x,
        y: node.y,
        size: node.size,
        label: node.label.clone(),
        description: node.description.clone(),
        color: node.color.clone(),
        shape: node.shape,
        attached_file: None,
    }
}

fn inline_record(node_id: &str, attachment: &Attachment) -> Result<AttachmentRecord> {
    let data = attachment.data_uri().ok_or_else(|| {
        GraphError::UnsupportedAttachment(format!(
            "attachment on {} is not inline; use an archive export",
            node_id
        ))
    })?;

    Ok(AttachmentRecord {
        name: attachment.name.clone(),
        data: data.to_string(),
        size: attachment.byte_size,
        mime_type: attachment.mime_type.clone(),
        upload_date: attachment.uploaded_at,
        is_blob: None,
    })
}

fn split_record(record: NodeRecord) -> (String, NodeAttrs, Option<AttachmentRecord>) {
    let NodeRecord {
        id,
        x,
        y,
        size,
        label,
        description,
        color,
        shape,
        attached_file,
    } = record;

    let attrs = NodeAttrs::at(x, y)
        .with_size(size)
        .with_label(label)
        .with_description(description)
        .with_color(color)
        .with_shape(shape);
    (id, attrs, attached_file)
}

fn finish_add_node(store: &mut GraphStore, id: String, attrs: NodeAttrs, report: &mut ImportReport) {
    let has_attachment = attrs.attached_file.is_some();
    match store.add_node(&id, attrs) {
        Ok(()) => {
            report.nodes += 1;
            if has_attachment {
                report.attachments += 1;
            }
        }
        Err(e) => report.warn(format!("Skipping node {}: {}", id, e)),
    }
}

fn add_edge_record(store: &mut GraphStore, edge: Edge, report: &mut ImportReport) {
    if let Some(existing) = store.edge_between(&edge.source, &edge.target) {
        report.warn(format!(
            "Skipping edge {}: pair already connected by {}",
            edge.id, existing.id
        ));
        return;
    }

    let Edge {
        id,
        source,
        target,
        size,
        color,
    } = edge;
    match store.add_edge_with_id(id.clone(), &source, &target, EdgeAttrs { size, color }) {
        Ok(_) => report.edges += 1,
        Err(e) => report.warn(format!("Skipping edge {}: {}", id, e)),
    }
}

/// Rebuild a live attachment from a plain-document record
fn restore_attachment(record: AttachmentRecord) -> Result<Attachment> {
    if record.is_blob.unwrap_or(false) {
        return Err(GraphError::UnsupportedAttachment(format!(
            "{} was exported as a live handle and cannot be restored",
            record.name
        )));
    }
    if !attachment::is_data_uri(&record.data) {
        return Err(GraphError::UnsupportedAttachment(format!(
            "{} has no inline payload",
            record.name
        )));
    }

    Ok(Attachment {
        name: record.name,
        mime_type: record.mime_type,
        byte_size: record.size,
        uploaded_at: record.upload_date,
        payload: AttachmentPayload::Inline { data: record.data },
    })
}

/// Rebuild a live attachment from a manifest record, pulling entry-path
/// payloads out of the archive
fn resolve_archive_attachment<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    record: AttachmentRecord,
) -> Result<Attachment> {
    if attachment::is_data_uri(&record.data) {
        return restore_attachment(record);
    }
    if record.is_blob.unwrap_or(false) {
        return Err(GraphError::UnsupportedAttachment(format!(
            "{} was exported as a live handle and cannot be restored",
            record.name
        )));
    }

    let bytes = attachment::read_archive_entry(archive, &record.data)?;
    let referenced = Attachment {
        name: record.name,
        mime_type: record.mime_type,
        byte_size: record.size,
        uploaded_at: record.upload_date,
        payload: AttachmentPayload::ArchiveRef { path: record.data },
    };
    Ok(referenced.to_inline(&bytes))
}

// ========== File Convenience ==========

/// File name for a dated export, e.g. "graph-export-2025-01-15.json"
pub fn default_export_filename(extension: &str) -> String {
    format!("graph-export-{}.{}", Utc::now().format("%Y-%m-%d"), extension)
}

/// Write a plain JSON export to disk
pub fn save_json_file(store: &GraphStore, path: &Path) -> anyhow::Result<()> {
    let json = export_json(store)
        .with_context(|| format!("Failed to export graph for {}", path.display()))?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write graph to {}", path.display()))?;
    Ok(())
}

/// Load a plain JSON export from disk
pub fn load_json_file(store: &mut GraphStore, path: &Path) -> anyhow::Result<ImportReport> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read graph from {}", path.display()))?;
    let report = import_json(store, &json)
        .with_context(|| format!("Failed to import graph from {}", path.display()))?;
    Ok(report)
}

/// Write an archive export to disk
pub async fn save_archive_file(store: &GraphStore, path: &Path) -> anyhow::Result<ExportReport> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create archive at {}", path.display()))?;
    let report = export_archive(store, BufWriter::new(file))
        .await
        .with_context(|| format!("Failed to export archive to {}", path.display()))?;
    Ok(report)
}

/// Load an archive export from disk
pub async fn load_archive_file(store: &mut GraphStore, path: &Path) -> anyhow::Result<ImportReport> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open archive at {}", path.display()))?;
    let report = import_archive(store, BufReader::new(file))
        .await
        .with_context(|| format!("Failed to import archive from {}", path.display()))?;
    Ok(report)
}
