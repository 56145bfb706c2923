use crate::error::{GraphError, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use memmap2::Mmap;
use std::fs;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use zip::ZipArchive;

/// Files strictly below this size are inlined as data URIs
pub const INLINE_SIZE_LIMIT: u64 = 5 * 1024 * 1024;

/// Staged files above this size are memory-mapped instead of read eagerly
const MMAP_THRESHOLD: u64 = 10_000_000;

/// A file attached to a node
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    /// Original file name
    pub name: String,

    /// MIME type, e.g. "application/pdf"
    pub mime_type: String,

    /// Size of the content in bytes
    pub byte_size: u64,

    /// When the file was attached
    pub uploaded_at: DateTime<Utc>,

    /// Where the content lives
    pub payload: AttachmentPayload,
}

/// Content location for an attachment
#[derive(Debug, Clone)]
pub enum AttachmentPayload {
    /// Content carried in place as a base64 data URI
    Inline { data: String },

    /// Content stored under the given entry path inside an archive
    ArchiveRef { path: String },

    /// Content staged on disk, held open until released
    Ephemeral(Arc<EphemeralHandle>),
}

impl PartialEq for AttachmentPayload {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Inline { data: a }, Self::Inline { data: b }) => a == b,
            (Self::ArchiveRef { path: a }, Self::ArchiveRef { path: b }) => a == b,
            (Self::Ephemeral(a), Self::Ephemeral(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Attachment {
    /// Build an inline attachment from raw bytes
    pub fn inline(name: impl Into<String>, mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        let mime_type = mime_type.into();
        let data = format!("data:{};base64,{}", mime_type, BASE64.encode(bytes));

        Self {
            name: name.into(),
            mime_type,
            byte_size: bytes.len() as u64,
            uploaded_at: Utc::now(),
            payload: AttachmentPayload::Inline { data },
        }
    }

    /// Stage a file from disk, inlining it when small enough
    pub fn stage_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.to_string())
            .ok_or_else(|| {
                GraphError::InvalidPayload(format!("no file name in {}", path.display()))
            })?;
        let mime_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        let byte_size = fs::metadata(path)?.len();

        if byte_size < INLINE_SIZE_LIMIT {
            let bytes = fs::read(path)?;
            Ok(Self::inline(name, mime_type, &bytes))
        } else {
            let handle = EphemeralHandle::open(path)?;
            Ok(Self {
                name,
                mime_type,
                byte_size,
                uploaded_at: Utc::now(),
                payload: AttachmentPayload::Ephemeral(Arc::new(handle)),
            })
        }
    }

    /// Same metadata with the content re-inlined from the given bytes
    pub fn to_inline(&self, bytes: &[u8]) -> Self {
        let data = format!("data:{};base64,{}", self.mime_type, BASE64.encode(bytes));

        Self {
            name: self.name.clone(),
            mime_type: self.mime_type.clone(),
            byte_size: bytes.len() as u64,
            uploaded_at: self.uploaded_at,
            payload: AttachmentPayload::Inline { data },
        }
    }

    /// The data URI, when the content is inline
    pub fn data_uri(&self) -> Option<&str> {
        match &self.payload {
            AttachmentPayload::Inline { data } => Some(data),
            _ => None,
        }
    }

    /// Decode the full content into memory
    pub fn materialize(&self) -> Result<Vec<u8>> {
        match &self.payload {
            AttachmentPayload::Inline { data } => decode_data_uri(data),
            AttachmentPayload::ArchiveRef { path } => Err(GraphError::UnsupportedAttachment(
                format!("archive entry not loaded: {}", path),
            )),
            AttachmentPayload::Ephemeral(handle) => handle.bytes(),
        }
    }

    pub fn is_inline(&self) -> bool {
        matches!(self.payload, AttachmentPayload::Inline { .. })
    }

    pub fn is_ephemeral(&self) -> bool {
        matches!(self.payload, AttachmentPayload::Ephemeral(_))
    }

    /// Release backing resources of an ephemeral payload; inline content is unaffected
    pub fn release(&self) {
        if let AttachmentPayload::Ephemeral(handle) = &self.payload {
            handle.release();
        }
    }
}

/// An open handle to a staged file too large to inline
#[derive(Debug)]
pub struct EphemeralHandle {
    path: PathBuf,
    size: u64,
    mmap: Mutex<Option<Mmap>>,
    released: AtomicBool,
}

impl EphemeralHandle {
    /// Open a staged file, memory-mapping it when large
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let size = fs::metadata(&path)?.len();

        let mmap = if size > MMAP_THRESHOLD {
            let file = fs::File::open(&path)?;
            Some(unsafe { Mmap::map(&file)? })
        } else {
            None
        };

        Ok(Self {
            path,
            size,
            mmap: Mutex::new(mmap),
            released: AtomicBool::new(false),
        })
    }

    /// Read the full content; fails once the handle has been released
    pub fn bytes(&self) -> Result<Vec<u8>> {
        if self.is_released() {
            return Err(GraphError::InvalidPayload(format!(
                "attachment released: {}",
                self.path.display()
            )));
        }

        let mmap = self.mmap.lock().unwrap_or_else(|e| e.into_inner());
        match mmap.as_ref() {
            Some(map) => Ok(map.to_vec()),
            None => Ok(fs::read(&self.path)?),
        }
    }

    /// Drop the mapping and mark the handle unusable
    pub fn release(&self) {
        self.released.store(true, Ordering::SeqCst);
        *self.mmap.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }

    pub fn is_mmapped(&self) -> bool {
        self.mmap
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Archive entry path for a node's attachment, e.g. "files/node1_report.pdf"
pub fn archive_entry_path(node_id: &str, file_name: &str) -> String {
    format!("files/{}_{}", node_id, file_name)
}

/// Check whether a string is a base64 data URI
pub fn is_data_uri(data: &str) -> bool {
    data.starts_with("data:") && data.contains(";base64,")
}

/// Decode the payload of a base64 data URI
pub fn decode_data_uri(data: &str) -> Result<Vec<u8>> {
    let rest = data
        .strip_prefix("data:")
        .ok_or_else(|| GraphError::InvalidPayload("not a data URI".to_string()))?;
    let (_, encoded) = rest
        .split_once(";base64,")
        .ok_or_else(|| GraphError::InvalidPayload("data URI is not base64".to_string()))?;

    BASE64
        .decode(encoded)
        .map_err(|e| GraphError::InvalidPayload(format!("bad base64 payload: {}", e)))
}

/// Read one entry of an open archive into memory
pub fn read_archive_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: &str,
) -> Result<Vec<u8>> {
    let mut entry = match archive.by_name(path) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => {
            return Err(GraphError::MissingArchiveEntry(path.to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    let mut bytes = Vec::with_capacity(entry.size() as usize);
    entry.read_to_end(&mut bytes)?;
    Ok(bytes)
}
