//! Source document loading
//!
//! A [`SourceDocument`] is parsed once from raw bytes and never mutated.
//! Every planning and assembly call reads from it.

use crate::error::PageSplitError;
use lopdf::{Document, ObjectId};
use serde::Serialize;

/// File information collected while loading a source
#[derive(Debug, Clone, Serialize, Default)]
pub struct PdfInfo {
    /// Number of pages in the document
    pub page_count: usize,
    /// PDF version string (e.g., "1.7")
    pub version: String,
    /// Whether the document is encrypted
    pub encrypted: bool,
    /// File size in bytes
    pub size_bytes: usize,
    /// Document title from metadata (if available)
    pub title: Option<String>,
    /// Document author from metadata (if available)
    pub author: Option<String>,
}

/// An immutable, page-addressable source document
#[derive(Debug, Clone)]
pub struct SourceDocument {
    document: Document,
    page_ids: Vec<ObjectId>,
    info: PdfInfo,
}

impl SourceDocument {
    /// Parse PDF bytes into a source document.
    ///
    /// Fails with [`PageSplitError::Load`] when the bytes are not a PDF or
    /// the page tree is empty.
    pub fn load(bytes: &[u8]) -> Result<Self, PageSplitError> {
        if bytes.len() < 8 {
            return Err(PageSplitError::Load(
                "File too small to be a valid PDF".into(),
            ));
        }

        if !bytes.starts_with(b"%PDF-") {
            return Err(PageSplitError::Load(
                "Not a valid PDF file (missing %PDF- header)".into(),
            ));
        }

        let document =
            Document::load_mem(bytes).map_err(|e| PageSplitError::Load(e.to_string()))?;

        // get_pages is keyed by 1-based page number, so values come out in page order
        let page_ids: Vec<ObjectId> = document.get_pages().into_values().collect();
        if page_ids.is_empty() {
            return Err(PageSplitError::Load("PDF has no pages".into()));
        }

        let encrypted = document.is_encrypted();
        if encrypted {
            tracing::warn!("source document is encrypted, page copies may fail");
        }

        let (title, author) = extract_metadata(&document);
        let info = PdfInfo {
            page_count: page_ids.len(),
            version: extract_version(bytes),
            encrypted,
            size_bytes: bytes.len(),
            title,
            author,
        };

        tracing::debug!(
            pages = info.page_count,
            version = %info.version,
            "loaded source document"
        );

        Ok(Self {
            document,
            page_ids,
            info,
        })
    }

    /// Number of pages (`N`)
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Object id of the page at a 0-based index
    pub fn page_id(&self, index: usize) -> Option<ObjectId> {
        self.page_ids.get(index).copied()
    }

    pub fn page_ids(&self) -> &[ObjectId] {
        &self.page_ids
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn info(&self) -> &PdfInfo {
        &self.info
    }
}

/// Extract PDF version from header
fn extract_version(bytes: &[u8]) -> String {
    // Header format: %PDF-1.7
    if bytes.len() >= 8 && bytes.starts_with(b"%PDF-") {
        if let Ok(version) = std::str::from_utf8(&bytes[5..8]) {
            return version.trim().to_string();
        }
    }
    "1.4".to_string()
}

/// Extract title and author from the Info dictionary
fn extract_metadata(document: &Document) -> (Option<String>, Option<String>) {
    let info_dict = document
        .trailer
        .get(b"Info")
        .and_then(|obj| obj.as_reference())
        .and_then(|id| document.get_dictionary(id));

    let Ok(info_dict) = info_dict else {
        return (None, None);
    };

    let read = |key: &[u8]| {
        info_dict
            .get(key)
            .and_then(|obj| obj.as_str())
            .ok()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .filter(|s| !s.is_empty())
    };

    (read(b"Title"), read(b"Author"))
}
