//! Finished output documents and where they go
//!
//! Outputs are handed to an [`OutputSink`] one at a time as soon as they are
//! assembled, so a caller never has to hold every output in memory.

use crate::error::PageSplitError;
use std::path::{Path, PathBuf};

/// A produced document. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDocument {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl OutputDocument {
    pub fn new(name: String, bytes: Vec<u8>) -> Self {
        Self { name, bytes }
    }
}

/// `{base}-{suffix}.pdf`
pub fn output_name(base_name: &str, suffix: &str) -> String {
    format!("{}-{}.pdf", base_name, suffix)
}

/// Strip the directory and a trailing `.pdf` (any case) from a file name
pub fn base_name_of(file_name: &str) -> String {
    let name = Path::new(file_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(file_name);

    let lower = name.to_ascii_lowercase();
    let stem = match lower.strip_suffix(".pdf") {
        Some(stripped) if !stripped.is_empty() => &name[..stripped.len()],
        _ => name,
    };

    if stem.is_empty() {
        "document".to_string()
    } else {
        stem.to_string()
    }
}

/// Receiver of finished outputs
pub trait OutputSink {
    fn accept(&mut self, output: OutputDocument) -> Result<(), PageSplitError>;
}

/// Keeps every output in memory, in the order produced
#[derive(Debug, Default)]
pub struct CollectSink {
    pub outputs: Vec<OutputDocument>,
}

impl CollectSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_outputs(self) -> Vec<OutputDocument> {
        self.outputs
    }
}

impl OutputSink for CollectSink {
    fn accept(&mut self, output: OutputDocument) -> Result<(), PageSplitError> {
        self.outputs.push(output);
        Ok(())
    }
}

/// Writes each output into a directory and drops its bytes right away
#[derive(Debug)]
pub struct DirectorySink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    /// Create the directory if needed
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self, PageSplitError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            written: Vec::new(),
        })
    }

    /// Paths written so far, in order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl OutputSink for DirectorySink {
    fn accept(&mut self, output: OutputDocument) -> Result<(), PageSplitError> {
        let path = self.dir.join(&output.name);
        std::fs::write(&path, &output.bytes)?;
        tracing::info!(path = %path.display(), bytes = output.bytes.len(), "wrote output");
        self.written.push(path);
        Ok(())
    }
}
