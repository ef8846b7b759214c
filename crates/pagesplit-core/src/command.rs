//! JSON command surface
//!
//! One request in, one result out. Document bytes travel base64-encoded.
//!
//! ```json
//! {"type":"Split","file":"JVBERi0x...","name":"report.pdf",
//!  "options":{"mode":"fixed-range","fixedCount":2}}
//! ```

use crate::assemble::rebuild_document;
use crate::error::PageSplitError;
use crate::job::{run_split, SplitJob};
use crate::merge::merge_documents;
use crate::options::SplitOptions;
use crate::output::{base_name_of, output_name, OutputDocument};
use crate::reorder::reorder_document;
use crate::source::SourceDocument;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use std::time::Instant;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum PdfCommand {
    Split {
        file: String,
        #[serde(default)]
        name: Option<String>,
        options: SplitOptions,
    },
    Reorder {
        file: String,
        #[serde(default)]
        name: Option<String>,
        /// Final page order, 0-based; may omit or repeat pages
        order: Vec<usize>,
    },
    Merge {
        files: Vec<String>,
        #[serde(default)]
        name: Option<String>,
    },
    Rebuild {
        file: String,
        #[serde(default)]
        name: Option<String>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessResult {
    pub success: bool,
    pub outputs: Vec<EncodedOutput>,
    pub error: Option<String>,
    pub metrics: Option<ProcessMetrics>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EncodedOutput {
    pub name: String,
    /// Base64-encoded PDF data
    pub data: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessMetrics {
    pub input_size_bytes: usize,
    pub output_size_bytes: usize,
    pub page_count: usize,
    pub output_count: usize,
    pub processing_time_ms: u64,
}

/// Run a command. Failures are reported in the result, never panicked on.
pub fn execute_command(command: PdfCommand) -> ProcessResult {
    let started = Instant::now();

    match run_command(command) {
        Ok((input_size_bytes, page_count, outputs)) => {
            let metrics = ProcessMetrics {
                input_size_bytes,
                output_size_bytes: outputs.iter().map(|o| o.bytes.len()).sum(),
                page_count,
                output_count: outputs.len(),
                processing_time_ms: started.elapsed().as_millis() as u64,
            };
            ProcessResult {
                success: true,
                outputs: outputs
                    .into_iter()
                    .map(|o| EncodedOutput {
                        name: o.name,
                        data: STANDARD.encode(&o.bytes),
                    })
                    .collect(),
                error: None,
                metrics: Some(metrics),
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "command failed");
            ProcessResult {
                success: false,
                outputs: Vec::new(),
                error: Some(e.to_string()),
                metrics: None,
            }
        }
    }
}

/// Parse a JSON command and run it
pub fn execute_json(json: &str) -> ProcessResult {
    match serde_json::from_str::<PdfCommand>(json) {
        Ok(command) => execute_command(command),
        Err(e) => ProcessResult {
            success: false,
            outputs: Vec::new(),
            error: Some(PageSplitError::Serialization(e.to_string()).to_string()),
            metrics: None,
        },
    }
}

type CommandOutcome = (usize, usize, Vec<OutputDocument>);

fn run_command(command: PdfCommand) -> Result<CommandOutcome, PageSplitError> {
    match command {
        PdfCommand::Split {
            file,
            name,
            options,
        } => {
            let bytes = decode(&file)?;
            let source = SourceDocument::load(&bytes)?;
            let page_count = source.page_count();
            let job = SplitJob::new(source, base_name(name.as_deref()), options);
            Ok((bytes.len(), page_count, run_split(&job)?))
        }
        PdfCommand::Reorder { file, name, order } => {
            let bytes = decode(&file)?;
            let source = SourceDocument::load(&bytes)?;
            let output = reorder_document(&source, &order, &base_name(name.as_deref()))?;
            Ok((bytes.len(), source.page_count(), vec![output]))
        }
        PdfCommand::Merge { files, name } => {
            let documents = files
                .iter()
                .map(|file| decode(file))
                .collect::<Result<Vec<_>, _>>()?;
            let input_size = documents.iter().map(Vec::len).sum();
            let merged = merge_documents(documents)?;
            let page_count = SourceDocument::load(&merged)?.page_count();
            let output = OutputDocument::new(
                output_name(&base_name(name.as_deref()), "merged"),
                merged,
            );
            Ok((input_size, page_count, vec![output]))
        }
        PdfCommand::Rebuild { file, name } => {
            let bytes = decode(&file)?;
            let source = SourceDocument::load(&bytes)?;
            let rebuilt = rebuild_document(&source)?;
            let output = OutputDocument::new(
                output_name(&base_name(name.as_deref()), "rebuilt"),
                rebuilt,
            );
            Ok((bytes.len(), source.page_count(), vec![output]))
        }
    }
}

fn decode(data: &str) -> Result<Vec<u8>, PageSplitError> {
    STANDARD
        .decode(data.trim())
        .map_err(|e| PageSplitError::Serialization(format!("Invalid base64 payload: {}", e)))
}

fn base_name(name: Option<&str>) -> String {
    base_name_of(name.unwrap_or("document"))
}
