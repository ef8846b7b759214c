//! PDF split, reorder and merge engine
//!
//! This crate derives new documents from a page-addressable source using
//! lopdf. Every output goes through one primitive,
//! [`assemble::create_document`], which copies pages in a given order.
//!
//! - Splitting: [`plan::plan_split`] turns [`SplitOptions`] into named page
//!   groups, and a [`SplitJob`] assembles one output per group.
//! - Reordering: a [`ReorderSession`] holds a movable list of pages and
//!   commits it to a single document.
//! - Merging: [`merge_documents`] concatenates whole files.

pub mod assemble;
pub mod command;
pub mod error;
pub mod job;
pub mod merge;
pub mod options;
pub mod output;
pub mod page_info;
pub mod plan;
pub mod preview;
pub mod ranges;
pub mod reorder;
pub mod source;

#[cfg(test)]
mod test_support;

pub use assemble::{create_document, rebuild_document};
pub use command::{execute_command, execute_json, PdfCommand, ProcessMetrics, ProcessResult};
pub use error::PageSplitError;
pub use job::{run_split, CancelToken, SplitJob};
pub use merge::merge_documents;
pub use options::{RangeSpec, SplitMode, SplitOptions};
pub use output::{
    base_name_of, output_name, CollectSink, DirectorySink, OutputDocument, OutputSink,
};
pub use page_info::{PageInfo, PageOrientation};
pub use plan::{plan_split, Group};
pub use preview::{collect_previews, BlankPageRenderer, PagePreview, ThumbnailRenderer};
pub use ranges::{parse_selection, parse_selection_in_order};
pub use reorder::{reorder_document, PageEntry, PageEntryId, ReorderSession};
pub use source::{PdfInfo, SourceDocument};

/// Parse PDF bytes and return page count
pub fn get_page_count(bytes: &[u8]) -> Result<usize, PageSplitError> {
    Ok(SourceDocument::load(bytes)?.page_count())
}
