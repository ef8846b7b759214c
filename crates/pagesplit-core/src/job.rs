//! Split jobs
//!
//! A [`SplitJob`] carries everything one split needs: the loaded source,
//! the base name used for outputs, and the options. Nothing is kept in
//! ambient state between jobs; starting a new job means building a new value.

use crate::assemble::create_document;
use crate::error::PageSplitError;
use crate::options::SplitOptions;
use crate::output::{output_name, CollectSink, OutputDocument, OutputSink};
use crate::plan::{plan_split, Group};
use crate::source::SourceDocument;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation flag, checked between groups
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub struct SplitJob {
    source: SourceDocument,
    base_name: String,
    options: SplitOptions,
}

impl SplitJob {
    pub fn new(
        source: SourceDocument,
        base_name: impl Into<String>,
        options: SplitOptions,
    ) -> Self {
        Self {
            source,
            base_name: base_name.into(),
            options,
        }
    }

    pub fn source(&self) -> &SourceDocument {
        &self.source
    }

    pub fn options(&self) -> &SplitOptions {
        &self.options
    }

    /// Plan the groups without assembling anything
    pub fn plan(&self) -> Result<Vec<Group>, PageSplitError> {
        plan_split(&self.options, self.source.page_count())
    }

    /// Assemble every planned group, in plan order, handing each output to
    /// `sink` as soon as it is built.
    ///
    /// Returns the number of outputs produced. Stops with
    /// [`PageSplitError::Cancelled`] if `cancel` is set before a group
    /// starts; outputs already handed over stay with the sink.
    pub fn execute(
        &self,
        sink: &mut dyn OutputSink,
        cancel: &CancelToken,
    ) -> Result<usize, PageSplitError> {
        let groups = self.plan()?;
        let total = groups.len();

        for (i, group) in groups.into_iter().enumerate() {
            if cancel.is_cancelled() {
                tracing::info!(completed = i, total, "split cancelled");
                return Err(PageSplitError::Cancelled);
            }

            let name = output_name(&self.base_name, &group.name);
            let bytes = create_document(&self.source, &group.indices)
                .map_err(|e| e.for_group(&name))?;

            tracing::info!(
                output = %name,
                pages = group.indices.len(),
                bytes = bytes.len(),
                "assembled {}/{}",
                i + 1,
                total
            );

            sink.accept(OutputDocument::new(name, bytes))?;
        }

        Ok(total)
    }
}

/// Run a split to completion and collect every output in memory
pub fn run_split(job: &SplitJob) -> Result<Vec<OutputDocument>, PageSplitError> {
    let mut sink = CollectSink::new();
    job.execute(&mut sink, &CancelToken::new())?;
    Ok(sink.into_outputs())
}
