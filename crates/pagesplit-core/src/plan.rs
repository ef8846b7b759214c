//! Split planning
//!
//! Maps `(SplitOptions, page_count)` to an ordered list of named page
//! groups. Each group becomes one output document. Planning is pure: it
//! never touches the document itself.

use crate::error::PageSplitError;
use crate::options::{SplitMode, SplitOptions};
use crate::ranges::parse_selection;
use serde::Serialize;

/// A named, ordered list of 0-based page indices destined for one output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    pub name: String,
    pub indices: Vec<usize>,
}

impl Group {
    pub fn new(name: impl Into<String>, indices: Vec<usize>) -> Self {
        Self {
            name: name.into(),
            indices,
        }
    }

    fn single_page(index: usize) -> Self {
        Self::new(format!("page-{}", index + 1), vec![index])
    }
}

/// Compute the groups for a split.
///
/// Out-of-range page numbers are clamped or dropped, never reported. The
/// only failure is [`PageSplitError::InvalidPlan`] when nothing can be
/// produced.
pub fn plan_split(
    options: &SplitOptions,
    page_count: usize,
) -> Result<Vec<Group>, PageSplitError> {
    let groups = match options.mode {
        SplitMode::CustomRange => plan_custom_ranges(options, page_count)?,
        SplitMode::FixedRange => plan_fixed_ranges(options.fixed_count, page_count),
        SplitMode::ExtractAll => (0..page_count).map(Group::single_page).collect(),
        SplitMode::ExtractSelect => plan_extract_select(options, page_count)?,
    };

    let groups: Vec<Group> = groups
        .into_iter()
        .filter(|group| !group.indices.is_empty())
        .collect();

    if groups.is_empty() {
        return Err(PageSplitError::invalid_plan("Document has no pages."));
    }

    tracing::debug!(
        mode = ?options.mode,
        page_count,
        groups = groups.len(),
        "planned split"
    );

    Ok(groups)
}

fn plan_custom_ranges(
    options: &SplitOptions,
    page_count: usize,
) -> Result<Vec<Group>, PageSplitError> {
    if options.ranges.is_empty() {
        return Err(PageSplitError::invalid_plan("No ranges specified."));
    }

    let groups: Vec<Group> = options
        .ranges
        .iter()
        .filter_map(|range| range.normalize(page_count))
        .map(|(from, to)| Group::new(format!("range-{}-{}", from, to), (from - 1..to).collect()))
        .collect();

    if options.merge {
        // Overlapping ranges keep their duplicate pages
        let indices = groups.into_iter().flat_map(|g| g.indices).collect();
        return Ok(vec![Group::new("merged-ranges", indices)]);
    }

    Ok(groups)
}

fn plan_fixed_ranges(fixed_count: i64, page_count: usize) -> Vec<Group> {
    let step = usize::try_from(fixed_count.max(1)).unwrap_or(usize::MAX);
    (0..page_count)
        .step_by(step)
        .map(|start| {
            let end = start.saturating_add(step).min(page_count);
            Group::new(format!("range-{}-{}", start + 1, end), (start..end).collect())
        })
        .collect()
}

fn plan_extract_select(
    options: &SplitOptions,
    page_count: usize,
) -> Result<Vec<Group>, PageSplitError> {
    let indices = parse_selection(&options.extract_pages, page_count);
    if indices.is_empty() {
        return Err(PageSplitError::invalid_plan("No valid pages selected."));
    }

    if options.merge {
        return Ok(vec![Group::new("extracted-merged", indices)]);
    }

    Ok(indices.into_iter().map(Group::single_page).collect())
}
