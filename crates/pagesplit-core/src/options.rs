//! Split configuration
//!
//! Options arrive as JSON from the command layer or the CLI, e.g.
//! `{"mode":"custom-range","ranges":[{"from":1,"to":3}],"merge":true}`.
//! Only the fields relevant to the active mode are consulted.

use serde::{Deserialize, Serialize};

/// How groups are derived from the options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SplitMode {
    /// One output per declared range
    CustomRange,
    /// Consecutive chunks of `fixed_count` pages
    FixedRange,
    /// One output per page
    ExtractAll,
    /// Pages named by a free-form selection string
    ExtractSelect,
}

/// A 1-based inclusive page range as entered by a user.
///
/// `from > to` is allowed and normalized by the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeSpec {
    pub from: i64,
    pub to: i64,
}

impl RangeSpec {
    pub fn new(from: i64, to: i64) -> Self {
        Self { from, to }
    }

    /// Clamp both ends into `[1, page_count]` and put them in order.
    ///
    /// Returns `None` for an empty document.
    pub fn normalize(&self, page_count: usize) -> Option<(usize, usize)> {
        if page_count == 0 {
            return None;
        }
        let max = page_count as i64;
        let from = self.from.clamp(1, max) as usize;
        let to = self.to.clamp(1, max) as usize;
        Some((from.min(to), from.max(to)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitOptions {
    pub mode: SplitMode,
    #[serde(default)]
    pub ranges: Vec<RangeSpec>,
    #[serde(default = "default_fixed_count")]
    pub fixed_count: i64,
    #[serde(default)]
    pub extract_pages: String,
    /// Collapse the logical groups into a single output
    #[serde(default)]
    pub merge: bool,
}

fn default_fixed_count() -> i64 {
    1
}

impl SplitOptions {
    pub fn new(mode: SplitMode) -> Self {
        Self {
            mode,
            ranges: Vec::new(),
            fixed_count: default_fixed_count(),
            extract_pages: String::new(),
            merge: false,
        }
    }

    pub fn custom_ranges(ranges: Vec<RangeSpec>, merge: bool) -> Self {
        Self {
            ranges,
            merge,
            ..Self::new(SplitMode::CustomRange)
        }
    }

    pub fn fixed(fixed_count: i64) -> Self {
        Self {
            fixed_count,
            ..Self::new(SplitMode::FixedRange)
        }
    }

    pub fn extract_all() -> Self {
        Self::new(SplitMode::ExtractAll)
    }

    pub fn extract_select(extract_pages: &str, merge: bool) -> Self {
        Self {
            extract_pages: extract_pages.to_string(),
            merge,
            ..Self::new(SplitMode::ExtractSelect)
        }
    }
}
