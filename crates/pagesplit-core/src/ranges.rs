//! Page selection parsing
//!
//! Turns free-form text like `"1-3, 5, 8-10"` into 0-based page indices.
//! Parsing never fails: tokens that don't parse or fall outside the
//! document are skipped, and the remaining tokens still count.

use std::collections::BTreeSet;

/// Parse a selection into sorted, unique 0-based page indices.
///
/// Range endpoints are clamped into `[1, page_count]` and reversed ranges
/// are normalized, so `"8-5"` selects the same pages as `"5-8"`.
pub fn parse_selection(input: &str, page_count: usize) -> Vec<usize> {
    let mut pages = BTreeSet::new();
    for_each_page(input, page_count, |page| {
        pages.insert(page);
    });
    pages.into_iter().collect()
}

/// Parse a selection keeping the order tokens were written in, duplicates
/// included. Each range token still expands in ascending order.
pub fn parse_selection_in_order(input: &str, page_count: usize) -> Vec<usize> {
    let mut pages = Vec::new();
    for_each_page(input, page_count, |page| pages.push(page));
    pages
}

fn for_each_page(input: &str, page_count: usize, mut emit: impl FnMut(usize)) {
    for part in input.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        if let Some((start, end)) = part.split_once('-') {
            let (Ok(start), Ok(end)) = (start.trim().parse::<usize>(), end.trim().parse::<usize>())
            else {
                tracing::debug!(token = part, "skipping malformed range");
                continue;
            };

            if page_count == 0 {
                continue;
            }

            let start = start.clamp(1, page_count);
            let end = end.clamp(1, page_count);
            for page in start.min(end)..=start.max(end) {
                emit(page - 1);
            }
        } else {
            match part.parse::<usize>() {
                Ok(page) if (1..=page_count).contains(&page) => emit(page - 1),
                _ => tracing::debug!(token = part, page_count, "skipping page token"),
            }
        }
    }
}
