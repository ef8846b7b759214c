//! Page reordering
//!
//! A [`ReorderSession`] holds the live arrangement of a document's pages as
//! an ordered list of entries. Each entry has a stable id that is not its
//! page number, so an interaction layer can move entries around without
//! renumbering anything. `move_page` and `remove_page` are plain list
//! operations; nothing touches the document until `commit`.

use crate::assemble::create_document;
use crate::error::PageSplitError;
use crate::output::{output_name, OutputDocument};
use crate::source::SourceDocument;
use serde::{Deserialize, Serialize};

/// Opaque handle for one entry of the arrangement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageEntryId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageEntry {
    pub id: PageEntryId,
    /// 0-based page index in the source document
    pub original_index: usize,
}

#[derive(Debug, Clone)]
pub struct ReorderSession {
    entries: Vec<PageEntry>,
    commits: u32,
}

impl ReorderSession {
    /// Start from the identity arrangement of `page_count` pages
    pub fn new(page_count: usize) -> Self {
        let entries = (0..page_count)
            .map(|index| PageEntry {
                id: PageEntryId(index as u64 + 1),
                original_index: index,
            })
            .collect();
        Self {
            entries,
            commits: 0,
        }
    }

    pub fn for_source(source: &SourceDocument) -> Self {
        Self::new(source.page_count())
    }

    pub fn entries(&self) -> &[PageEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current position of an entry
    pub fn position(&self, id: PageEntryId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    /// Id of the entry currently at `position`
    pub fn id_at(&self, position: usize) -> Option<PageEntryId> {
        self.entries.get(position).map(|entry| entry.id)
    }

    /// Take an entry out and reinsert it at `to_position`.
    ///
    /// Positions past the end put the entry last. Returns false if the id
    /// is unknown (e.g. already removed).
    pub fn move_page(&mut self, id: PageEntryId, to_position: usize) -> bool {
        let Some(from) = self.position(id) else {
            return false;
        };
        let entry = self.entries.remove(from);
        let to = to_position.min(self.entries.len());
        self.entries.insert(to, entry);
        true
    }

    /// Drop an entry. The page can only come back by starting a new session.
    pub fn remove_page(&mut self, id: PageEntryId) -> bool {
        match self.position(id) {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }

    /// The source page indices in their current order
    pub fn order(&self) -> Vec<usize> {
        self.entries.iter().map(|entry| entry.original_index).collect()
    }

    /// How many times this arrangement has been committed
    pub fn commit_count(&self) -> u32 {
        self.commits
    }

    /// Build the reordered document.
    ///
    /// The output is independent of the session: later moves and removals
    /// only affect a later commit.
    pub fn commit(
        &mut self,
        source: &SourceDocument,
        base_name: &str,
    ) -> Result<OutputDocument, PageSplitError> {
        let output = reorder_document(source, &self.order(), base_name)?;
        self.commits += 1;
        Ok(output)
    }
}

/// Build a single document from any final page order.
///
/// `order` holds 0-based source indices and may omit or repeat pages.
pub fn reorder_document(
    source: &SourceDocument,
    order: &[usize],
    base_name: &str,
) -> Result<OutputDocument, PageSplitError> {
    if order.is_empty() {
        return Err(PageSplitError::invalid_plan("No pages remaining."));
    }

    let name = output_name(base_name, "reordered");
    let bytes = create_document(source, order).map_err(|e| e.for_group(&name))?;

    tracing::info!(output = %name, pages = order.len(), "committed page order");

    Ok(OutputDocument::new(name, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{create_test_pdf, page_labels};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_starts_as_identity() {
        let session = ReorderSession::new(4);
        assert_eq!(session.order(), vec![0, 1, 2, 3]);
        assert_eq!(session.len(), 4);
    }

    #[test]
    fn test_ids_are_stable_across_moves() {
        let mut session = ReorderSession::new(4);
        let last = session.id_at(3).unwrap();

        assert!(session.move_page(last, 0));
        assert_eq!(session.order(), vec![3, 0, 1, 2]);
        assert_eq!(session.position(last), Some(0));
        assert_eq!(session.entries()[0].id, last);
    }

    #[test]
    fn test_move_forward_and_past_end() {
        let mut session = ReorderSession::new(4);
        let first = session.id_at(0).unwrap();

        assert!(session.move_page(first, 2));
        assert_eq!(session.order(), vec![1, 2, 0, 3]);

        assert!(session.move_page(first, 99));
        assert_eq!(session.order(), vec![1, 2, 3, 0]);
    }

    #[test]
    fn test_remove_is_permanent() {
        let mut session = ReorderSession::new(3);
        let middle = session.id_at(1).unwrap();

        assert!(session.remove_page(middle));
        assert_eq!(session.order(), vec![0, 2]);
        assert!(!session.remove_page(middle));
        assert!(!session.move_page(middle, 0));
        assert_eq!(session.position(middle), None);
    }

    #[test]
    fn test_commit_builds_reordered_document() {
        let source = SourceDocument::load(&create_test_pdf(4)).unwrap();
        let mut session = ReorderSession::for_source(&source);
        session.move_page(session.id_at(2).unwrap(), 0);
        session.remove_page(session.id_at(3).unwrap());

        let output = session.commit(&source, "deck").unwrap();
        assert_eq!(output.name, "deck-reordered.pdf");
        assert_eq!(page_labels(&output.bytes), vec![3, 1, 2]);
        assert_eq!(session.commit_count(), 1);
    }

    #[test]
    fn test_later_edits_do_not_touch_committed_output() {
        let source = SourceDocument::load(&create_test_pdf(3)).unwrap();
        let mut session = ReorderSession::for_source(&source);

        let first = session.commit(&source, "deck").unwrap();
        session.remove_page(session.id_at(0).unwrap());
        let second = session.commit(&source, "deck").unwrap();

        assert_eq!(page_labels(&first.bytes), vec![1, 2, 3]);
        assert_eq!(page_labels(&second.bytes), vec![2, 3]);
        assert_eq!(session.commit_count(), 2);
    }

    #[test]
    fn test_commit_with_everything_removed_fails() {
        let source = SourceDocument::load(&create_test_pdf(2)).unwrap();
        let mut session = ReorderSession::for_source(&source);
        while let Some(id) = session.id_at(0) {
            session.remove_page(id);
        }

        let err = session.commit(&source, "deck").unwrap_err();
        assert_eq!(err.to_string(), "No pages remaining.");
        assert_eq!(session.commit_count(), 0);
    }

    #[test]
    fn test_reorder_document_allows_repeats() {
        let source = SourceDocument::load(&create_test_pdf(3)).unwrap();
        let output = reorder_document(&source, &[2, 2, 0], "deck").unwrap();
        assert_eq!(page_labels(&output.bytes), vec![3, 3, 1]);
    }

    #[test]
    fn test_reorder_document_out_of_range_names_output() {
        let source = SourceDocument::load(&create_test_pdf(3)).unwrap();
        let err = reorder_document(&source, &[0, 7], "deck").unwrap_err();
        assert!(err.to_string().starts_with("Failed to assemble deck-reordered.pdf"));
    }

    proptest! {
        /// Property: moves alone only ever permute the pages
        #[test]
        fn moves_preserve_page_set(
            page_count in 1usize..30,
            moves in prop::collection::vec((0usize..30, 0usize..40), 0..20)
        ) {
            let mut session = ReorderSession::new(page_count);
            for (from, to) in moves {
                if let Some(id) = session.id_at(from % page_count) {
                    prop_assert!(session.move_page(id, to));
                }
            }
            let mut order = session.order();
            order.sort_unstable();
            prop_assert_eq!(order, (0..page_count).collect::<Vec<_>>());
        }
    }
}
