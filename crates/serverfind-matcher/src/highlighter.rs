//! Search, highlight, and navigate over one document context.

use tracing::{debug, info};

use crate::adapter::DocumentAdapter;
use crate::mark::{HighlightStyle, ScrollOptions};
use crate::match_set::MatchSet;
use crate::predicate::{fold_case, is_match, MatchMode};

/// Arguments of a single search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub query: String,
    /// Outline color for this search's marks.
    pub color: String,
    /// Scroll the first match into view.
    pub auto_scroll: bool,
    pub mode: MatchMode,
}

/// Owns the match state for one document context.
///
/// Create one per attached document and call [`Highlighter::reset`] when
/// the document navigates away. Every operation runs to completion without
/// yielding, so callers only need to serialize access.
pub struct Highlighter<D: DocumentAdapter> {
    document: D,
    style: HighlightStyle,
    matches: MatchSet<D::Handle>,
}

impl<D: DocumentAdapter> Highlighter<D> {
    pub fn new(document: D, style: HighlightStyle) -> Self {
        Self {
            document,
            style,
            matches: MatchSet::empty(),
        }
    }

    /// Clear previous highlights, then mark every item whose name matches.
    /// Returns the number of matches; a missing list root yields zero.
    pub fn search(&mut self, params: &SearchParams) -> usize {
        self.clear();

        let Some(root) = self.document.locate_root() else {
            debug!("search: list root not present");
            return 0;
        };

        let query = fold_case(&params.query);
        let mark = self.style.mark(&params.color);
        let mut found = Vec::new();

        for item in self.document.list_items(&root) {
            let Some((name_node, name)) = self.document.resolve_name(&item) else {
                continue;
            };
            if is_match(&fold_case(&name), &query, params.mode) {
                self.document.apply_mark(&name_node, &mark);
                found.push(name_node);
            }
        }

        self.matches = MatchSet::from_items(found);
        let count = self.matches.len();

        if params.auto_scroll {
            if let Some(first) = self.matches.current() {
                self.document.scroll_into_view(first, ScrollOptions::CENTERED);
            }
        }

        info!(count, mode = ?params.mode, "search completed");
        count
    }

    /// Remove every mark and forget the current matches. Always succeeds.
    pub fn clear(&mut self) {
        let marker = &self.style.marker_class;
        let mut stale = self.document.marked(marker);
        for item in self.matches.items() {
            if !stale.contains(item) {
                stale.push(item.clone());
            }
        }
        for node in &stale {
            self.document.remove_mark(node, marker);
        }
        if !stale.is_empty() {
            debug!(removed = stale.len(), "highlights cleared");
        }
        self.matches = MatchSet::empty();
    }

    /// Scroll to the next match, wrapping after the last. Returns `false`
    /// without doing anything when there are no matches.
    pub fn advance(&mut self) -> bool {
        let Some(next) = self.matches.advance().cloned() else {
            debug!("advance: no matches");
            return false;
        };
        self.document.scroll_into_view(&next, ScrollOptions::CENTERED);
        debug!(cursor = ?self.matches.cursor(), "advanced to next match");
        true
    }

    /// Whether the list root is currently present.
    pub fn is_ready(&self) -> bool {
        self.document.locate_root().is_some()
    }

    /// Drop match state without touching the document. Used when the
    /// document was replaced by a navigation.
    pub fn reset(&mut self) {
        self.matches = MatchSet::empty();
    }

    pub fn matches(&self) -> &MatchSet<D::Handle> {
        &self.matches
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    /// Mutable access for hosts that render into the document. Handles held
    /// in the current match set may go stale; the next search rebuilds them.
    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }
}
