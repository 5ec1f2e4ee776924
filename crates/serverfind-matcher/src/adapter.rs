//! The seam between the matcher and a concrete host document.

use crate::mark::{HighlightMark, ScrollOptions};

/// Everything the highlighter needs from a host document.
///
/// Implementations own the knowledge of where the server list lives;
/// the matcher only sees opaque handles. A live page implementation wraps
/// DOM nodes, [`crate::MemoryDocument`] wraps an in-memory tree.
pub trait DocumentAdapter {
    type Handle: Clone + PartialEq + std::fmt::Debug;

    /// The list root, if the host has rendered it.
    fn locate_root(&self) -> Option<Self::Handle>;

    /// List items under `root`, in document order.
    fn list_items(&self, root: &Self::Handle) -> Vec<Self::Handle>;

    /// The element carrying an item's name, with the raw name. `None` when
    /// the item has no name element or the element lacks the attribute.
    fn resolve_name(&self, item: &Self::Handle) -> Option<(Self::Handle, String)>;

    fn apply_mark(&mut self, node: &Self::Handle, mark: &HighlightMark);

    /// Remove the style payload and the `marker` class from `node`.
    fn remove_mark(&mut self, node: &Self::Handle, marker: &str);

    /// Every element currently carrying the `marker` class.
    fn marked(&self, marker: &str) -> Vec<Self::Handle>;

    fn scroll_into_view(&mut self, node: &Self::Handle, options: ScrollOptions);
}
