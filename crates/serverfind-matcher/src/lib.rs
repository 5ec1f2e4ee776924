//! Find-in-sidebar core: match server names against a query, highlight the
//! matches in the host document, and step through them.
//!
//! The host document sits behind [`DocumentAdapter`] so the logic runs the
//! same against a live page or the in-memory [`MemoryDocument`].

pub mod adapter;
pub mod document;
pub mod highlighter;
pub mod mark;
pub mod match_set;
pub mod predicate;

pub use adapter::DocumentAdapter;
pub use document::{MemoryDocument, NodeId};
pub use highlighter::{Highlighter, SearchParams};
pub use mark::{HighlightMark, HighlightStyle, ScrollOptions};
pub use match_set::MatchSet;
pub use predicate::{fold_case, is_match, MatchMode};
