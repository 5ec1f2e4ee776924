//! The boolean match test between a display name and a query.

use serde::{Deserialize, Serialize};

/// Which match test a search uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Name contains the query as a contiguous substring.
    #[default]
    Substring,
    /// Every character of the query occurs somewhere in the name, in any
    /// order. Repeated query characters only need to occur once.
    Letters,
}

impl MatchMode {
    pub fn from_advanced(advanced: bool) -> Self {
        if advanced {
            Self::Letters
        } else {
            Self::Substring
        }
    }
}

/// Case folding applied to both sides before comparison.
pub fn fold_case(s: &str) -> String {
    s.to_lowercase()
}

/// Test an already case-folded `name` against an already case-folded
/// `query`. An empty query matches every name in both modes.
pub fn is_match(name: &str, query: &str, mode: MatchMode) -> bool {
    match mode {
        MatchMode::Substring => name.contains(query),
        MatchMode::Letters => query.chars().all(|c| name.contains(c)),
    }
}
