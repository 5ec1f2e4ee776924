//! Highlight appearance.

use serde::{Deserialize, Serialize};

/// Style payload applied to matched entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Class added to every highlighted element so it can be found again.
    pub marker_class: String,
    /// Outline color used until the user picks one.
    pub default_color: String,
    /// Outline ring width (valid range: 1-8).
    pub outline_width_px: u32,
    pub border_radius: String,
    /// Background tint behind a highlighted entry.
    pub background: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            marker_class: "discord-search-highlight".into(),
            default_color: "#9ef01a".into(),
            outline_width_px: 2,
            border_radius: "0.5rem".into(),
            background: "rgba(158, 240, 26, 0.2)".into(),
        }
    }
}
