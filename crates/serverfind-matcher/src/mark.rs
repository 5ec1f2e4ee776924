//! The visual annotation applied to matched entries.

use serverfind_config::schema::HighlightConfig;

/// Inline style properties reset when a mark is removed.
pub const MARK_STYLE_PROPERTIES: &[&str] = &["box-shadow", "border", "border-radius", "background-color"];

/// Marker class plus the inline style payload for one search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightMark {
    pub marker: String,
    pub style: Vec<(&'static str, String)>,
}

/// Appearance constants that do not change between searches.
#[derive(Debug, Clone)]
pub struct HighlightStyle {
    pub marker_class: String,
    pub outline_width_px: u32,
    pub border_radius: String,
    pub background: String,
}

impl HighlightStyle {
    /// Build the mark for a search using `color` as the outline color.
    pub fn mark(&self, color: &str) -> HighlightMark {
        HighlightMark {
            marker: self.marker_class.clone(),
            style: vec![
                (
                    "box-shadow",
                    format!("0 0 0 {}px {color}", self.outline_width_px),
                ),
                ("border-radius", self.border_radius.clone()),
                ("background-color", self.background.clone()),
            ],
        }
    }
}

impl From<&HighlightConfig> for HighlightStyle {
    fn from(config: &HighlightConfig) -> Self {
        Self {
            marker_class: config.marker_class.clone(),
            outline_width_px: config.outline_width_px,
            border_radius: config.border_radius.clone(),
            background: config.background.clone(),
        }
    }
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self::from(&HighlightConfig::default())
    }
}

/// How a matched entry is brought into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollOptions {
    pub smooth: bool,
    /// Center the entry vertically instead of scrolling it just into view.
    pub centered: bool,
}

impl ScrollOptions {
    /// Smooth scroll that centers the entry vertically.
    pub const CENTERED: Self = Self {
        smooth: true,
        centered: true,
    };
}
