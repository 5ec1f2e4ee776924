//! Host document structure: where the server list lives.

use serde::{Deserialize, Serialize};

/// Selectors describing the sidebar in the host page.
///
/// These track the chat client's markup and change whenever the client
/// ships a redesign; nothing in the matcher depends on their values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SidebarConfig {
    /// Uniquely identifies the list root.
    pub root_selector: String,
    /// Matches each list item below the root.
    pub item_selector: String,
    /// Resolves the element carrying the name, relative to an item.
    pub name_selector: String,
    /// Attribute on the name element holding the display name.
    pub name_attribute: String,
}

impl Default for SidebarConfig {
    fn default() -> Self {
        Self {
            root_selector: r#"div[aria-label="Servers"]"#.into(),
            item_selector: "div.listItem__650eb".into(),
            name_selector: "div > div[data-dnd-name]".into(),
            name_attribute: "data-dnd-name".into(),
        }
    }
}
