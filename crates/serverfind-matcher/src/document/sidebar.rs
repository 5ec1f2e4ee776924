//! Builds the chat client's server-list markup inside a [`MemoryDocument`].
//!
//! The generated structure follows the default `[sidebar]` selectors:
//!
//! ```text
//! body > nav > div[aria-label="Servers"]
//!            > div.listItem__650eb > div > div[data-dnd-name="<name>"]
//! ```

use super::memory::{MemoryDocument, NodeId};

pub const SERVERS_LABEL: &str = "Servers";
pub const LIST_ITEM_CLASS: &str = "listItem__650eb";
pub const NAME_ATTRIBUTE: &str = "data-dnd-name";

/// Render an empty server list into the document body and return its root.
pub fn mount_server_list(doc: &mut MemoryDocument) -> NodeId {
    let nav = doc.create_element("nav");
    doc.append_child(doc.body(), nav);
    let root = doc.create_element("div");
    doc.set_attribute(root, "aria-label", SERVERS_LABEL);
    doc.append_child(nav, root);
    root
}

/// Append one server entry to `list`. An empty `name` renders an item
/// without a name element, like the client's folder and separator rows.
/// Returns the name element, if one was created.
pub fn append_server(doc: &mut MemoryDocument, list: NodeId, name: &str) -> Option<NodeId> {
    let item = doc.create_element("div");
    doc.add_class(item, LIST_ITEM_CLASS);
    doc.append_child(list, item);

    let wrapper = doc.create_element("div");
    doc.append_child(item, wrapper);
    if name.is_empty() {
        return None;
    }

    let named = doc.create_element("div");
    doc.set_attribute(named, NAME_ATTRIBUTE, name);
    doc.append_child(wrapper, named);
    Some(named)
}

/// Mount a server list containing `names` in order.
pub fn render_server_list<S: AsRef<str>>(doc: &mut MemoryDocument, names: &[S]) -> NodeId {
    let root = mount_server_list(doc);
    for name in names {
        append_server(doc, root, name.as_ref());
    }
    root
}
