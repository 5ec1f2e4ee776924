//! An in-memory element tree implementing [`DocumentAdapter`].

use std::collections::BTreeMap;

use serverfind_common::ConfigError;
use serverfind_config::schema::SidebarConfig;
use serverfind_config::{parse_selector, Selector, SelectorTree};

use crate::adapter::DocumentAdapter;
use crate::mark::{HighlightMark, ScrollOptions, MARK_STYLE_PROPERTIES};

/// Handle to an element in a [`MemoryDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    style: BTreeMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: BTreeMap::new(),
            classes: Vec::new(),
            style: BTreeMap::new(),
            parent: None,
            children: Vec::new(),
        }
    }
}

/// Parsed `[sidebar]` selectors.
#[derive(Debug, Clone)]
struct SidebarSelectors {
    root: Selector,
    item: Selector,
    name: Selector,
    name_attribute: String,
}

/// A scroll request recorded by the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRecord {
    pub node: NodeId,
    pub options: ScrollOptions,
}

/// A mutable element tree standing in for a rendered page.
///
/// Nodes are never freed; [`MemoryDocument::remove`] detaches a subtree so
/// queries no longer reach it, like a DOM removal.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    nodes: Vec<Element>,
    html: NodeId,
    body: NodeId,
    selectors: SidebarSelectors,
    scrolls: Vec<ScrollRecord>,
}

impl MemoryDocument {
    /// An empty `<html><body></body></html>` document queried with the
    /// given sidebar selectors.
    pub fn new(sidebar: &SidebarConfig) -> Result<Self, ConfigError> {
        let selectors = SidebarSelectors {
            root: parse_selector(&sidebar.root_selector)?,
            item: parse_selector(&sidebar.item_selector)?,
            name: parse_selector(&sidebar.name_selector)?,
            name_attribute: sidebar.name_attribute.clone(),
        };
        let mut doc = Self {
            nodes: vec![Element::new("html")],
            html: NodeId(0),
            body: NodeId(0),
            selectors,
            scrolls: Vec::new(),
        };
        let body = doc.create_element("body");
        doc.append_child(doc.html, body);
        doc.body = body;
        Ok(doc)
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes.push(Element::new(tag));
        NodeId(self.nodes.len() - 1)
    }

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.remove(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Detach `node` (and its subtree) from the tree.
    pub fn remove(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != node);
        }
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        self.nodes[node.0]
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        self.nodes[node.0].attributes.remove(name);
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        let classes = &mut self.nodes[node.0].classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        self.nodes[node.0].classes.retain(|c| c != class);
    }

    /// Inline style property value, if set.
    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.nodes[node.0].style.get(property).map(String::as_str)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// Every scroll request, oldest first.
    pub fn scroll_history(&self) -> &[ScrollRecord] {
        &self.scrolls
    }

    /// The most recently scrolled-to node.
    pub fn last_scrolled(&self) -> Option<NodeId> {
        self.scrolls.last().map(|r| r.node)
    }

    /// Descendants of `scope` (excluding `scope`) matching `selector`, in
    /// document order.
    pub fn query_selector_all(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[scope.0].children.iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            if selector.matches(self, node) {
                out.push(node);
            }
            stack.extend(self.nodes[node.0].children.iter().rev().copied());
        }
        out
    }

    /// First descendant of `scope` matching `selector`.
    pub fn query_selector(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        self.query_selector_all(scope, selector).into_iter().next()
    }
}

impl SelectorTree for MemoryDocument {
    type Node = NodeId;

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    fn tag(&self, node: NodeId) -> &str {
        &self.nodes[node.0].tag
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes[node.0].attributes.get(name).map(String::as_str)
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes[node.0].classes.iter().any(|c| c == class)
    }
}

impl DocumentAdapter for MemoryDocument {
    type Handle = NodeId;

    fn locate_root(&self) -> Option<NodeId> {
        self.query_selector(self.html, &self.selectors.root)
    }

    fn list_items(&self, root: &NodeId) -> Vec<NodeId> {
        self.query_selector_all(*root, &self.selectors.item)
    }

    fn resolve_name(&self, item: &NodeId) -> Option<(NodeId, String)> {
        let node = self.query_selector(*item, &self.selectors.name)?;
        let name = self.attribute(node, &self.selectors.name_attribute)?;
        Some((node, name.to_string()))
    }

    fn apply_mark(&mut self, node: &NodeId, mark: &HighlightMark) {
        let element = &mut self.nodes[node.0];
        for (property, value) in &mark.style {
            element.style.insert((*property).to_string(), value.clone());
        }
        self.add_class(*node, &mark.marker);
    }

    fn remove_mark(&mut self, node: &NodeId, marker: &str) {
        let element = &mut self.nodes[node.0];
        for property in MARK_STYLE_PROPERTIES {
            element.style.remove(*property);
        }
        self.remove_class(*node, marker);
    }

    fn marked(&self, marker: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.html];
        while let Some(node) = stack.pop() {
            if self.has_class(node, marker) {
                out.push(node);
            }
            stack.extend(self.nodes[node.0].children.iter().rev().copied());
        }
        out
    }

    fn scroll_into_view(&mut self, node: &NodeId, options: ScrollOptions) {
        self.scrolls.push(ScrollRecord {
            node: *node,
            options,
        });
    }
}
