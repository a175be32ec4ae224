use alloc::borrow::ToOwned;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::Dom;

/// A handle into a [`MemoryDom`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub usize);

#[derive(Clone, Debug, Default)]
struct Element {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    offset_top: f64,
    offset_height: f64,
    client_height: f64,
    scroll_top: f64,
}

/// A small arena-backed element tree implementing [`Dom`].
///
/// This is the host used by the crate's tests and examples, and a reasonable starting point for
/// non-browser hosts (TUI/GUI document viewers) that want scroll-spy behavior without a real DOM.
///
/// Geometry is whatever the host sets: `offset_top` is in document coordinates and is not
/// derived from the tree.
#[derive(Clone, Debug)]
pub struct MemoryDom {
    nodes: Vec<Element>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    /// Creates a document containing a single `body` element (see [`MemoryDom::root`]).
    pub fn new() -> Self {
        Self {
            nodes: alloc::vec![Element {
                tag: "body".to_owned(),
                ..Element::default()
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Creates a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Element {
            tag: tag.to_owned(),
            ..Element::default()
        });
        id
    }

    /// Appends `child` as the last child of `parent`, detaching it from any previous parent.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(parent != child, "MemoryDom: cannot append a node to itself");
        if let Some(old) = self.nodes[child.0].parent.take() {
            self.nodes[old.0].children.retain(|&c| c != child);
        }
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    pub fn remove(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != node);
        }
    }

    /// Creates an element with the given classes and attributes and appends it to `parent`.
    ///
    /// `classes` is a whitespace-separated class list, as in markup.
    pub fn element(
        &mut self,
        parent: NodeId,
        tag: &str,
        classes: &str,
        attributes: &[(&str, &str)],
    ) -> NodeId {
        let id = self.create_element(tag);
        for class in classes.split_whitespace() {
            self.add_class(&id, class);
        }
        for (name, value) in attributes {
            self.set_attribute(id, name, value);
        }
        self.append_child(parent, id);
        id
    }

    pub fn tag(&self, node: NodeId) -> &str {
        &self.nodes[node.0].tag
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        self.nodes[node.0]
            .attributes
            .insert(name.to_owned(), value.to_owned());
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        self.nodes[node.0].attributes.remove(name);
    }

    pub fn classes(&self, node: NodeId) -> &[String] {
        &self.nodes[node.0].classes
    }

    /// Sets the document-space top and height of an element.
    pub fn set_box(&mut self, node: NodeId, offset_top: f64, offset_height: f64) {
        let el = &mut self.nodes[node.0];
        el.offset_top = offset_top;
        el.offset_height = offset_height;
    }

    pub fn set_client_height(&mut self, node: NodeId, client_height: f64) {
        self.nodes[node.0].client_height = client_height;
    }

    /// Every element carrying `class`, in document order.
    pub fn nodes_with_class(&self, class: &str) -> Vec<NodeId> {
        let root = self.root();
        let mut out = Vec::new();
        if self.has_class(&root, class) {
            out.push(root);
        }
        out.extend(
            self.descendants(&root)
                .into_iter()
                .filter(|n| self.has_class(n, class)),
        );
        out
    }
}

impl Dom for MemoryDom {
    type Node = NodeId;

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    fn children(&self, node: &NodeId) -> Vec<NodeId> {
        self.nodes[node.0].children.clone()
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.nodes[node.0].attributes.get(name).cloned()
    }

    fn tag_name(&self, node: &NodeId) -> Option<String> {
        Some(self.nodes[node.0].tag.to_ascii_lowercase())
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.nodes[node.0].classes.iter().any(|c| c == class)
    }

    fn add_class(&mut self, node: &NodeId, class: &str) {
        if !self.has_class(node, class) {
            self.nodes[node.0].classes.push(class.to_owned());
        }
    }

    fn remove_class(&mut self, node: &NodeId, class: &str) {
        self.nodes[node.0].classes.retain(|c| c != class);
    }

    fn offset_top(&self, node: &NodeId) -> f64 {
        self.nodes[node.0].offset_top
    }

    fn offset_height(&self, node: &NodeId) -> f64 {
        self.nodes[node.0].offset_height
    }

    fn client_height(&self, node: &NodeId) -> f64 {
        self.nodes[node.0].client_height
    }

    fn scroll_top(&self, node: &NodeId) -> f64 {
        self.nodes[node.0].scroll_top
    }

    fn set_scroll_top(&mut self, node: &NodeId, value: f64) {
        self.nodes[node.0].scroll_top = value;
    }

    fn previous_sibling(&self, node: &NodeId) -> Option<NodeId> {
        let parent = self.nodes[node.0].parent?;
        let siblings = &self.nodes[parent.0].children;
        let pos = siblings.iter().position(|n| n == node)?;
        pos.checked_sub(1).map(|i| siblings[i])
    }
}
