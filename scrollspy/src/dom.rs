use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// The DOM capability a host hands to the engine.
///
/// The engine never reaches into global state: every query and every class mutation goes
/// through this trait. A browser host implements it over real elements (e.g. via `web-sys`);
/// tests and simulations use [`crate::MemoryDom`].
///
/// Only the required methods touch the host. The provided helpers are plain tree walks built on
/// top of them and rarely need overriding.
pub trait Dom {
    /// A cheap handle to an element.
    type Node: Clone + PartialEq + fmt::Debug;

    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Element children in document order.
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// Lowercase element name (`nav`, `ul`, ...). Hosts that cannot tell return `None`, and
    /// tag selectors then match nothing.
    fn tag_name(&self, node: &Self::Node) -> Option<String> {
        let _ = node;
        None
    }

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;
    fn add_class(&mut self, node: &Self::Node, class: &str);
    fn remove_class(&mut self, node: &Self::Node, class: &str);

    /// Top edge of the element in document coordinates (`offsetTop`).
    fn offset_top(&self, node: &Self::Node) -> f64;
    fn offset_height(&self, node: &Self::Node) -> f64;
    /// Height of the visible area of a scroll container (`clientHeight`).
    fn client_height(&self, node: &Self::Node) -> f64;
    fn scroll_top(&self, node: &Self::Node) -> f64;
    fn set_scroll_top(&mut self, node: &Self::Node, value: f64);

    fn previous_sibling(&self, node: &Self::Node) -> Option<Self::Node> {
        let parent = self.parent(node)?;
        let siblings = self.children(&parent);
        let pos = siblings.iter().position(|n| n == node)?;
        pos.checked_sub(1).map(|i| siblings[i].clone())
    }

    /// All descendants of `root` in document (pre-)order. `root` itself is excluded.
    fn descendants(&self, root: &Self::Node) -> Vec<Self::Node> {
        let mut out = Vec::new();
        let mut stack: Vec<Self::Node> = self.children(root).into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            stack.extend(self.children(&node).into_iter().rev());
            out.push(node);
        }
        out
    }

    /// Ancestors of `node`, nearest first. `node` itself is excluded.
    fn ancestors(&self, node: &Self::Node) -> Vec<Self::Node> {
        let mut out = Vec::new();
        let mut cur = self.parent(node);
        while let Some(n) = cur {
            cur = self.parent(&n);
            out.push(n);
        }
        out
    }

    /// The first of `node` and its ancestors that satisfies `pred`.
    fn closest(
        &self,
        node: &Self::Node,
        mut pred: impl FnMut(&Self, &Self::Node) -> bool,
    ) -> Option<Self::Node>
    where
        Self: Sized,
    {
        let mut cur = Some(node.clone());
        while let Some(n) = cur {
            if pred(self, &n) {
                return Some(n);
            }
            cur = self.parent(&n);
        }
        None
    }

    fn element_id(&self, node: &Self::Node) -> Option<String> {
        self.attribute(node, "id").filter(|id| !id.is_empty())
    }

    /// Looks up a descendant of `scope` by `id`. `scope` itself never matches.
    fn find_by_id(&self, scope: &Self::Node, id: &str) -> Option<Self::Node> {
        self.descendants(scope)
            .into_iter()
            .find(|n| self.attribute(n, "id").as_deref() == Some(id))
    }

    /// The fragment reference of a link-like element, including the leading `#`.
    ///
    /// Returns `None` when the element has no `href`, or when the fragment is empty (`"#"` or
    /// no `#` at all).
    fn link_fragment(&self, node: &Self::Node) -> Option<String> {
        let href = self.attribute(node, "href")?;
        let start = href.find('#')?;
        let fragment = &href[start..];
        if fragment.len() <= 1 {
            return None;
        }
        Some(String::from(fragment))
    }

    fn is_disabled(&self, node: &Self::Node) -> bool {
        if self.has_class(node, "disabled") {
            return true;
        }
        match self.attribute(node, "disabled") {
            Some(value) => value != "false",
            None => false,
        }
    }
}
