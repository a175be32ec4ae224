use alloc::vec::Vec;

use crate::Dom;
use crate::markup::{
    CLASS_ACTIVE, CLASS_DROPDOWN, CLASS_DROPDOWN_ITEM, CLASS_DROPDOWN_TOGGLE,
    CLASS_LIST_GROUP_ITEM, CLASS_NAV_ITEM, CLASS_NAV_LINK, NAV_LIST_GROUPS, has_any_class,
};

/// How the ancestors of an active link are marked.
///
/// The shape is picked from the link itself, see [`ParentShape::of`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParentShape {
    /// The link is a dropdown item: only the enclosing dropdown's toggle is marked.
    Dropdown,
    /// The link sits in nested `.nav` / `.list-group` containers: the link preceding each
    /// container is marked, at every level.
    NestedList,
}

impl ParentShape {
    pub fn of<D: Dom>(dom: &D, link: &D::Node) -> Self {
        if dom.has_class(link, CLASS_DROPDOWN_ITEM) {
            Self::Dropdown
        } else {
            Self::NestedList
        }
    }

    /// Marks the ancestors of `link` active. Returns the nodes that were marked.
    pub fn activate_parents<D: Dom>(self, dom: &mut D, link: &D::Node) -> Vec<D::Node> {
        let marked = match self {
            Self::Dropdown => dropdown_toggle(dom, link).into_iter().collect(),
            Self::NestedList => nested_list_parents(dom, link),
        };
        for node in &marked {
            dom.add_class(node, CLASS_ACTIVE);
        }
        marked
    }
}

fn dropdown_toggle<D: Dom>(dom: &D, link: &D::Node) -> Option<D::Node> {
    let Some(dropdown) = dom.closest(link, |d, n| d.has_class(n, CLASS_DROPDOWN)) else {
        sswarn!(link = ?link, "dropdown item has no enclosing .dropdown");
        return None;
    };
    let toggle = dom
        .descendants(&dropdown)
        .into_iter()
        .find(|n| dom.has_class(n, CLASS_DROPDOWN_TOGGLE));
    if toggle.is_none() {
        sswarn!(dropdown = ?dropdown, "dropdown has no .dropdown-toggle");
    }
    toggle
}

fn nested_list_parents<D: Dom>(dom: &D, link: &D::Node) -> Vec<D::Node> {
    let mut out = Vec::new();
    for group in dom.ancestors(link) {
        if !has_any_class(dom, &group, &NAV_LIST_GROUPS) {
            continue;
        }
        // <nav> markup: the parent link is a sibling of the nested group.
        if let Some(item) = prev_matching(dom, &group, &[CLASS_NAV_LINK, CLASS_LIST_GROUP_ITEM]) {
            out.push(item);
        }
        // <ul> markup: the parent link is wrapped in the preceding .nav-item.
        if let Some(nav_item) = prev_matching(dom, &group, &[CLASS_NAV_ITEM]) {
            out.extend(
                dom.children(&nav_item)
                    .into_iter()
                    .filter(|n| dom.has_class(n, CLASS_NAV_LINK)),
            );
        }
    }
    out
}

/// The nearest preceding sibling of `node` carrying any of `classes`.
fn prev_matching<D: Dom>(dom: &D, node: &D::Node, classes: &[&str]) -> Option<D::Node> {
    let mut cur = dom.previous_sibling(node);
    while let Some(n) = cur {
        if has_any_class(dom, &n, classes) {
            return Some(n);
        }
        cur = dom.previous_sibling(&n);
    }
    None
}
