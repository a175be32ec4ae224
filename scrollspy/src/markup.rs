//! Class and attribute names of the navigation markup the engine understands.

pub const CLASS_ACTIVE: &str = "active";
pub const CLASS_DROPDOWN_ITEM: &str = "dropdown-item";
pub const CLASS_DROPDOWN: &str = "dropdown";
pub const CLASS_DROPDOWN_TOGGLE: &str = "dropdown-toggle";

/// Ancestor containers whose preceding sibling is the parent link (`.nav`, `.list-group`).
pub const NAV_LIST_GROUPS: [&str; 2] = ["nav", "list-group"];
pub const CLASS_NAV_LINK: &str = "nav-link";
pub const CLASS_NAV_ITEM: &str = "nav-item";
pub const CLASS_LIST_GROUP_ITEM: &str = "list-group-item";

pub(crate) fn has_any_class<D: crate::Dom>(dom: &D, node: &D::Node, classes: &[&str]) -> bool {
    classes.iter().any(|c| dom.has_class(node, c))
}
