use crate::Dom;

/// The smooth-scroll click handler bound to a navigation root.
///
/// The container's offset is captured once when the handler is bound and reused for every
/// click until the next refresh rebinds it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClickBinding {
    pub container_offset_top: f64,
}

impl ClickBinding {
    pub fn bind<D: Dom>(dom: &D, container: &D::Node) -> Self {
        Self {
            container_offset_top: dom.offset_top(container),
        }
    }

    /// The container scroll offset that brings `section` to the top of the container.
    pub fn scroll_target<D: Dom>(&self, dom: &D, section: &D::Node) -> f64 {
        dom.offset_top(section) - self.container_offset_top
    }
}

/// The link a click lands on: `clicked` or its nearest ancestor with an `href`, strictly below
/// `nav_root`. Clicks outside `nav_root` resolve to `None`.
pub(crate) fn delegate_link<D: Dom>(
    dom: &D,
    nav_root: &D::Node,
    clicked: &D::Node,
) -> Option<D::Node> {
    let mut link = None;
    let mut cur = Some(clicked.clone());
    while let Some(n) = cur {
        if n == *nav_root {
            return link;
        }
        if link.is_none() && dom.attribute(&n, "href").is_some() {
            link = Some(n.clone());
        }
        cur = dom.parent(&n);
    }
    None
}
