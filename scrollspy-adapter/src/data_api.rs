use scrollspy::{Dom, ScrollSpyOptions};

use crate::{AdapterError, ElementKey, Registry};

/// Marker attribute (`data-bs-spy="scroll"`) of elements initialized on page load.
pub const SPY_ATTRIBUTE: &str = "data-bs-spy";
pub const SPY_VALUE: &str = "scroll";

pub const TARGET_ATTRIBUTE: &str = "data-bs-target";
pub const ROOT_MARGIN_ATTRIBUTE: &str = "data-bs-root-margin";
pub const OFFSET_ATTRIBUTE: &str = "data-bs-offset";
pub const SMOOTH_SCROLL_ATTRIBUTE: &str = "data-bs-smooth-scroll";

pub fn is_spy_element<D: Dom>(dom: &D, node: &D::Node) -> bool {
    dom.attribute(node, SPY_ATTRIBUTE).as_deref() == Some(SPY_VALUE)
}

/// Reads scroll spy options from the container's `data-bs-*` attributes.
///
/// `data-bs-target` is a simple selector (`#id`, `.class` or a tag name) resolved to the first
/// match under `document`, see [`Selector`]. A missing target attribute yields options
/// without a target, which [`scrollspy::ScrollSpy::new`] rejects.
pub fn options_from_element<D: Dom>(
    dom: &D,
    document: &D::Node,
    element: &D::Node,
) -> Result<ScrollSpyOptions<D::Node>, AdapterError> {
    let mut options = ScrollSpyOptions::default();

    if let Some(target) = dom.attribute(element, TARGET_ATTRIBUTE) {
        let node = select_first(dom, document, &target)
            .ok_or_else(|| AdapterError::TargetNotFound(target.clone()))?;
        options.target = Some(node);
    }
    if let Some(root_margin) = dom.attribute(element, ROOT_MARGIN_ATTRIBUTE) {
        options.root_margin = root_margin;
    }
    if let Some(value) = dom.attribute(element, OFFSET_ATTRIBUTE) {
        options.offset = parse_offset(&value)?;
    }
    if let Some(value) = dom.attribute(element, SMOOTH_SCROLL_ATTRIBUTE) {
        options.smooth_scroll = parse_bool(SMOOTH_SCROLL_ATTRIBUTE, &value)?;
    }
    Ok(options)
}

/// The simple selectors accepted by `data-bs-target`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selector<'a> {
    Id(&'a str),
    Class(&'a str),
    Tag(&'a str),
}

impl<'a> Selector<'a> {
    /// Parses `#id`, `.class` or a tag name. Compound, descendant and attribute selectors are
    /// not supported.
    pub fn parse(selector: &'a str) -> Option<Self> {
        let selector = selector.trim();
        let parsed = if let Some(id) = selector.strip_prefix('#') {
            Self::Id(id)
        } else if let Some(class) = selector.strip_prefix('.') {
            Self::Class(class)
        } else {
            Self::Tag(selector)
        };
        is_simple_name(parsed.name()).then_some(parsed)
    }

    fn name(self) -> &'a str {
        match self {
            Self::Id(name) | Self::Class(name) | Self::Tag(name) => name,
        }
    }

    pub fn matches<D: Dom>(self, dom: &D, node: &D::Node) -> bool {
        match self {
            Self::Id(id) => dom.attribute(node, "id").as_deref() == Some(id),
            Self::Class(class) => dom.has_class(node, class),
            Self::Tag(tag) => dom
                .tag_name(node)
                .is_some_and(|t| t.eq_ignore_ascii_case(tag)),
        }
    }
}

fn is_simple_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

/// The first element in document order (`document` included) matching `selector`.
pub fn select_first<D: Dom>(dom: &D, document: &D::Node, selector: &str) -> Option<D::Node> {
    let selector = Selector::parse(selector)?;
    if selector.matches(dom, document) {
        return Some(document.clone());
    }
    dom.descendants(document)
        .into_iter()
        .find(|n| selector.matches(dom, n))
}

fn parse_offset(value: &str) -> Result<Option<f64>, AdapterError> {
    match value.trim() {
        "" | "null" => Ok(None),
        v => v
            .parse::<f64>()
            .map(Some)
            .map_err(|_| AdapterError::InvalidAttribute {
                name: OFFSET_ATTRIBUTE,
                value: value.to_owned(),
            }),
    }
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, AdapterError> {
    match value.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(AdapterError::InvalidAttribute {
            name,
            value: value.to_owned(),
        }),
    }
}

/// Outcome of [`auto_init`].
#[derive(Debug)]
pub struct AutoInitReport<N> {
    pub initialized: Vec<N>,
    pub failed: Vec<(N, AdapterError)>,
}

impl<N> Default for AutoInitReport<N> {
    fn default() -> Self {
        Self {
            initialized: Vec::new(),
            failed: Vec::new(),
        }
    }
}

/// Creates a scroll spy for every `data-bs-spy="scroll"` element under `document` (inclusive),
/// in document order. Elements that already have an instance keep it.
///
/// A failing element does not stop the scan; its error is reported instead.
pub fn auto_init<D>(
    dom: &mut D,
    document: &D::Node,
    registry: &mut Registry<D::Node>,
) -> AutoInitReport<D::Node>
where
    D: Dom,
    D::Node: ElementKey + Send + 'static,
{
    let mut candidates = Vec::new();
    if is_spy_element(&*dom, document) {
        candidates.push(document.clone());
    }
    candidates.extend(
        dom.descendants(document)
            .into_iter()
            .filter(|n| is_spy_element(&*dom, n)),
    );

    let mut report = AutoInitReport::default();
    for element in candidates {
        let created = match options_from_element(&*dom, document, &element) {
            Ok(options) => registry
                .get_or_create_instance(&mut *dom, element.clone(), options)
                .map(|_| ()),
            Err(e) => Err(e),
        };
        match created {
            Ok(()) => report.initialized.push(element),
            Err(e) => {
                awarn!(element = ?element, error = %e, "auto_init: skipping element");
                report.failed.push((element, e));
            }
        }
    }
    adebug!(
        initialized = report.initialized.len(),
        failed = report.failed.len(),
        "auto_init"
    );
    report
}
