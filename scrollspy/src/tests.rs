use crate::*;

use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

struct Page {
    dom: MemoryDom,
    container: NodeId,
    nav: NodeId,
    links: Vec<NodeId>,
    sections: Vec<NodeId>,
}

/// A flat `.nav` of `count` links and a container at y=50 with a 100px viewport and
/// 200px-tall sections stacked from its top.
fn page(count: usize) -> Page {
    let mut dom = MemoryDom::new();
    let body = dom.root();
    let nav = dom.element(body, "nav", "nav", &[("id", "nav")]);
    let container = dom.element(body, "div", "", &[("id", "content")]);
    dom.set_box(container, 50.0, 100.0);
    dom.set_client_height(container, 100.0);

    let mut links = Vec::new();
    let mut sections = Vec::new();
    for i in 0..count {
        let id = format!("s{i}");
        let href = format!("#{id}");
        links.push(dom.element(nav, "a", "nav-link", &[("href", href.as_str())]));
        let section = dom.element(container, "section", "", &[("id", id.as_str())]);
        dom.set_box(section, 50.0 + 200.0 * i as f64, 200.0);
        sections.push(section);
    }

    Page {
        dom,
        container,
        nav,
        links,
        sections,
    }
}

fn spy(p: &mut Page) -> ScrollSpy<NodeId> {
    ScrollSpy::new(&mut p.dom, p.container, ScrollSpyOptions::new(p.nav)).unwrap()
}

fn active(dom: &MemoryDom) -> Vec<NodeId> {
    dom.nodes_with_class("active")
}

fn entry(target: NodeId, is_intersecting: bool, ratio: f64) -> IntersectionEntry<NodeId> {
    IntersectionEntry {
        target,
        is_intersecting,
        intersection_ratio: ratio,
    }
}

#[test]
fn index_keeps_only_resolvable_enabled_fragments() {
    let mut p = page(3);
    let nav = p.nav;
    let no_href = p.dom.element(nav, "a", "nav-link", &[]);
    let empty = p.dom.element(nav, "a", "nav-link", &[("href", "#")]);
    let external = p.dom.element(nav, "a", "nav-link", &[("href", "/about")]);
    let missing = p.dom.element(nav, "a", "nav-link", &[("href", "#nope")]);
    let disabled_class = p.dom.element(nav, "a", "nav-link disabled", &[("href", "#s0")]);
    let disabled_attr = p
        .dom
        .element(nav, "a", "nav-link", &[("href", "#s1"), ("disabled", "")]);
    let outside = p.dom.element(p.dom.root(), "div", "", &[("id", "elsewhere")]);
    let not_in_container = p.dom.element(nav, "a", "nav-link", &[("href", "#elsewhere")]);
    // `disabled="false"` is not disabled
    let enabled = p.dom.element(
        nav,
        "a",
        "nav-link",
        &[("href", "page.html#s2"), ("disabled", "false")],
    );

    let s = spy(&mut p);
    let idx = s.targets();
    assert_eq!(idx.len(), 3);
    assert_eq!(idx.link("#s0"), Some(&p.links[0]));
    assert_eq!(idx.link("#s1"), Some(&p.links[1]));
    // the later link with the same fragment wins, position is kept
    assert_eq!(idx.link("#s2"), Some(&enabled));
    assert_eq!(idx.section("#s2"), Some(&p.sections[2]));
    let order: Vec<&str> = idx.iter().map(|t| t.fragment.as_str()).collect();
    assert_eq!(order, ["#s0", "#s1", "#s2"]);

    for excluded in [
        no_href,
        empty,
        external,
        missing,
        disabled_class,
        disabled_attr,
        not_in_container,
    ] {
        assert!(!idx.contains_link(&excluded));
    }
    let _ = outside;
}

#[test]
fn index_build_is_idempotent() {
    let p = page(4);
    let a = TargetIndex::build(&p.dom, &p.nav, &p.container);
    let b = TargetIndex::build(&p.dom, &p.nav, &p.container);
    let a: Vec<_> = a.iter().cloned().collect();
    let b: Vec<_> = b.iter().cloned().collect();
    assert_eq!(a, b);
}

#[test]
fn empty_index_yields_no_activation() {
    let mut dom = MemoryDom::new();
    let body = dom.root();
    let nav = dom.element(body, "nav", "nav", &[]);
    let container = dom.element(body, "div", "", &[]);
    dom.set_client_height(container, 100.0);
    let mut s = ScrollSpy::new(&mut dom, container, ScrollSpyOptions::new(nav)).unwrap();
    assert!(s.targets().is_empty());
    assert_eq!(s.on_scroll(&mut dom), None);
    assert!(active(&dom).is_empty());
}

#[test]
fn missing_target_is_a_configuration_error() {
    let mut dom = MemoryDom::new();
    let container = dom.element(dom.root(), "div", "", &[]);
    let err = ScrollSpy::new(&mut dom, container, ScrollSpyOptions::default()).unwrap_err();
    assert_eq!(err, Error::MissingTarget);
}

#[test]
fn invalid_root_margin_is_a_configuration_error() {
    let mut p = page(1);
    let opts = ScrollSpyOptions::new(p.nav).with_root_margin("10em");
    let err = ScrollSpy::new(&mut p.dom, p.container, opts).unwrap_err();
    assert!(matches!(err, Error::InvalidRootMargin { .. }));

    let opts = ScrollSpyOptions::new(p.nav).with_root_margin("1px 2px 3px 4px 5px");
    assert!(ScrollSpy::new(&mut p.dom, p.container, opts).is_err());
}

#[test]
fn root_margin_shorthand() {
    let m = RootMargin::parse("0px 0px -40%").unwrap();
    assert_eq!(m.top, MarginValue::Pixels(0.0));
    assert_eq!(m.right, MarginValue::Pixels(0.0));
    assert_eq!(m.bottom, MarginValue::Percentage(-40.0));
    assert_eq!(m.left, MarginValue::Pixels(0.0));
    assert_eq!(m.vertical_bounds(100.0), (0.0, 60.0));

    let m: RootMargin = "10px 5%".parse().unwrap();
    assert_eq!(m.top, MarginValue::Pixels(10.0));
    assert_eq!(m.bottom, MarginValue::Pixels(10.0));
    assert_eq!(m.left, MarginValue::Percentage(5.0));

    assert_eq!(RootMargin::parse("").unwrap(), RootMargin::default());
}

#[test]
fn legacy_offset_overrides_root_margin() {
    let opts = ScrollSpyOptions::<NodeId>::default()
        .with_root_margin("0px 0px -25%")
        .with_offset(Some(10.0));
    assert_eq!(opts.effective_root_margin(), "10px 0px 0px");

    // zero offset counts as unset
    let opts = opts.with_offset(Some(0.0));
    assert_eq!(opts.effective_root_margin(), "0px 0px -25%");

    let mut p = page(1);
    let opts = ScrollSpyOptions::new(p.nav).with_offset(Some(30.0));
    let s = ScrollSpy::new(&mut p.dom, p.container, opts).unwrap();
    assert_eq!(s.root_margin(), RootMargin::from_offset(30.0));
}

#[test]
fn scrolling_moves_the_active_link() {
    let mut p = page(3);
    let mut s = spy(&mut p);

    // viewport is [0, 60) after the -40% bottom margin
    assert_eq!(s.on_scroll(&mut p.dom), Some(p.links[0]));
    assert_eq!(active(&p.dom), [p.links[0]]);

    p.dom.set_scroll_top(&p.container, 250.0);
    assert_eq!(s.on_scroll(&mut p.dom), Some(p.links[1]));
    assert_eq!(active(&p.dom), [p.links[1]]);
    assert_eq!(s.active_target(), Some(&p.links[1]));

    p.dom.set_scroll_top(&p.container, 0.0);
    assert_eq!(s.on_scroll(&mut p.dom), Some(p.links[0]));
    assert_eq!(active(&p.dom), [p.links[0]]);
    assert_eq!(
        s.scroll_memory(),
        ScrollMemory {
            visible_entry_top: 50.0,
            parent_scroll_top: 0.0,
        }
    );
}

#[test]
fn no_threshold_crossing_means_no_batch() {
    let mut p = page(3);
    let mut s = spy(&mut p);
    s.on_scroll(&mut p.dom);

    p.dom.set_scroll_top(&p.container, 100.0);
    assert_eq!(s.on_scroll(&mut p.dom), None);
    assert_eq!(active(&p.dom), [p.links[0]]);
}

#[test]
fn at_most_one_link_is_active_after_every_batch() {
    let mut p = page(5);
    let mut s = spy(&mut p);
    for top in [0.0, 120.0, 260.0, 410.0, 700.0, 330.0, 90.0, 810.0, 10.0] {
        p.dom.set_scroll_top(&p.container, top);
        s.on_scroll(&mut p.dom);
        let marked = active(&p.dom);
        assert!(marked.len() <= 1, "scroll_top={top}: {marked:?}");
        assert_eq!(marked.first(), s.active_target());
    }
}

#[test]
fn leaving_section_deactivates_its_link() {
    let mut p = page(2);
    let mut s = spy(&mut p);
    s.on_scroll(&mut p.dom);

    let batch = IntersectionBatch {
        watcher: s.watcher_id().unwrap(),
        entries: alloc::vec![entry(p.sections[0], false, 0.0)],
    };
    assert_eq!(s.process_batch(&mut p.dom, &batch), None);
    assert!(active(&p.dom).is_empty());
    assert_eq!(s.active_target(), None);
}

#[test]
fn equal_ratios_prefer_the_lower_section_when_scrolling_down() {
    let mut p = page(2);
    p.dom.set_box(p.sections[0], 100.0, 200.0);
    p.dom.set_box(p.sections[1], 300.0, 200.0);
    let mut s = spy(&mut p);

    s.set_scroll_memory(ScrollMemory {
        visible_entry_top: 0.0,
        parent_scroll_top: 0.0,
    });
    p.dom.set_scroll_top(&p.container, 50.0);
    let batch = IntersectionBatch {
        watcher: s.watcher_id().unwrap(),
        entries: alloc::vec![
            entry(p.sections[0], true, 0.6),
            entry(p.sections[1], true, 0.6),
        ],
    };
    s.process_batch(&mut p.dom, &batch);
    assert_eq!(s.active_target(), Some(&p.links[1]));
    assert_eq!(active(&p.dom), [p.links[1]]);
    assert_eq!(s.scroll_memory().visible_entry_top, 300.0);
    assert_eq!(s.scroll_memory().parent_scroll_top, 50.0);
}

#[test]
fn equal_ratios_prefer_the_higher_section_when_scrolling_up() {
    let mut p = page(2);
    p.dom.set_box(p.sections[0], 100.0, 200.0);
    p.dom.set_box(p.sections[1], 300.0, 200.0);
    let mut s = spy(&mut p);

    // the previously active section was below both
    s.set_scroll_memory(ScrollMemory {
        visible_entry_top: 500.0,
        parent_scroll_top: 100.0,
    });
    p.dom.set_scroll_top(&p.container, 50.0);
    let batch = IntersectionBatch {
        watcher: s.watcher_id().unwrap(),
        entries: alloc::vec![
            entry(p.sections[0], true, 0.6),
            entry(p.sections[1], true, 0.6),
        ],
    };
    s.process_batch(&mut p.dom, &batch);
    assert_eq!(s.active_target(), Some(&p.links[0]));
    assert_eq!(active(&p.dom), [p.links[0]]);
}

#[test]
fn smaller_ratio_later_in_batch_does_not_win() {
    let mut p = page(3);
    let mut s = spy(&mut p);
    let batch = IntersectionBatch {
        watcher: s.watcher_id().unwrap(),
        entries: alloc::vec![
            entry(p.sections[1], true, 0.8),
            entry(p.sections[2], true, 0.4),
        ],
    };
    assert_eq!(s.process_batch(&mut p.dom, &batch), Some(p.links[1]));
    assert_eq!(active(&p.dom), [p.links[1]]);
}

#[test]
fn several_fully_visible_sections_pick_the_furthest_down() {
    let mut dom = MemoryDom::new();
    let body = dom.root();
    let nav = dom.element(body, "nav", "nav", &[]);
    let container = dom.element(body, "div", "", &[]);
    dom.set_client_height(container, 100.0);
    let mut links = Vec::new();
    for i in 0..3 {
        let id = format!("x{i}");
        let href = format!("#{id}");
        links.push(dom.element(nav, "a", "nav-link", &[("href", href.as_str())]));
        let section = dom.element(container, "section", "", &[("id", id.as_str())]);
        dom.set_box(section, 40.0 * i as f64, 40.0);
    }
    let opts = ScrollSpyOptions::new(nav).with_root_margin("0px");
    let mut s = ScrollSpy::new(&mut dom, container, opts).unwrap();

    // x0 and x1 are fully visible, x2 is half visible
    s.on_scroll(&mut dom);
    assert_eq!(active(&dom), [links[1]]);
}

#[test]
fn process_is_idempotent() {
    let mut p = page(2);
    let calls = Arc::new(AtomicUsize::new(0));
    let last = Arc::new(Mutex::new(None));
    let opts = ScrollSpyOptions::new(p.nav).with_on_activate(Some({
        let calls = Arc::clone(&calls);
        let last = Arc::clone(&last);
        move |e: &ActivateEvent<NodeId>| {
            calls.fetch_add(1, Ordering::SeqCst);
            *last.lock().unwrap() = Some(e.related_target);
        }
    }));
    let mut s = ScrollSpy::new(&mut p.dom, p.container, opts).unwrap();

    assert!(s.process(&mut p.dom, Some(p.links[1])));
    let snapshot: Vec<Vec<String>> = (0..p.dom.len())
        .map(|i| p.dom.classes(NodeId(i)).to_vec())
        .collect();

    assert!(!s.process(&mut p.dom, Some(p.links[1])));
    let again: Vec<Vec<String>> = (0..p.dom.len())
        .map(|i| p.dom.classes(NodeId(i)).to_vec())
        .collect();
    assert_eq!(snapshot, again);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(*last.lock().unwrap(), Some(p.links[1]));

    // both idle
    let mut idle = spy(&mut p);
    assert!(!idle.process(&mut p.dom, None));
}

#[test]
fn process_none_clears_and_goes_idle() {
    let mut p = page(2);
    let mut s = spy(&mut p);
    p.dom.add_class(&p.nav, "active");
    s.process(&mut p.dom, Some(p.links[0]));
    assert!(!s.process(&mut p.dom, None));
    assert_eq!(s.active_target(), None);
    // the navigation root keeps its own class
    assert_eq!(active(&p.dom), [p.nav]);
}

#[test]
fn stale_batches_are_dropped_after_refresh() {
    let mut p = page(2);
    let mut s = spy(&mut p);
    let old = s.watcher_id().unwrap();

    s.refresh(&mut p.dom);
    let new = s.watcher_id().unwrap();
    assert_ne!(old, new);

    let stale = IntersectionBatch {
        watcher: old,
        entries: alloc::vec![entry(p.sections[0], true, 1.0)],
    };
    assert_eq!(s.process_batch(&mut p.dom, &stale), None);
    assert!(active(&p.dom).is_empty());

    let fresh = IntersectionBatch {
        watcher: new,
        ..stale
    };
    assert_eq!(s.process_batch(&mut p.dom, &fresh), Some(p.links[0]));
}

#[test]
fn refresh_picks_up_new_sections_and_reobserves() {
    let mut p = page(2);
    let mut s = spy(&mut p);
    s.on_scroll(&mut p.dom);

    let link = p.dom.element(p.nav, "a", "nav-link", &[("href", "#late")]);
    let section = p.dom.element(p.container, "section", "", &[("id", "late")]);
    p.dom.set_box(section, 450.0, 200.0);
    assert!(!s.targets().contains_link(&link));

    s.refresh(&mut p.dom);
    assert!(s.targets().contains_link(&link));
    let observed: Vec<_> = s.watcher().unwrap().observed().copied().collect();
    assert_eq!(observed, [p.sections[0], p.sections[1], section]);

    // the fresh watcher reports every section once; the active link does not change
    assert_eq!(s.on_scroll(&mut p.dom), None);
    assert_eq!(active(&p.dom), [p.links[0]]);
}

#[test]
fn refresh_drops_an_active_link_that_left_the_index() {
    let mut p = page(2);
    let mut s = spy(&mut p);
    s.on_scroll(&mut p.dom);
    assert_eq!(s.active_target(), Some(&p.links[0]));

    p.dom.remove(p.sections[0]);
    s.refresh(&mut p.dom);
    assert_eq!(s.active_target(), None);
    assert!(active(&p.dom).is_empty());
}

#[test]
fn dispose_is_terminal() {
    let mut p = page(2);
    let mut s = spy(&mut p);
    let id = s.watcher_id().unwrap();
    s.dispose();
    assert!(s.is_disposed());
    assert!(s.watcher().is_none());

    assert_eq!(s.on_scroll(&mut p.dom), None);
    let batch = IntersectionBatch {
        watcher: id,
        entries: alloc::vec![entry(p.sections[0], true, 1.0)],
    };
    assert_eq!(s.process_batch(&mut p.dom, &batch), None);
    s.refresh(&mut p.dom);
    assert!(s.watcher().is_none());
    assert!(active(&p.dom).is_empty());
}

#[test]
fn watcher_reports_initial_state_then_only_changes() {
    let p = page(3);
    let mut w = IntersectionWatcher::new(
        WatcherId(7),
        p.container,
        RootMargin::parse(DEFAULT_ROOT_MARGIN).unwrap(),
    );
    for s in &p.sections {
        w.observe(*s);
    }
    w.observe(p.sections[0]);

    let first = w.take_records(&p.dom);
    assert_eq!(first.watcher, WatcherId(7));
    assert_eq!(
        first.entries,
        [
            entry(p.sections[0], true, 0.3),
            entry(p.sections[1], false, 0.0),
            entry(p.sections[2], false, 0.0),
        ]
    );
    assert!(w.take_records(&p.dom).is_empty());

    w.disconnect();
    assert!(!w.is_connected());
    assert!(w.take_records(&p.dom).is_empty());
}

#[test]
fn watcher_reports_half_threshold_crossings() {
    let mut p = page(1);
    let mut w = IntersectionWatcher::new(WatcherId(0), p.container, RootMargin::default());
    w.observe(p.sections[0]);
    let batch = w.take_records(&p.dom);
    assert_eq!(batch.entries, [entry(p.sections[0], true, 0.5)]);

    // 80px of 200 visible: under 0.5
    p.dom.set_scroll_top(&p.container, 120.0);
    let batch = w.take_records(&p.dom);
    assert_eq!(batch.entries, [entry(p.sections[0], true, 0.4)]);

    // 100px visible: back at 0.5
    p.dom.set_scroll_top(&p.container, 100.0);
    let batch = w.take_records(&p.dom);
    assert_eq!(batch.entries, [entry(p.sections[0], true, 0.5)]);

    // still above 0.5, same bucket
    p.dom.set_scroll_top(&p.container, 60.0);
    assert!(w.take_records(&p.dom).is_empty());
}

fn nav_tree() -> (MemoryDom, NodeId, NodeId, [NodeId; 3]) {
    // ul.nav > li.nav-item > (a.nav-link, ul.nav > li.nav-item > (a.nav-link, ul.nav > ...))
    let mut dom = MemoryDom::new();
    let body = dom.root();
    let root = dom.element(body, "ul", "nav", &[]);
    let container = dom.element(body, "div", "", &[]);
    let mut parent = root;
    let mut links = [NodeId(0); 3];
    for (depth, link) in links.iter_mut().enumerate() {
        let item = dom.element(parent, "li", "nav-item", &[]);
        let id = format!("n{depth}");
        let href = format!("#{id}");
        *link = dom.element(item, "a", "nav-link", &[("href", href.as_str())]);
        dom.element(container, "section", "", &[("id", id.as_str())]);
        if depth < 2 {
            parent = dom.element(item, "ul", "nav", &[]);
        }
    }
    (dom, root, container, links)
}

#[test]
fn nested_nav_marks_each_preceding_link() {
    let (mut dom, root, container, links) = nav_tree();
    let mut s = ScrollSpy::new(&mut dom, container, ScrollSpyOptions::new(root)).unwrap();
    assert_eq!(s.targets().len(), 3);

    s.process(&mut dom, Some(links[2]));
    let mut marked = active(&dom);
    marked.sort();
    let mut expected = links.to_vec();
    expected.sort();
    assert_eq!(marked, expected);

    // moving to the middle link clears the deepest one
    s.process(&mut dom, Some(links[1]));
    let mut marked = active(&dom);
    marked.sort();
    let mut expected = alloc::vec![links[0], links[1]];
    expected.sort();
    assert_eq!(marked, expected);
}

#[test]
fn nested_nav_sibling_of_nav_item_marks_the_wrapped_link() {
    // ul.nav > (li.nav-item > a.nav-link, ul.nav > li.nav-item > a.nav-link)
    let mut dom = MemoryDom::new();
    let body = dom.root();
    let root = dom.element(body, "ul", "nav", &[]);
    let item = dom.element(root, "li", "nav-item", &[]);
    let parent_link = dom.element(item, "a", "nav-link", &[("href", "#a")]);
    let nested = dom.element(root, "ul", "nav", &[]);
    let nested_item = dom.element(nested, "li", "nav-item", &[]);
    let child_link = dom.element(nested_item, "a", "nav-link", &[("href", "#b")]);

    ParentShape::NestedList.activate_parents(&mut dom, &child_link);
    assert_eq!(active(&dom), [parent_link]);
}

#[test]
fn nested_list_group_marks_preceding_item() {
    let mut dom = MemoryDom::new();
    let body = dom.root();
    let root = dom.element(body, "div", "list-group", &[]);
    let parent_link = dom.element(root, "a", "list-group-item", &[("href", "#a")]);
    let nested = dom.element(root, "div", "list-group", &[]);
    let child_link = dom.element(nested, "a", "list-group-item", &[("href", "#b")]);

    assert_eq!(ParentShape::of(&dom, &child_link), ParentShape::NestedList);
    let marked = ParentShape::NestedList.activate_parents(&mut dom, &child_link);
    assert_eq!(marked, [parent_link]);
}

#[test]
fn dropdown_item_marks_only_the_toggle() {
    let mut dom = MemoryDom::new();
    let body = dom.root();
    let root = dom.element(body, "nav", "navbar", &[]);
    let list = dom.element(root, "ul", "nav", &[]);
    let first = dom.element(list, "li", "nav-item", &[]);
    let plain = dom.element(first, "a", "nav-link", &[("href", "#one")]);
    let dropdown = dom.element(list, "li", "nav-item dropdown", &[]);
    let toggle = dom.element(dropdown, "a", "nav-link dropdown-toggle", &[("href", "#")]);
    let menu = dom.element(dropdown, "ul", "dropdown-menu", &[]);
    let menu_item = dom.element(menu, "li", "", &[]);
    let item = dom.element(menu_item, "a", "dropdown-item", &[("href", "#two")]);

    let container = dom.element(body, "div", "", &[]);
    dom.element(container, "section", "", &[("id", "one")]);
    dom.element(container, "section", "", &[("id", "two")]);

    let mut s = ScrollSpy::new(&mut dom, container, ScrollSpyOptions::new(root)).unwrap();
    assert!(!s.targets().contains_link(&toggle));

    assert_eq!(ParentShape::of(&dom, &item), ParentShape::Dropdown);
    s.process(&mut dom, Some(item));
    let mut marked = active(&dom);
    marked.sort();
    let mut expected = alloc::vec![toggle, item];
    expected.sort();
    assert_eq!(marked, expected);
    assert!(!dom.has_class(&plain, "active"));
}

#[test]
fn dropdown_item_without_dropdown_is_a_no_op() {
    let mut dom = MemoryDom::new();
    let body = dom.root();
    let root = dom.element(body, "div", "", &[]);
    let item = dom.element(root, "a", "dropdown-item", &[("href", "#x")]);
    let container = dom.element(body, "div", "", &[]);
    dom.element(container, "section", "", &[("id", "x")]);

    let mut s = ScrollSpy::new(&mut dom, container, ScrollSpyOptions::new(root)).unwrap();
    assert!(s.process(&mut dom, Some(item)));
    assert_eq!(active(&dom), [item]);

    // a dropdown without a toggle is tolerated too
    dom.add_class(&root, "dropdown");
    assert!(ParentShape::Dropdown.activate_parents(&mut dom, &item).is_empty());
}

#[test]
fn smooth_scroll_sets_container_offset() {
    let mut p = page(3);
    let opts = ScrollSpyOptions::new(p.nav).with_smooth_scroll(true);
    let mut s = ScrollSpy::new(&mut p.dom, p.container, opts).unwrap();
    assert_eq!(
        s.click_binding(),
        Some(ClickBinding {
            container_offset_top: 50.0
        })
    );

    let out = s.on_click(&mut p.dom, &p.links[2]);
    assert!(out.prevent_default);
    assert_eq!(out.scrolled_to, Some(400.0));
    assert_eq!(p.dom.scroll_top(&p.container), 400.0);

    // clicks on an element inside a link are delegated to the link
    let inner = p.dom.element(p.links[1], "span", "", &[]);
    assert_eq!(s.on_click(&mut p.dom, &inner).scrolled_to, Some(200.0));

    // a link to nowhere still prevents navigation
    let dangling = p.dom.element(p.nav, "a", "nav-link", &[("href", "#gone")]);
    let out = s.on_click(&mut p.dom, &dangling);
    assert!(out.prevent_default);
    assert_eq!(out.scrolled_to, None);
    assert_eq!(p.dom.scroll_top(&p.container), 200.0);

    // outside the navigation root
    assert_eq!(s.on_click(&mut p.dom, &p.sections[0]), ClickOutcome::IGNORED);
    assert_eq!(s.on_click(&mut p.dom, &p.nav), ClickOutcome::IGNORED);
}

#[test]
fn smooth_scroll_offset_is_captured_at_refresh() {
    let mut p = page(2);
    let opts = ScrollSpyOptions::new(p.nav).with_smooth_scroll(true);
    let mut s = ScrollSpy::new(&mut p.dom, p.container, opts).unwrap();

    p.dom.set_box(p.container, 80.0, 100.0);
    assert_eq!(s.on_click(&mut p.dom, &p.links[1]).scrolled_to, Some(200.0));

    s.refresh(&mut p.dom);
    assert_eq!(s.on_click(&mut p.dom, &p.links[1]).scrolled_to, Some(170.0));
}

#[test]
fn clicks_are_ignored_without_smooth_scroll() {
    let mut p = page(2);
    let mut s = spy(&mut p);
    assert_eq!(s.on_click(&mut p.dom, &p.links[1]), ClickOutcome::IGNORED);
    assert_eq!(p.dom.scroll_top(&p.container), 0.0);

    s.update_options(&mut p.dom, |o| o.smooth_scroll = true).unwrap();
    assert!(s.on_click(&mut p.dom, &p.links[1]).prevent_default);

    s.dispose();
    assert_eq!(s.on_click(&mut p.dom, &p.links[0]), ClickOutcome::IGNORED);
}

#[test]
fn update_options_keeps_previous_options_on_error() {
    let mut p = page(2);
    let mut s = spy(&mut p);
    let err = s.update_options(&mut p.dom, |o| o.root_margin = String::from("wide"));
    assert!(err.is_err());
    assert_eq!(s.config(), ScrollSpyConfig::default());

    s.update_options(&mut p.dom, |o| o.root_margin = String::from("0px"))
        .unwrap();
    assert_eq!(s.root_margin(), RootMargin::default());
}

#[test]
fn dom_helpers() {
    let p = page(2);
    assert_eq!(
        p.dom.link_fragment(&p.links[1]).as_deref(),
        Some("#s1")
    );
    assert_eq!(p.dom.previous_sibling(&p.links[1]), Some(p.links[0]));
    assert_eq!(p.dom.previous_sibling(&p.links[0]), None);
    assert_eq!(p.dom.ancestors(&p.links[0]), [p.nav, p.dom.root()]);
    assert_eq!(
        p.dom.closest(&p.links[0], |d, n| d.has_class(n, "nav")),
        Some(p.nav)
    );
    assert_eq!(p.dom.find_by_id(&p.container, "s1"), Some(p.sections[1]));
    assert_eq!(p.dom.find_by_id(&p.nav, "s1"), None);
    assert_eq!(p.dom.tag_name(&p.nav).as_deref(), Some("nav"));
    assert_eq!(p.dom.tag_name(&p.sections[0]).as_deref(), Some("section"));
}

#[test]
fn non_finite_root_margin_is_rejected() {
    for margin in ["NaNpx", "inf%", "0px 0px -infpx", "-inf"] {
        let err = RootMargin::parse(margin).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidRootMargin {
                margin: margin.into(),
                reason: "margin values must be finite",
            },
            "{margin}"
        );
    }
    // exponents are valid CSS numbers
    assert_eq!(
        RootMargin::parse("1e1px").unwrap().top,
        MarginValue::Pixels(10.0)
    );

    let opts = ScrollSpyOptions::<NodeId>::default().with_offset(Some(f64::INFINITY));
    assert_eq!(opts.effective_root_margin(), DEFAULT_ROOT_MARGIN);
}

#[test]
fn intersecting_entries_that_lose_leave_nested_markings_alone() {
    let (mut dom, root, container, links) = nav_tree();
    let mut s = ScrollSpy::new(&mut dom, container, ScrollSpyOptions::new(root)).unwrap();
    let sections: Vec<NodeId> = s.targets().sections().cloned().collect();
    let watcher = s.watcher_id().unwrap();

    let batch = IntersectionBatch {
        watcher,
        entries: alloc::vec![entry(sections[2], true, 0.6)],
    };
    assert_eq!(s.process_batch(&mut dom, &batch), Some(links[2]));

    // n1 loses on ratio and n0 has none; both stay intersecting, so the parent links that
    // the deepest link marked keep their class.
    let batch = IntersectionBatch {
        watcher,
        entries: alloc::vec![
            entry(sections[2], true, 0.6),
            entry(sections[1], true, 0.4),
            entry(sections[0], true, 0.0),
        ],
    };
    assert_eq!(s.process_batch(&mut dom, &batch), None);
    assert_eq!(s.active_target(), Some(&links[2]));
    let mut marked = active(&dom);
    marked.sort();
    let mut expected = links.to_vec();
    expected.sort();
    assert_eq!(marked, expected);
}

#[cfg(feature = "tracing")]
#[test]
fn log_paths_run_with_tracing_enabled() {
    // offset overriding a custom root margin
    let mut p = page(2);
    let opts = ScrollSpyOptions::new(p.nav)
        .with_root_margin("0px 0px -10%")
        .with_offset(Some(20.0));
    let mut s = ScrollSpy::new(&mut p.dom, p.container, opts).unwrap();
    assert_eq!(s.on_scroll(&mut p.dom), Some(p.links[0]));

    // stale batch, then every call after dispose
    let stale = IntersectionBatch {
        watcher: WatcherId(99),
        entries: alloc::vec![entry(p.sections[1], true, 1.0)],
    };
    assert_eq!(s.process_batch(&mut p.dom, &stale), None);
    s.dispose();
    s.refresh(&mut p.dom);
    assert!(s.watcher().is_none());

    // dropdown item outside any dropdown
    let item = p.dom.element(p.nav, "a", "dropdown-item", &[]);
    assert!(
        ParentShape::Dropdown
            .activate_parents(&mut p.dom, &item)
            .is_empty()
    );

    let mut w = IntersectionWatcher::new(WatcherId(0), p.container, RootMargin::default());
    w.disconnect();
    w.observe(p.sections[0]);
    assert_eq!(w.observed().count(), 0);
}
