// Example: a flat navigation list kept in sync while the host scrolls the container.
use scrollspy::{Dom, MemoryDom, ScrollSpy, ScrollSpyOptions};

fn main() {
    let mut dom = MemoryDom::new();
    let body = dom.root();
    let nav = dom.element(body, "nav", "nav", &[]);
    let content = dom.element(body, "div", "", &[]);
    dom.set_box(content, 0.0, 400.0);
    dom.set_client_height(content, 400.0);

    for (i, name) in ["intro", "usage", "faq"].into_iter().enumerate() {
        let href = format!("#{name}");
        dom.element(nav, "a", "nav-link", &[("href", href.as_str())]);
        let section = dom.element(content, "section", "", &[("id", name)]);
        dom.set_box(section, 600.0 * i as f64, 600.0);
    }

    let opts = ScrollSpyOptions::new(nav).with_on_activate(Some(
        |e: &scrollspy::ActivateEvent<scrollspy::NodeId>| {
            println!("activate {:?}", e.related_target);
        },
    ));
    let mut spy = ScrollSpy::new(&mut dom, content, opts).expect("valid options");
    println!("targets={}", spy.targets().len());

    for top in [0.0, 500.0, 1300.0, 700.0] {
        dom.set_scroll_top(&content, top);
        let activated = spy.on_scroll(&mut dom);
        let href = spy
            .active_target()
            .and_then(|link| dom.attribute(link, "href"));
        println!("scroll_top={top} activated={activated:?} active={href:?}");
    }

    spy.dispose();
}
