// Example: declarative setup from `data-bs-*` attributes, with "activate" listeners and commands.
use scrollspy::{Dom, MemoryDom};
use scrollspy_adapter::{Registry, auto_init};

fn main() {
    let mut dom = MemoryDom::new();
    let body = dom.root();
    let nav = dom.element(body, "nav", "nav", &[("id", "toc")]);
    let content = dom.element(
        body,
        "div",
        "",
        &[
            ("data-bs-spy", "scroll"),
            ("data-bs-target", "#toc"),
            ("data-bs-smooth-scroll", "true"),
        ],
    );
    dom.set_box(content, 0.0, 300.0);
    dom.set_client_height(content, 300.0);

    let mut links = Vec::new();
    for (i, name) in ["install", "configure", "deploy"].into_iter().enumerate() {
        let href = format!("#{name}");
        links.push(dom.element(nav, "a", "nav-link", &[("href", href.as_str())]));
        let section = dom.element(content, "section", "", &[("id", name)]);
        dom.set_box(section, 500.0 * i as f64, 500.0);
    }

    let mut registry = Registry::new();
    let report = auto_init(&mut dom, &body, &mut registry);
    println!(
        "initialized={} failed={}",
        report.initialized.len(),
        report.failed.len()
    );

    registry.events_mut().on(content, |e| {
        println!("activate {:?}", e.related_target);
    });

    registry.on_scroll(&mut dom, &content);
    let outcome = registry.on_click(&mut dom, &content, &links[2]);
    println!("click: {outcome:?}");
    registry.on_scroll(&mut dom, &content);

    if let Err(e) = registry.execute(&mut dom, &body, &content, "_process") {
        println!("{e}");
    }
    registry
        .execute(&mut dom, &body, &content, "dispose")
        .expect("known command");
    println!("instances={}", registry.len());
}
