use crate::markup::CLASS_ACTIVE;
use crate::parents::ParentShape;
use crate::smooth::{ClickBinding, delegate_link};
use crate::{
    ActivateEvent, ClickOutcome, Dom, Error, IntersectionBatch, IntersectionWatcher, RootMargin,
    ScrollMemory, ScrollSpyConfig, ScrollSpyOptions, TargetIndex, WatcherId,
};

/// A headless scroll spy.
///
/// This type is UI-agnostic:
/// - It holds element handles (`N`) but never the document; every entry point takes the host's
///   [`Dom`] explicitly.
/// - The host forwards scroll/layout changes via [`ScrollSpy::on_scroll`] (or platform observer
///   batches via [`ScrollSpy::process_batch`]) and clicks via [`ScrollSpy::on_click`].
/// - Activation is reported through `ScrollSpyOptions::on_activate` and the return values.
///
/// `container` is the scrollable element whose sections are observed; `options.target` is the
/// navigation root whose links get the `active` class.
#[derive(Debug)]
pub struct ScrollSpy<N> {
    container: N,
    nav_root: N,
    options: ScrollSpyOptions<N>,
    root_margin: RootMargin,
    index: TargetIndex<N>,
    watcher: Option<IntersectionWatcher<N>>,
    next_watcher_id: u64,
    memory: ScrollMemory,
    active_target: Option<N>,
    click_binding: Option<ClickBinding>,
    disposed: bool,
}

impl<N: Clone + PartialEq + core::fmt::Debug> ScrollSpy<N> {
    /// Creates a scroll spy and runs the initial [`ScrollSpy::refresh`].
    ///
    /// Fails when `options.target` is missing or the root margin cannot be parsed.
    pub fn new<D: Dom<Node = N>>(
        dom: &mut D,
        container: N,
        options: ScrollSpyOptions<N>,
    ) -> Result<Self, Error> {
        let nav_root = options.target.clone().ok_or(Error::MissingTarget)?;
        let root_margin = options.resolve_root_margin()?;
        ssdebug!(
            container = ?container,
            target = ?nav_root,
            root_margin = %root_margin,
            smooth_scroll = options.smooth_scroll,
            "ScrollSpy::new"
        );
        let mut spy = Self {
            container,
            nav_root,
            options,
            root_margin,
            index: TargetIndex::default(),
            watcher: None,
            next_watcher_id: 0,
            memory: ScrollMemory::default(),
            active_target: None,
            click_binding: None,
            disposed: false,
        };
        spy.refresh(dom);
        Ok(spy)
    }

    pub fn container(&self) -> &N {
        &self.container
    }

    /// The navigation root.
    pub fn target(&self) -> &N {
        &self.nav_root
    }

    pub fn options(&self) -> &ScrollSpyOptions<N> {
        &self.options
    }

    pub fn config(&self) -> ScrollSpyConfig {
        self.options.config()
    }

    pub fn root_margin(&self) -> RootMargin {
        self.root_margin
    }

    pub fn targets(&self) -> &TargetIndex<N> {
        &self.index
    }

    pub fn active_target(&self) -> Option<&N> {
        self.active_target.as_ref()
    }

    pub fn scroll_memory(&self) -> ScrollMemory {
        self.memory
    }

    /// Restores scroll memory, e.g. after a page reload.
    pub fn set_scroll_memory(&mut self, memory: ScrollMemory) {
        self.memory = memory;
    }

    pub fn watcher(&self) -> Option<&IntersectionWatcher<N>> {
        self.watcher.as_ref()
    }

    pub fn watcher_id(&self) -> Option<WatcherId> {
        self.watcher.as_ref().map(|w| w.id())
    }

    pub fn click_binding(&self) -> Option<ClickBinding> {
        self.click_binding
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Replaces the options and refreshes.
    ///
    /// The navigation root and the root margin are re-resolved; on error the previous options
    /// stay in effect.
    pub fn set_options<D: Dom<Node = N>>(
        &mut self,
        dom: &mut D,
        options: ScrollSpyOptions<N>,
    ) -> Result<(), Error> {
        let nav_root = options.target.clone().ok_or(Error::MissingTarget)?;
        let root_margin = options.resolve_root_margin()?;
        if nav_root != self.nav_root {
            self.clear_active(dom, &self.nav_root);
            self.active_target = None;
            self.click_binding = None;
        }
        self.nav_root = nav_root;
        self.root_margin = root_margin;
        self.options = options;
        self.refresh(dom);
        Ok(())
    }

    /// Clones the current options, applies `f`, then delegates to `set_options`.
    pub fn update_options<D: Dom<Node = N>>(
        &mut self,
        dom: &mut D,
        f: impl FnOnce(&mut ScrollSpyOptions<N>),
    ) -> Result<(), Error> {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(dom, next)
    }

    /// Re-scans the navigation root and re-observes every section.
    ///
    /// The target index is rebuilt from scratch, the smooth-scroll handler is rebound and a new
    /// watcher replaces the old one. Batches from the old watcher are rejected afterwards.
    /// Safe to call repeatedly.
    pub fn refresh<D: Dom<Node = N>>(&mut self, dom: &mut D) {
        if self.disposed {
            sswarn!("ScrollSpy::refresh on a disposed instance");
            return;
        }

        self.index = TargetIndex::build(&*dom, &self.nav_root, &self.container);
        if let Some(active) = &self.active_target {
            if !self.index.contains_link(active) {
                self.clear_active(dom, &self.nav_root);
                self.active_target = None;
            }
        }

        self.maybe_enable_smooth_scroll(&*dom);

        let id = WatcherId(self.next_watcher_id);
        self.next_watcher_id += 1;
        let mut watcher = IntersectionWatcher::new(id, self.container.clone(), self.root_margin);
        for section in self.index.sections() {
            watcher.observe(section.clone());
        }
        if let Some(mut old) = self.watcher.replace(watcher) {
            old.disconnect();
        }

        ssdebug!(
            targets = self.index.len(),
            watcher = id.0,
            "ScrollSpy::refresh"
        );
    }

    /// Stops observing and unbinds the click handler. Every later call is a no-op.
    pub fn dispose(&mut self) {
        if let Some(mut watcher) = self.watcher.take() {
            watcher.disconnect();
        }
        self.click_binding = None;
        self.disposed = true;
        ssdebug!(container = ?self.container, "ScrollSpy::dispose");
    }

    fn maybe_enable_smooth_scroll<D: Dom<Node = N>>(&mut self, dom: &D) {
        // Rebinding replaces the previous handler.
        self.click_binding = self
            .options
            .smooth_scroll
            .then(|| ClickBinding::bind(dom, &self.container));
    }

    /// Polls the watcher and processes whatever changed since the last poll.
    ///
    /// Call this whenever the container scrolls or the layout changes. Returns the link
    /// activated by this batch, if any.
    pub fn on_scroll<D: Dom<Node = N>>(&mut self, dom: &mut D) -> Option<N> {
        if self.disposed {
            return None;
        }
        let batch = self.watcher.as_mut()?.take_records(&*dom);
        if batch.is_empty() {
            return None;
        }
        self.process_batch(dom, &batch)
    }

    /// Applies one batch of intersection changes.
    ///
    /// Hosts that own a real platform observer stamp the batch with [`ScrollSpy::watcher_id`]
    /// at observation time; batches from a replaced watcher are dropped.
    ///
    /// Returns the link activated by this batch, if any.
    pub fn process_batch<D: Dom<Node = N>>(
        &mut self,
        dom: &mut D,
        batch: &IntersectionBatch<N>,
    ) -> Option<N> {
        if self.disposed {
            sstrace!(watcher = batch.watcher.0, "ScrollSpy: batch after dispose dropped");
            return None;
        }
        if self.watcher_id() != Some(batch.watcher) {
            sstrace!(watcher = batch.watcher.0, "ScrollSpy: stale batch dropped");
            return None;
        }

        let parent_scroll_top = dom.scroll_top(&self.container);
        let scrolls_down = self.memory.scrolls_down(parent_scroll_top);
        let mut best_ratio = 0.0;
        let mut activated = None;

        for entry in &batch.entries {
            let link = self.index.link_for_section(&*dom, &entry.target).cloned();

            if !entry.is_intersecting {
                if let Some(link) = link {
                    self.deactivate_link(&mut *dom, &link);
                }
                continue;
            }

            let ratio = entry.intersection_ratio;
            if ratio <= 0.0 || ratio < best_ratio {
                continue;
            }

            // Scrolling down prefers the lower section, scrolling up the higher one.
            let top = dom.offset_top(&entry.target);
            if scrolls_down != self.memory.is_lower(top) {
                continue;
            }

            best_ratio = ratio;
            self.memory.visible_entry_top = top;
            if self.process(&mut *dom, link.clone()) {
                activated = link;
            }
        }

        self.memory.parent_scroll_top = parent_scroll_top;
        sstrace!(
            entries = batch.entries.len(),
            parent_scroll_top,
            scrolls_down,
            "ScrollSpy::process_batch"
        );
        activated
    }

    /// Makes `candidate` the active link.
    ///
    /// A no-op when `candidate` is already active (including both being `None`). Otherwise all
    /// markings under the navigation root are cleared first; `None` leaves nothing active.
    ///
    /// Returns `true` when a new link was activated.
    pub fn process<D: Dom<Node = N>>(&mut self, dom: &mut D, candidate: Option<N>) -> bool {
        if self.active_target == candidate {
            return false;
        }

        self.clear_active(dom, &self.nav_root);
        let Some(link) = candidate else {
            self.active_target = None;
            return false;
        };

        dom.add_class(&link, CLASS_ACTIVE);
        ParentShape::of(&*dom, &link).activate_parents(&mut *dom, &link);
        ssdebug!(link = ?link, "ScrollSpy: activate");

        if let Some(cb) = &self.options.on_activate {
            cb(&ActivateEvent {
                related_target: link.clone(),
            });
        }
        self.active_target = Some(link);
        true
    }

    fn deactivate_link<D: Dom<Node = N>>(&mut self, dom: &mut D, link: &N) {
        if self.active_target.as_ref() == Some(link) {
            self.clear_active(dom, &self.nav_root);
            self.active_target = None;
        } else {
            self.clear_active(dom, link);
        }
    }

    /// Removes the active class from `parent` and everything below it. The navigation root
    /// itself keeps its classes.
    fn clear_active<D: Dom<Node = N>>(&self, dom: &mut D, parent: &N) {
        if *parent != self.nav_root {
            dom.remove_class(parent, CLASS_ACTIVE);
        }
        for node in dom.descendants(parent) {
            if dom.has_class(&node, CLASS_ACTIVE) {
                dom.remove_class(&node, CLASS_ACTIVE);
            }
        }
    }

    /// Smooth-scroll click handling.
    ///
    /// When smooth scrolling is enabled and the click lands on a link inside the navigation
    /// root, the default navigation should be prevented and, if the link points at an observed
    /// section, the container is scrolled to it synchronously.
    pub fn on_click<D: Dom<Node = N>>(&mut self, dom: &mut D, clicked: &N) -> ClickOutcome {
        if self.disposed {
            return ClickOutcome::IGNORED;
        }
        let Some(binding) = self.click_binding else {
            return ClickOutcome::IGNORED;
        };
        let Some(link) = delegate_link(&*dom, &self.nav_root, clicked) else {
            return ClickOutcome::IGNORED;
        };

        let section = dom
            .link_fragment(&link)
            .and_then(|fragment| self.index.section(&fragment).cloned());
        let scrolled_to = section.map(|section| {
            let top = binding.scroll_target(&*dom, &section);
            dom.set_scroll_top(&self.container, top);
            top
        });
        sstrace!(link = ?link, scrolled_to = ?scrolled_to, "ScrollSpy::on_click");
        ClickOutcome {
            prevent_default: true,
            scrolled_to,
        }
    }
}
