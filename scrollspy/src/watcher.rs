use alloc::vec::Vec;

use crate::options::THRESHOLDS;
use crate::{Dom, IntersectionBatch, IntersectionEntry, RootMargin, WatcherId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Observation {
    threshold_index: usize,
    is_intersecting: bool,
}

#[derive(Clone, Debug)]
struct Observed<N> {
    section: N,
    last: Option<Observation>,
}

/// A headless stand-in for the platform's intersection observer, rooted at the observed
/// container.
///
/// The watcher does not run on its own: the host calls [`IntersectionWatcher::take_records`]
/// (usually through [`crate::ScrollSpy::on_scroll`]) whenever the container scrolls or its
/// layout changes, and gets back only the sections whose visibility crossed a threshold since
/// the previous call.
#[derive(Clone, Debug)]
pub struct IntersectionWatcher<N> {
    id: WatcherId,
    root: N,
    root_margin: RootMargin,
    observed: Vec<Observed<N>>,
    connected: bool,
}

impl<N: Clone + PartialEq> IntersectionWatcher<N> {
    pub fn new(id: WatcherId, root: N, root_margin: RootMargin) -> Self {
        Self {
            id,
            root,
            root_margin,
            observed: Vec::new(),
            connected: true,
        }
    }

    pub fn id(&self) -> WatcherId {
        self.id
    }

    pub fn root_margin(&self) -> RootMargin {
        self.root_margin
    }

    pub fn thresholds(&self) -> &'static [f64] {
        &THRESHOLDS
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Starts observing `section`. Observing the same section twice is a no-op.
    ///
    /// A newly observed section always produces one entry on the next `take_records`.
    pub fn observe(&mut self, section: N) {
        if !self.connected {
            sswarn!(watcher = self.id.0, "IntersectionWatcher: observe after disconnect");
            return;
        }
        if self.observed.iter().any(|o| o.section == section) {
            return;
        }
        self.observed.push(Observed {
            section,
            last: None,
        });
    }

    pub fn unobserve(&mut self, section: &N) {
        self.observed.retain(|o| o.section != *section);
    }

    pub fn observed(&self) -> impl Iterator<Item = &N> + '_ {
        self.observed.iter().map(|o| &o.section)
    }

    /// Stops observing everything. A disconnected watcher never produces records again.
    pub fn disconnect(&mut self) {
        sstrace!(watcher = self.id.0, "IntersectionWatcher::disconnect");
        self.observed.clear();
        self.connected = false;
    }

    /// Computes the current intersection of every observed section and returns the entries whose
    /// threshold bucket or intersecting state changed, in observation order.
    pub fn take_records<D: Dom<Node = N>>(&mut self, dom: &D) -> IntersectionBatch<N> {
        let mut entries = Vec::new();
        if self.connected {
            let root_top = dom.offset_top(&self.root) + dom.scroll_top(&self.root);
            let (view_top, view_bottom) =
                self.root_margin.vertical_bounds(dom.client_height(&self.root));

            for o in &mut self.observed {
                let top = dom.offset_top(&o.section) - root_top;
                let height = dom.offset_height(&o.section);
                let (is_intersecting, ratio) =
                    intersection(top, top + height, view_top, view_bottom);
                let next = Observation {
                    threshold_index: threshold_index(ratio),
                    is_intersecting,
                };
                if o.last == Some(next) {
                    continue;
                }
                o.last = Some(next);
                entries.push(IntersectionEntry {
                    target: o.section.clone(),
                    is_intersecting,
                    intersection_ratio: ratio,
                });
            }
        }
        IntersectionBatch {
            watcher: self.id,
            entries,
        }
    }
}

/// Vertical intersection of `[top, bottom)` with the effective viewport.
///
/// Edge-adjacent boxes count as intersecting with a ratio of 0; zero-height boxes that touch the
/// viewport have a ratio of 1.
fn intersection(top: f64, bottom: f64, view_top: f64, view_bottom: f64) -> (bool, f64) {
    let lo = top.max(view_top);
    let hi = bottom.min(view_bottom);
    if hi < lo || view_bottom < view_top {
        return (false, 0.0);
    }
    let height = bottom - top;
    if height <= 0.0 {
        return (true, 1.0);
    }
    (true, ((hi - lo) / height).clamp(0.0, 1.0))
}

/// Index of the first threshold strictly greater than `ratio`.
fn threshold_index(ratio: f64) -> usize {
    THRESHOLDS.iter().take_while(|&&t| t <= ratio).count()
}
