use alloc::vec::Vec;

/// Generation stamp of an [`crate::IntersectionWatcher`].
///
/// Every refresh creates a watcher with a fresh id; batches stamped with any other id are stale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WatcherId(pub u64);

/// A single visibility change of an observed section.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntersectionEntry<N> {
    pub target: N,
    pub is_intersecting: bool,
    /// Visible fraction of the section, in `0.0..=1.0`.
    pub intersection_ratio: f64,
}

/// All entries delivered by one watcher callback.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntersectionBatch<N> {
    pub watcher: WatcherId,
    pub entries: Vec<IntersectionEntry<N>>,
}

impl<N> IntersectionBatch<N> {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Payload of the "activate" notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivateEvent<N> {
    /// The newly active navigation link.
    pub related_target: N,
}

/// What the host should do with a click on the navigation root.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ClickOutcome {
    pub prevent_default: bool,
    /// The scroll offset that was applied to the observed container, if any.
    pub scrolled_to: Option<f64>,
}

impl ClickOutcome {
    pub const IGNORED: Self = Self {
        prevent_default: false,
        scrolled_to: None,
    };
}
