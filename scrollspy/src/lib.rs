//! A headless scroll spy: keeps a navigation list in sync with the section that is currently
//! visible inside a scrollable container.
//!
//! For host-level glue (instance registry, data attributes, legacy commands, event bus), see the
//! `scrollspy-adapter` crate.
//!
//! This crate focuses on the core state machine: indexing navigation links against sections,
//! computing threshold-crossing intersection batches, picking at most one active link with a
//! scroll-direction tie-break, and marking the active link's ancestors (nested lists and dropdown
//! menus).
//!
//! It is UI-agnostic. A browser/TUI/GUI layer is expected to provide:
//! - a [`Dom`] implementation (element tree, classes, attributes, geometry)
//! - scroll/layout notifications (`ScrollSpy::on_scroll`) or platform intersection batches
//! - click notifications on the navigation root, when smooth scrolling is enabled
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod dom;
mod error;
mod index;
mod key;
mod margin;
pub mod markup;
mod memory;
mod options;
mod parents;
mod scrollspy;
mod smooth;
mod state;
mod types;
mod watcher;

#[cfg(test)]
mod tests;

pub use dom::Dom;
pub use error::Error;
pub use index::{Target, TargetIndex};
pub use margin::{MarginValue, RootMargin};
pub use memory::{MemoryDom, NodeId};
pub use options::{
    DEFAULT_ROOT_MARGIN, OnActivateCallback, ScrollSpyConfig, ScrollSpyOptions, THRESHOLDS,
};
pub use parents::ParentShape;
pub use scrollspy::ScrollSpy;
pub use smooth::ClickBinding;
pub use state::ScrollMemory;
pub use types::{ActivateEvent, ClickOutcome, IntersectionBatch, IntersectionEntry, WatcherId};
pub use watcher::IntersectionWatcher;
