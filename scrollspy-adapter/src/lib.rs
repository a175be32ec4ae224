//! Host glue for the `scrollspy` crate.
//!
//! The `scrollspy` crate is UI-agnostic and only knows about a single spy. This crate provides
//! the pieces a page-level integration needs on top of it:
//!
//! - A per-container instance registry (`get_or_create_instance`, `dispose`)
//! - String-keyed commands for legacy callers (`"refresh"`, `"dispose"`)
//! - Declarative initialization from `data-bs-*` attributes
//! - An "activate" event bus keyed by container
//!
//! Requires `std`: activations are handed from the spy callback to the event bus through a mutex.
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod command;
pub mod data_api;
mod error;
mod events;
mod key;
mod registry;


pub use command::Command;
pub use data_api::{AutoInitReport, Selector, auto_init, options_from_element, select_first};
pub use error::AdapterError;
pub use events::{EventBus, ListenerId};
pub use key::ElementKey;
pub use registry::Registry;
