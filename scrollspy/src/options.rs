use alloc::string::{String, ToString};
use alloc::sync::Arc;

use crate::margin::offset_margin_string;
use crate::{ActivateEvent, Error, RootMargin};

/// A callback fired when a new link becomes active.
pub type OnActivateCallback<N> = Arc<dyn Fn(&ActivateEvent<N>) + Send + Sync>;

pub const DEFAULT_ROOT_MARGIN: &str = "0px 0px -40%";

/// Intersection thresholds used by the watcher.
pub const THRESHOLDS: [f64; 2] = [0.0, 0.5];

/// Configuration for [`crate::ScrollSpy`].
///
/// Like the rest of the engine, this type does not hold UI objects beyond the `N` handle of the
/// navigation root.
pub struct ScrollSpyOptions<N> {
    /// The navigation root holding the links. Required.
    pub target: Option<N>,
    /// CSS-margin-like rectangle applied to the observed container (default `"0px 0px -40%"`).
    pub root_margin: String,
    /// Intercept clicks on navigation links and set the container's scroll offset directly.
    pub smooth_scroll: bool,
    /// Deprecated pixel offset. When set (and non-zero) it replaces `root_margin` with a top-only
    /// margin of `"{offset}px 0px 0px"`.
    pub offset: Option<f64>,
    pub on_activate: Option<OnActivateCallback<N>>,
}

impl<N: Clone> Clone for ScrollSpyOptions<N> {
    fn clone(&self) -> Self {
        Self {
            target: self.target.clone(),
            root_margin: self.root_margin.clone(),
            smooth_scroll: self.smooth_scroll,
            offset: self.offset,
            on_activate: self.on_activate.clone(),
        }
    }
}

impl<N> Default for ScrollSpyOptions<N> {
    fn default() -> Self {
        Self {
            target: None,
            root_margin: DEFAULT_ROOT_MARGIN.to_string(),
            smooth_scroll: false,
            offset: None,
            on_activate: None,
        }
    }
}

impl<N> ScrollSpyOptions<N> {
    /// Creates options for the given navigation root, with defaults for everything else.
    pub fn new(target: N) -> Self {
        Self {
            target: Some(target),
            ..Self::default()
        }
    }

    pub fn with_root_margin(mut self, root_margin: impl Into<String>) -> Self {
        self.root_margin = root_margin.into();
        self
    }

    pub fn with_smooth_scroll(mut self, smooth_scroll: bool) -> Self {
        self.smooth_scroll = smooth_scroll;
        self
    }

    pub fn with_offset(mut self, offset: Option<f64>) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_on_activate(
        mut self,
        on_activate: Option<impl Fn(&ActivateEvent<N>) + Send + Sync + 'static>,
    ) -> Self {
        self.on_activate = on_activate.map(|f| Arc::new(f) as _);
        self
    }

    /// Applies the serializable part of a [`ScrollSpyConfig`].
    pub fn with_config(mut self, config: &ScrollSpyConfig) -> Self {
        self.root_margin = config.root_margin.clone();
        self.smooth_scroll = config.smooth_scroll;
        self.offset = config.offset;
        self
    }

    pub fn config(&self) -> ScrollSpyConfig {
        ScrollSpyConfig {
            root_margin: self.root_margin.clone(),
            smooth_scroll: self.smooth_scroll,
            offset: self.offset,
        }
    }

    /// The deprecated offset, if it is set to a finite value other than zero.
    fn legacy_offset(&self) -> Option<f64> {
        self.offset.filter(|&o| o != 0.0 && o.is_finite())
    }

    /// The margin string handed to the watcher: the legacy offset wins over `root_margin`.
    pub fn effective_root_margin(&self) -> String {
        match self.legacy_offset() {
            Some(offset) => offset_margin_string(offset),
            None => self.root_margin.clone(),
        }
    }

    pub(crate) fn resolve_root_margin(&self) -> Result<RootMargin, Error> {
        if let Some(offset) = self.legacy_offset() {
            if self.root_margin != DEFAULT_ROOT_MARGIN {
                sswarn!(
                    offset,
                    root_margin = %self.root_margin,
                    "ScrollSpyOptions: deprecated offset overrides root_margin"
                );
            }
            return Ok(RootMargin::from_offset(offset));
        }
        RootMargin::parse(&self.root_margin)
    }
}

impl<N: core::fmt::Debug> core::fmt::Debug for ScrollSpyOptions<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScrollSpyOptions")
            .field("target", &self.target)
            .field("root_margin", &self.root_margin)
            .field("smooth_scroll", &self.smooth_scroll)
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}

/// The plain-data part of [`ScrollSpyOptions`].
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`. Missing fields take
/// their defaults.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct ScrollSpyConfig {
    pub root_margin: String,
    pub smooth_scroll: bool,
    pub offset: Option<f64>,
}

impl Default for ScrollSpyConfig {
    fn default() -> Self {
        Self {
            root_margin: DEFAULT_ROOT_MARGIN.to_string(),
            smooth_scroll: false,
            offset: None,
        }
    }
}
