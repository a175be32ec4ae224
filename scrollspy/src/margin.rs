use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use crate::Error;

/// One side of a [`RootMargin`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MarginValue {
    Pixels(f64),
    /// Percentage of the root's size on the same axis.
    Percentage(f64),
}

impl MarginValue {
    pub fn to_pixels(self, reference: f64) -> f64 {
        match self {
            Self::Pixels(px) => px,
            Self::Percentage(pct) => reference * pct / 100.0,
        }
    }

    fn parse(value: &str) -> Result<Self, &'static str> {
        let parsed = if let Some(num) = value.strip_suffix('%') {
            num.parse::<f64>()
                .map(Self::Percentage)
                .map_err(|_| "invalid percentage")
        } else if let Some(num) = value.strip_suffix("px") {
            num.parse::<f64>()
                .map(Self::Pixels)
                .map_err(|_| "invalid pixel value")
        } else {
            // Only unitless zero is valid CSS, but browsers are lenient about `0` vs `0px`.
            value
                .parse::<f64>()
                .map(Self::Pixels)
                .map_err(|_| "margin values must be in px or %")
        }?;
        match parsed {
            Self::Pixels(v) | Self::Percentage(v) if !v.is_finite() => {
                Err("margin values must be finite")
            }
            _ => Ok(parsed),
        }
    }
}

impl Default for MarginValue {
    fn default() -> Self {
        Self::Pixels(0.0)
    }
}

impl fmt::Display for MarginValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pixels(px) => write!(f, "{px}px"),
            Self::Percentage(pct) => write!(f, "{pct}%"),
        }
    }
}

/// The margin rectangle applied to the observed container before intersection is computed.
///
/// Positive values grow the effective viewport, negative values shrink it. Parsed from the CSS
/// margin shorthand (1 to 4 components).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RootMargin {
    pub top: MarginValue,
    pub right: MarginValue,
    pub bottom: MarginValue,
    pub left: MarginValue,
}

impl RootMargin {
    /// Margin used when only the deprecated pixel offset is configured.
    pub fn from_offset(offset: f64) -> Self {
        Self {
            top: MarginValue::Pixels(offset),
            ..Self::default()
        }
    }

    pub fn parse(margin: &str) -> Result<Self, Error> {
        let invalid = |reason| Error::InvalidRootMargin {
            margin: margin.to_string(),
            reason,
        };
        let parts = margin
            .split_whitespace()
            .map(MarginValue::parse)
            .collect::<Result<Vec<_>, _>>()
            .map_err(invalid)?;

        match parts[..] {
            [] => Ok(Self::default()),
            [all] => Ok(Self {
                top: all,
                right: all,
                bottom: all,
                left: all,
            }),
            [vertical, horizontal] => Ok(Self {
                top: vertical,
                right: horizontal,
                bottom: vertical,
                left: horizontal,
            }),
            [top, horizontal, bottom] => Ok(Self {
                top,
                right: horizontal,
                bottom,
                left: horizontal,
            }),
            [top, right, bottom, left] => Ok(Self {
                top,
                right,
                bottom,
                left,
            }),
            _ => Err(invalid("expected 1 to 4 values")),
        }
    }

    /// Vertical bounds `(top, bottom)` of the effective viewport for a root of the given height,
    /// relative to the root's visible top edge.
    pub fn vertical_bounds(&self, root_height: f64) -> (f64, f64) {
        let top = -self.top.to_pixels(root_height);
        let bottom = root_height + self.bottom.to_pixels(root_height);
        (top, bottom)
    }
}

impl FromStr for RootMargin {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }
}

/// Formats the deprecated offset the way it is handed to the observation primitive.
pub(crate) fn offset_margin_string(offset: f64) -> String {
    alloc::format!("{offset}px 0px 0px")
}
