use core::fmt;
use core::str::FromStr;

use crate::AdapterError;

/// The string-keyed commands accepted by [`crate::Registry::execute`].
///
/// Only the public operations are reachable; private (`_`-prefixed) and reserved names are
/// rejected like any unknown name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Command {
    Refresh,
    Dispose,
}

impl Command {
    pub fn name(self) -> &'static str {
        match self {
            Self::Refresh => "refresh",
            Self::Dispose => "dispose",
        }
    }
}

impl FromStr for Command {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "refresh" => Ok(Self::Refresh),
            "dispose" => Ok(Self::Dispose),
            _ => Err(AdapterError::UnknownCommand(s.to_owned())),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
