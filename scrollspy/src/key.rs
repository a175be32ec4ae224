use alloc::string::String;

#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

/// Fragment (`#id`) → position in the ordered target list.
#[cfg(feature = "std")]
pub(crate) type FragmentMap = HashMap<String, usize>;
#[cfg(not(feature = "std"))]
pub(crate) type FragmentMap = BTreeMap<String, usize>;
