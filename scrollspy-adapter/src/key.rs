/// Element handles usable as registry and event-bus keys.
pub trait ElementKey: core::hash::Hash + Eq + Clone + core::fmt::Debug {}
impl<T: core::hash::Hash + Eq + Clone + core::fmt::Debug> ElementKey for T {}
