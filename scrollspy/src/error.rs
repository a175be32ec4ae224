use alloc::string::String;

/// Errors surfaced synchronously while constructing a [`crate::ScrollSpy`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("scrollspy target is missing or does not resolve to an element")]
    MissingTarget,
    #[error("invalid root margin {margin:?}: {reason}")]
    InvalidRootMargin { margin: String, reason: &'static str },
}
