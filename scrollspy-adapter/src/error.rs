/// Errors raised by the host glue.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AdapterError {
    #[error("No method named \"{0}\"")]
    UnknownCommand(String),
    #[error("scrollspy target not found: {0}")]
    TargetNotFound(String),
    #[error("invalid value {value:?} for attribute {name}")]
    InvalidAttribute { name: &'static str, value: String },
    #[error(transparent)]
    Spy(#[from] scrollspy::Error),
}
