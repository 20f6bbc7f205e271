use thiserror::Error;
use tracing::error;

pub type Result<T> = std::result::Result<T, Error>;

/// The two fatal error kinds. Both end the run; there is no partial-success
/// mode and no retry.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or semantically invalid configuration input
    #[error("{0}")]
    Value(String),

    /// Missing or invalid filesystem paths, bad structure, or a failed
    /// external tool
    #[error("{0}")]
    File(String),
}

impl Error {
    /// Build a value error, recording the message to the diagnostic stream
    /// before it is surfaced.
    pub fn value(message: impl Into<String>) -> Self {
        let message = message.into();
        error!("{message}");
        Error::Value(message)
    }

    /// Build a file error, recording the message to the diagnostic stream
    /// before it is surfaced.
    pub fn file(message: impl Into<String>) -> Self {
        let message = message.into();
        error!("{message}");
        Error::File(message)
    }
}
