//! Error types for tidings-bus

use thiserror::Error;

/// Dispatcher error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A subscription was requested without a callback
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration text could not be parsed
    #[error("Config error: {0}")]
    Config(String),
}

impl From<ron::error::SpannedError> for Error {
    fn from(err: ron::error::SpannedError) -> Self {
        Error::Config(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

// Compile-time check that Error can cross threads alongside the dispatcher.
fn _assert_error_send_sync<T: Send + Sync>() {}
fn _error_is_send_sync() {
    _assert_error_send_sync::<Error>();
}
