//! Common error types for EventDesk

use thiserror::Error;

/// Common result type for EventDesk operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared by every EventDesk component
///
/// Every failure is scoped to the operation that triggered it; nothing here
/// is fatal to the process.
#[derive(Error, Debug)]
pub enum Error {
    /// Bad input shape or range (reported next to the offending form field)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced entity does not exist in the caller's owner scope
    #[error("Not found: {0}")]
    NotFound(String),

    /// Store unreachable or write rejected (wraps sqlx::Error)
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// Stored row could not be parsed into its record type
    #[error("Storage error: invalid record: {0}")]
    InvalidRecord(String),

    /// No active owner for the request
    #[error("Authentication required")]
    AuthRequired,

    /// Device bridge unreachable or reported a failure
    #[error("Device unavailable: {0}")]
    DeviceUnavailable(String),

    /// Operator command issued in the wrong state
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for failures of the backing store
    pub fn is_storage(&self) -> bool {
        matches!(self, Error::Storage(_) | Error::InvalidRecord(_))
    }
}
