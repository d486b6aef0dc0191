use std::fmt::Display;

use thiserror::Error;

/// Errors raised by platform window queries and commands.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The handle no longer denotes a live window.
    #[error("window 0x{0:X} no longer exists")]
    StaleHandle(usize),

    /// A platform call returned a failure.
    #[error("{op} failed: {message}")]
    Call { op: &'static str, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PlatformError {
    /// Wraps any displayable platform error as a failed call.
    pub fn call(op: &'static str, err: impl Display) -> Self {
        Self::Call {
            op,
            message: err.to_string(),
        }
    }
}

/// Result type for window operations.
pub type WindowResult<T> = Result<T, PlatformError>;
