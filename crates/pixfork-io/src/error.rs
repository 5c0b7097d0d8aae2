//! Error types for I/O operations.

use std::io;
use thiserror::Error;

/// Codec and file error.
#[derive(Debug, Error)]
pub enum IoError {
    /// Underlying read or write failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed or truncated header or body.
    #[error("format error: {0}")]
    Format(String),

    /// Image construction failed for a reason other than the file format,
    /// such as an allocation failure.
    #[error("image error: {0}")]
    Image(#[from] pixfork_core::Error),
}

impl IoError {
    /// Creates an [`IoError::Format`] error.
    #[inline]
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    /// Returns `true` for malformed input.
    #[inline]
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::Format(_))
    }
}

/// Result type for I/O operations.
pub type IoResult<T> = Result<T, IoError>;
