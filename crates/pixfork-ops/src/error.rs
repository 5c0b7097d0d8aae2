//! Error types for image operations.

use thiserror::Error;

/// Error type for image operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid dimensions specified.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// A buffer could not be allocated.
    #[error("failed to allocate {requested} elements")]
    AllocationFailed {
        /// Elements requested
        requested: usize,
    },

    /// A dedicated worker pool could not be built.
    #[error("thread pool: {0}")]
    ThreadPool(String),

    /// Error from the image model.
    #[error(transparent)]
    Core(#[from] pixfork_core::Error),
}

/// Result type for image operations.
pub type OpsResult<T> = Result<T, OpsError>;
