//! Error types for pixfork-core operations.
//!
//! Every constructor of [`crate::Image`] validates its inputs and reports
//! failures through the [`Error`] enum defined here.
//!
//! # Usage
//!
//! ```rust
//! use pixfork_core::{Error, Result};
//!
//! fn check(width: u32, height: u32) -> Result<()> {
//!     if width == 0 || height == 0 {
//!         return Err(Error::invalid_dimensions(width, height, "must be positive"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check(0, 4).is_err());
//! ```
//!
//! # Used By
//!
//! - [`crate::image::Image`] - buffer construction
//! - `pixfork-io` - decode failures wrap this error
//! - `pixfork-ops` - transforms forward it through `OpsError::Core`

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or accessing image buffers.
#[derive(Debug, Error)]
pub enum Error {
    /// Width or height is zero, the pixel count overflows, or the
    /// pixel buffer length does not match `width * height`.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Reason why dimensions are invalid
        reason: String,
    },

    /// Maximum channel value must be in `1..=255`.
    #[error("invalid maximum channel value: {0}")]
    InvalidMaxValue(u32),

    /// A channel exceeds the image's maximum channel value.
    #[error("pixel {index} has channel value {value} above maximum {max}")]
    ChannelOutOfRange {
        /// Flat pixel index
        index: usize,
        /// Offending channel value
        value: u8,
        /// Maximum channel value of the image
        max: u8,
    },

    /// Memory allocation failed.
    ///
    /// Buffers are reserved with `try_reserve_exact`, so very large images
    /// surface here instead of aborting the process.
    #[error("failed to allocate {requested} pixels: {reason}")]
    AllocationFailed {
        /// Pixels requested
        requested: usize,
        /// Failure reason
        reason: String,
    },
}

impl Error {
    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::AllocationFailed`] error.
    #[inline]
    pub fn allocation_failed(requested: usize, reason: impl Into<String>) -> Self {
        Self::AllocationFailed {
            requested,
            reason: reason.into(),
        }
    }

    /// Returns `true` if this is an allocation error.
    #[inline]
    pub fn is_allocation_error(&self) -> bool {
        matches!(self, Self::AllocationFailed { .. })
    }

    /// Returns `true` if this is a dimension error.
    #[inline]
    pub fn is_dimension_error(&self) -> bool {
        matches!(self, Self::InvalidDimensions { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_dimensions_message() {
        let err = Error::invalid_dimensions(0, 20, "width must be positive");
        let msg = err.to_string();
        assert!(msg.contains("0x20"));
        assert!(msg.contains("width must be positive"));
        assert!(err.is_dimension_error());
    }

    #[test]
    fn test_allocation_failed() {
        let err = Error::allocation_failed(1 << 40, "capacity overflow");
        assert!(err.to_string().contains("capacity overflow"));
        assert!(err.is_allocation_error());
    }

    #[test]
    fn test_channel_out_of_range_message() {
        let err = Error::ChannelOutOfRange { index: 3, value: 200, max: 100 };
        assert_eq!(
            err.to_string(),
            "pixel 3 has channel value 200 above maximum 100"
        );
    }
}
