//! # pixfork-core
//!
//! Core types for the pixfork image engine.
//!
//! - [`Rgb`] - 8-bit RGB triple, no alpha
//! - [`Image`] - Immutable row-major pixel buffer with a maximum channel value
//! - [`pixel_index`] - The single `(x, y) -> y*width + x` accessor
//! - [`Error`] - Construction and allocation failures
//!
//! ## Crate Structure
//!
//! ```text
//! pixfork-core (this crate)
//!    ^
//!    |
//!    +-- pixfork-io  (binary codec)
//!    +-- pixfork-ops (pointwise + fork-join spatial transforms)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod image;
pub mod pixel;

pub use error::*;
pub use image::{alloc_pixels, pixel_count, pixel_index, Image};
pub use pixel::{luma_rec601, Rgb, REC601_LUMA, REC601_LUMA_B, REC601_LUMA_G, REC601_LUMA_R};

/// Prelude module for convenient imports.
///
/// ```
/// use pixfork_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::image::{pixel_index, Image};
    pub use crate::pixel::Rgb;
}
