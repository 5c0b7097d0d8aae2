//! # pixfork-io
//!
//! Image codec for pixfork: reads and writes binary PPM (`P6`) files.
//!
//! # Architecture
//!
//! - [`ImageReader`] / [`ImageWriter`] - Traits implemented by the codec
//! - [`ppm`] - The P6 reader and writer, from files, readers or memory
//! - [`load`] / [`save`] - Path-based entry points
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use pixfork_io::{load, save};
//!
//! let image = load("florence.ppm")?;
//! save("copy.ppm", &image)?;
//! ```
//!
//! # Errors
//!
//! Malformed or truncated input is [`IoError::Format`]; failures of the
//! underlying file are [`IoError::Io`]. Neither is retried.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod traits;
pub mod ppm;

pub use error::{IoError, IoResult};
pub use ppm::{decode, encode, PpmReader, PpmWriter};
pub use traits::{ImageReader, ImageWriter};

use pixfork_core::Image;
use std::path::Path;

/// Loads an image from a PPM file.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be opened or read ([`IoError::Io`])
/// - The header or body is malformed or truncated ([`IoError::Format`])
pub fn load<P: AsRef<Path>>(path: P) -> IoResult<Image> {
    ppm::read(path)
}

/// Saves an image as a PPM file, replacing any existing file.
pub fn save<P: AsRef<Path>>(image: &Image, path: P) -> IoResult<()> {
    ppm::write(path, image)
}
