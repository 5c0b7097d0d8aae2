//! I/O traits for image readers and writers.

use crate::IoResult;
use pixfork_core::Image;
use std::path::Path;

/// Trait for image format readers.
pub trait ImageReader {
    /// Reads an image from a file path.
    fn read<P: AsRef<Path>>(&self, path: P) -> IoResult<Image>;

    /// Reads an image from memory.
    fn read_from_memory(&self, data: &[u8]) -> IoResult<Image>;
}

/// Trait for image format writers.
pub trait ImageWriter {
    /// Writes an image to a file path.
    fn write<P: AsRef<Path>>(&self, path: P, image: &Image) -> IoResult<()>;

    /// Writes an image to memory.
    fn write_to_memory(&self, image: &Image) -> IoResult<Vec<u8>>;
}
