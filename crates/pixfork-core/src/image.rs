//! The owned RGB image buffer.
//!
//! # Memory Layout
//!
//! Pixels are stored in **row-major** order, top-to-bottom, with no padding:
//!
//! ```text
//! pixels: [p(0,0) p(1,0) ... p(w-1,0)]  <- row 0
//!         [p(0,1) p(1,1) ... p(w-1,1)]  <- row 1
//!         ...
//! ```
//!
//! Every component addresses pixels through [`pixel_index`], so the codec,
//! the convolution and the mirror swap all agree on `(x, y) -> y*width + x`.
//!
//! # Usage
//!
//! ```rust
//! use pixfork_core::{Image, Rgb};
//!
//! let img = Image::from_pixels(2, 1, 255, vec![Rgb::new(10, 20, 30), Rgb::new(200, 150, 100)]).unwrap();
//! assert_eq!(img.pixel(1, 0), Rgb::new(200, 150, 100));
//! assert_eq!(img.index(1, 0), 1);
//! ```
//!
//! Images are values: transforms never mutate an input image, they return a
//! new one with a freshly allocated buffer.

use crate::{Error, Result, Rgb};
use rayon::prelude::*;

/// Flat row-major index of pixel `(x, y)` in an image `width` pixels wide.
#[inline(always)]
pub fn pixel_index(width: usize, x: usize, y: usize) -> usize {
    y * width + x
}

/// Computes `width * height`, rejecting zero and overflowing dimensions.
pub fn pixel_count(width: u32, height: u32) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(Error::invalid_dimensions(
            width,
            height,
            "width and height must be positive",
        ));
    }
    (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| Error::invalid_dimensions(width, height, "pixel count overflows"))
}

/// Allocates an empty pixel buffer with room for exactly `count` pixels.
///
/// Uses `try_reserve_exact`, so an oversized request is an
/// [`Error::AllocationFailed`] rather than an abort.
pub fn alloc_pixels(count: usize) -> Result<Vec<Rgb>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(count)
        .map_err(|e| Error::allocation_failed(count, e.to_string()))?;
    Ok(buf)
}

/// Owned 8-bit RGB image.
///
/// Invariants, checked by every constructor:
/// - `width > 0` and `height > 0`
/// - `pixels.len() == width * height`
/// - `1 <= max_value <= 255` and no channel exceeds `max_value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    max_value: u8,
    pixels: Vec<Rgb>,
}

impl Image {
    /// Creates an image from an existing pixel buffer.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDimensions`] for zero sizes or a length mismatch
    /// - [`Error::InvalidMaxValue`] if `max_value` is zero or above 255
    /// - [`Error::ChannelOutOfRange`] if a channel exceeds `max_value`
    pub fn from_pixels(width: u32, height: u32, max_value: u32, pixels: Vec<Rgb>) -> Result<Self> {
        let max = validate_max_value(max_value)?;
        let expected = pixel_count(width, height)?;
        if pixels.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} pixels, got {}", expected, pixels.len()),
            ));
        }
        if let Some((index, p)) = pixels
            .iter()
            .enumerate()
            .find(|(_, p)| p.max_channel() > max)
        {
            return Err(Error::ChannelOutOfRange {
                index,
                value: p.max_channel(),
                max,
            });
        }
        Ok(Self {
            width,
            height,
            max_value: max,
            pixels,
        })
    }

    /// Creates an image with every pixel set to `fill`.
    pub fn filled(width: u32, height: u32, max_value: u32, fill: Rgb) -> Result<Self> {
        let count = pixel_count(width, height)?;
        let mut pixels = alloc_pixels(count)?;
        pixels.resize(count, fill);
        Self::from_pixels(width, height, max_value, pixels)
    }

    /// Creates an image by evaluating `f(x, y)` for every pixel.
    ///
    /// ```rust
    /// use pixfork_core::{Image, Rgb};
    ///
    /// let ramp = Image::from_fn(4, 2, 255, |x, y| Rgb::new(x as u8, y as u8, 0)).unwrap();
    /// assert_eq!(ramp.pixel(3, 1), Rgb::new(3, 1, 0));
    /// ```
    pub fn from_fn<F>(width: u32, height: u32, max_value: u32, mut f: F) -> Result<Self>
    where
        F: FnMut(u32, u32) -> Rgb,
    {
        let count = pixel_count(width, height)?;
        let mut pixels = alloc_pixels(count)?;
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self::from_pixels(width, height, max_value, pixels)
    }

    /// Builds an image with this image's shape from a transformed buffer.
    ///
    /// Only the length is checked. Transforms call this with buffers whose
    /// channels they already bound by `max_value`.
    pub fn with_pixels(&self, pixels: Vec<Rgb>) -> Result<Self> {
        if pixels.len() != self.pixels.len() {
            return Err(Error::invalid_dimensions(
                self.width,
                self.height,
                format!("expected {} pixels, got {}", self.pixels.len(), pixels.len()),
            ));
        }
        debug_assert!(pixels.iter().all(|p| p.max_channel() <= self.max_value));
        Ok(Self {
            width: self.width,
            height: self.height,
            max_value: self.max_value,
            pixels,
        })
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Maximum channel value.
    #[inline]
    pub fn max_value(&self) -> u8 {
        self.max_value
    }

    /// Number of pixels, `width * height`.
    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Always `false`; images have at least one pixel.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Flat index of `(x, y)`.
    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        pixel_index(self.width as usize, x as usize, y as usize)
    }

    /// Pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        self.pixels[self.index(x, y)]
    }

    /// All pixels in row-major order.
    #[inline]
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Parallel iterator over all pixels in row-major order.
    #[inline]
    pub fn par_pixels(&self) -> rayon::slice::Iter<'_, Rgb> {
        self.pixels.par_iter()
    }

    /// Row `y` as a slice of `width` pixels.
    #[inline]
    pub fn row(&self, y: u32) -> &[Rgb] {
        let start = self.index(0, y);
        &self.pixels[start..start + self.width as usize]
    }

    /// Iterator over rows, top to bottom.
    pub fn rows(&self) -> std::slice::ChunksExact<'_, Rgb> {
        self.pixels.chunks_exact(self.width as usize)
    }

    /// Consumes the image, returning its pixel buffer.
    #[inline]
    pub fn into_pixels(self) -> Vec<Rgb> {
        self.pixels
    }
}

fn validate_max_value(max_value: u32) -> Result<u8> {
    match u8::try_from(max_value) {
        Ok(0) | Err(_) => Err(Error::InvalidMaxValue(max_value)),
        Ok(v) => Ok(v),
    }
}
