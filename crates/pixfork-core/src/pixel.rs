//! The 8-bit RGB pixel and luma coefficients.
//!
//! Channels are stored as `u8` since every image carries a maximum channel
//! value of at most 255. There is no alpha channel and no color space tag.
//!
//! # Memory Layout
//!
//! [`Rgb`] is `#[repr(C)]`, so a `[Rgb]` slice has the same layout as the
//! `R G B R G B ...` byte stream of the file body.

use std::fmt;

// ============================================================================
// Rec.601 Luma Constants
// ============================================================================

/// Rec.601 luma coefficient for the red channel.
///
/// Used in `Y = 0.299*R + 0.587*G + 0.114*B`.
pub const REC601_LUMA_R: f64 = 0.299;

/// Rec.601 luma coefficient for the green channel.
pub const REC601_LUMA_G: f64 = 0.587;

/// Rec.601 luma coefficient for the blue channel.
pub const REC601_LUMA_B: f64 = 0.114;

/// Rec.601 luma coefficients as an array [R, G, B].
pub const REC601_LUMA: [f64; 3] = [REC601_LUMA_R, REC601_LUMA_G, REC601_LUMA_B];

/// Weighted Rec.601 luma of an RGB triple, unrounded.
///
/// # Example
/// ```
/// use pixfork_core::pixel::luma_rec601;
/// let y = luma_rec601([100.0, 100.0, 100.0]);
/// assert!((y - 100.0).abs() < 1e-9);
/// ```
#[inline]
pub fn luma_rec601(rgb: [f64; 3]) -> f64 {
    rgb[0] * REC601_LUMA_R + rgb[1] * REC601_LUMA_G + rgb[2] * REC601_LUMA_B
}

/// An RGB triple with 8-bit channels.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Rgb {
    /// Black.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Creates a pixel from its three channels.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Creates an achromatic pixel with all channels equal to `v`.
    #[inline]
    pub const fn grey(v: u8) -> Self {
        Self { r: v, g: v, b: v }
    }

    /// Returns the channels as `[r, g, b]`.
    #[inline]
    pub const fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Returns the channels widened to `f64`.
    #[inline]
    pub fn to_f64(self) -> [f64; 3] {
        [self.r as f64, self.g as f64, self.b as f64]
    }

    /// Largest of the three channels.
    #[inline]
    pub fn max_channel(self) -> u8 {
        self.r.max(self.g).max(self.b)
    }

    /// Reflects each channel about `max`: `c' = max - c`.
    ///
    /// Callers guarantee every channel is `<= max`; images enforce this on
    /// construction.
    #[inline]
    pub fn inverted(self, max: u8) -> Self {
        Self {
            r: max - self.r,
            g: max - self.g,
            b: max - self.b,
        }
    }
}

impl From<[u8; 3]> for Rgb {
    #[inline]
    fn from(c: [u8; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

impl From<Rgb> for [u8; 3] {
    #[inline]
    fn from(p: Rgb) -> Self {
        p.to_array()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.r, self.g, self.b)
    }
}
