//! Spatial transforms: horizontal mirror and Gaussian blur.
//!
//! Both run on the row-range fork-join runtime in [`crate::forkjoin`].
//! Mirror permutes pixels within a row and works in place on a copy of the
//! source. Blur reads a neighbourhood across rows, so it always writes into
//! a separate destination while the source stays read-only.
//!
//! # Example
//!
//! ```rust
//! use pixfork_core::{Image, Rgb};
//! use pixfork_ops::spatial::{gaussian_blur, mirror};
//!
//! let img = Image::from_fn(8, 8, 255, |x, y| Rgb::new(x as u8 * 30, y as u8 * 30, 0)).unwrap();
//! let flipped = mirror(&img).unwrap();
//! assert_eq!(flipped.pixel(0, 0), img.pixel(7, 0));
//!
//! let soft = gaussian_blur(&img, 2, 1.0).unwrap();
//! assert_eq!(soft.dimensions(), img.dimensions());
//! ```

use crate::forkjoin::{debug_plan, fork_join_rows, RowRange};
use crate::kernel::Kernel;
use crate::OpsResult;
use pixfork_core::{alloc_pixels, pixel_index, Image, Rgb};
use rayon::prelude::*;
use tracing::{debug, trace};

/// Pixels per task below which mirror stops splitting.
pub const DEFAULT_MIRROR_CUTOFF: usize = 25_000;

/// Pixels per task below which blur stops splitting.
///
/// Lower than the mirror cutoff since each blurred pixel costs a whole
/// kernel of samples.
pub const DEFAULT_BLUR_CUTOFF: usize = 5_000;

/// Mirrors the image left to right with the fork-join strategy.
pub fn mirror(image: &Image) -> OpsResult<Image> {
    mirror_with_cutoff(image, DEFAULT_MIRROR_CUTOFF)
}

/// Mirrors the image left to right, splitting row ranges above `cutoff`
/// pixels.
///
/// Copies the source once, then each leaf reverses its own rows in place.
pub fn mirror_with_cutoff(image: &Image, cutoff: usize) -> OpsResult<Image> {
    trace!(width = image.width(), height = image.height(), cutoff, "mirror");
    let width = image.width() as usize;
    let mut dest = copy_pixels(image)?;
    debug_plan("mirror", image.height() as usize, width, cutoff);

    let mirror_leaf = |_: RowRange, rows: &mut [Rgb]| -> OpsResult<()> {
        rows.chunks_exact_mut(width).for_each(mirror_row);
        Ok(())
    };
    fork_join_rows(&mut dest, width, RowRange::new(0, image.height() as usize), cutoff, &mirror_leaf)?;

    Ok(image.with_pixels(dest)?)
}

/// Mirrors the image left to right with one parallel task per row.
///
/// Produces the same output as [`mirror`].
pub fn mirror_rows(image: &Image) -> OpsResult<Image> {
    trace!(width = image.width(), height = image.height(), "mirror_rows");
    let width = image.width() as usize;
    let mut dest = copy_pixels(image)?;
    dest.par_chunks_mut(width).for_each(mirror_row);
    Ok(image.with_pixels(dest)?)
}

/// Swaps column `i` with column `width - 1 - i` for `i < width / 2`.
///
/// The middle column of an odd-width row stays in place.
#[inline]
pub fn mirror_row(row: &mut [Rgb]) {
    row.reverse();
}

/// Blurs the image with a `(2*radius+1)^2` Gaussian kernel.
pub fn gaussian_blur(image: &Image, radius: u32, sigma: f64) -> OpsResult<Image> {
    gaussian_blur_with_cutoff(image, radius, sigma, DEFAULT_BLUR_CUTOFF)
}

/// Blurs the image, splitting row ranges above `cutoff` pixels.
///
/// Samples outside the image are clamped to the nearest edge pixel. Each
/// channel is accumulated as an `f64` weighted sum and rounded half away
/// from zero.
///
/// # Errors
///
/// Returns [`crate::OpsError::InvalidParameter`] for a non-positive or
/// non-finite `sigma` before any pixel buffer is allocated.
pub fn gaussian_blur_with_cutoff(
    image: &Image,
    radius: u32,
    sigma: f64,
    cutoff: usize,
) -> OpsResult<Image> {
    trace!(width = image.width(), height = image.height(), radius, sigma, cutoff, "gaussian_blur");
    let kernel = Kernel::gaussian(radius, sigma)?;
    debug!(size = kernel.size(), "Built blur kernel");

    let width = image.width() as usize;
    let height = image.height() as usize;
    let max = image.max_value();
    let src = image.pixels();

    let mut dest = alloc_pixels(image.len())?;
    dest.resize(image.len(), Rgb::BLACK);
    debug_plan("gaussian_blur", height, width, cutoff);

    let blur_rows = |rows: RowRange, out: &mut [Rgb]| -> OpsResult<()> {
        for (y, out_row) in rows.iter().zip(out.chunks_exact_mut(width)) {
            for (x, px) in out_row.iter_mut().enumerate() {
                *px = blur_pixel(src, width, height, &kernel, x, y, max);
            }
        }
        Ok(())
    };
    fork_join_rows(&mut dest, width, RowRange::new(0, height), cutoff, &blur_rows)?;

    Ok(image.with_pixels(dest)?)
}

/// Convolves `kernel` centred on `(x, y)` with edge clamping.
pub(crate) fn blur_pixel(
    src: &[Rgb],
    width: usize,
    height: usize,
    kernel: &Kernel,
    x: usize,
    y: usize,
    max: u8,
) -> Rgb {
    let r = kernel.radius() as isize;
    let mut acc = [0.0f64; 3];

    for ky in 0..kernel.size() {
        let sy = clamp_coord(y as isize + ky as isize - r, height);
        let weights = kernel.row(ky);
        for (kx, &w) in weights.iter().enumerate() {
            let sx = clamp_coord(x as isize + kx as isize - r, width);
            let p = src[pixel_index(width, sx, sy)];
            acc[0] += w * p.r as f64;
            acc[1] += w * p.g as f64;
            acc[2] += w * p.b as f64;
        }
    }

    Rgb::new(
        round_channel(acc[0], max),
        round_channel(acc[1], max),
        round_channel(acc[2], max),
    )
}

/// `clamp(coord, 0, dim - 1)`.
#[inline]
fn clamp_coord(coord: isize, dim: usize) -> usize {
    coord.clamp(0, dim as isize - 1) as usize
}

#[inline]
fn round_channel(v: f64, max: u8) -> u8 {
    v.round().clamp(0.0, max as f64) as u8
}

fn copy_pixels(image: &Image) -> OpsResult<Vec<Rgb>> {
    let mut dest = alloc_pixels(image.len())?;
    dest.extend_from_slice(image.pixels());
    Ok(dest)
}
