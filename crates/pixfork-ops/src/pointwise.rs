//! Per-pixel transforms: negate and greyscale.
//!
//! Each output pixel depends only on the input pixel at the same index, so
//! the buffer is mapped with a rayon parallel iterator in whatever chunks
//! the pool chooses.

use crate::OpsResult;
use pixfork_core::{alloc_pixels, luma_rec601, Image, Rgb};
use rayon::prelude::*;
use tracing::trace;

/// Maps every pixel through `f` into a freshly allocated image.
///
/// `f` must keep channels within the image's `max_value`.
pub fn map_pixels<F>(image: &Image, f: F) -> OpsResult<Image>
where
    F: Fn(Rgb) -> Rgb + Sync + Send,
{
    let mut out = alloc_pixels(image.len())?;
    image.par_pixels().map(|&p| f(p)).collect_into_vec(&mut out);
    Ok(image.with_pixels(out)?)
}

/// Inverts each channel: `c' = max_value - c`.
///
/// # Example
///
/// ```rust
/// use pixfork_core::{Image, Rgb};
/// use pixfork_ops::pointwise::negate;
///
/// let img = Image::filled(1, 1, 255, Rgb::new(10, 20, 30)).unwrap();
/// assert_eq!(negate(&img).unwrap().pixel(0, 0), Rgb::new(245, 235, 225));
/// ```
pub fn negate(image: &Image) -> OpsResult<Image> {
    trace!(width = image.width(), height = image.height(), "negate");
    let max = image.max_value();
    map_pixels(image, |p| p.inverted(max))
}

/// Replaces each pixel by its Rec.601 luma in all three channels.
pub fn greyscale(image: &Image) -> OpsResult<Image> {
    trace!(width = image.width(), height = image.height(), "greyscale");
    let max = image.max_value();
    map_pixels(image, |p| Rgb::grey(grey_level(p, max)))
}

/// `round(0.299*R + 0.587*G + 0.114*B)`, half away from zero, capped at `max`.
#[inline]
pub fn grey_level(p: Rgb, max: u8) -> u8 {
    luma_rec601(p.to_f64()).round().min(max as f64) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> Image {
        Image::from_pixels(2, 1, 255, vec![Rgb::new(10, 20, 30), Rgb::new(200, 150, 100)]).unwrap()
    }

    #[test]
    fn test_negate_pair() {
        let out = negate(&pair()).unwrap();
        assert_eq!(out.pixels(), &[Rgb::new(245, 235, 225), Rgb::new(55, 105, 155)]);
        assert_eq!(out.max_value(), 255);
    }

    #[test]
    fn test_negate_is_involution() {
        let img = Image::from_fn(13, 9, 180, |x, y| Rgb::new((x * 13) as u8, (y * 20) as u8, 180)).unwrap();
        let twice = negate(&negate(&img).unwrap()).unwrap();
        assert_eq!(twice, img);
    }

    #[test]
    fn test_negate_respects_max_value() {
        let img = Image::from_pixels(1, 1, 100, vec![Rgb::new(0, 40, 100)]).unwrap();
        assert_eq!(negate(&img).unwrap().pixel(0, 0), Rgb::new(100, 60, 0));
    }

    #[test]
    fn test_negate_leaves_input_untouched() {
        let img = pair();
        let before = img.clone();
        let _ = negate(&img).unwrap();
        assert_eq!(img, before);
    }

    #[test]
    fn test_greyscale_achromatic() {
        let img = Image::filled(3, 3, 255, Rgb::grey(100)).unwrap();
        let out = greyscale(&img).unwrap();
        assert!(out.pixels().iter().all(|&p| p == Rgb::grey(100)));
    }

    #[test]
    fn test_greyscale_values() {
        // 0.299*10 + 0.587*20 + 0.114*30 = 18.15
        // 0.299*200 + 0.587*150 + 0.114*100 = 159.25
        let out = greyscale(&pair()).unwrap();
        assert_eq!(out.pixels(), &[Rgb::grey(18), Rgb::grey(159)]);
    }

    #[test]
    fn test_grey_level_rounding() {
        // 0.299*255 = 76.245
        assert_eq!(grey_level(Rgb::new(255, 0, 0), 255), 76);
        // 0.587*255 = 149.685
        assert_eq!(grey_level(Rgb::new(0, 255, 0), 255), 150);
        assert_eq!(grey_level(Rgb::grey(255), 255), 255);
        assert_eq!(grey_level(Rgb::grey(7), 7), 7);
    }
}
