//! Blur command
//!
//! Applies a Gaussian blur with clamped edges.

use crate::BlurArgs;
use anyhow::{Context, Result};
use pixfork_ops::Engine;
use tracing::{info, trace};

pub fn run(args: BlurArgs, engine: &Engine) -> Result<()> {
    trace!(input = %args.input.display(), radius = args.radius, sigma = args.sigma, "blur::run");

    let image = super::load_image(&args.input)?;
    info!(
        radius = args.radius,
        sigma = args.sigma,
        w = image.width(),
        h = image.height(),
        "Applying blur"
    );

    let (blurred, _) = super::timed("blur", || engine.gaussian_blur(&image, args.radius, args.sigma));
    let blurred = blurred.with_context(|| format!("Blur failed (radius={}, sigma={})", args.radius, args.sigma))?;

    super::save_image(&args.output, &blurred)
}
