//! Single pointwise or mirror transform: load, apply, save.

use crate::TransformArgs;
use anyhow::Result;
use pixfork_core::Image;
use pixfork_ops::OpsResult;
use tracing::trace;

/// Runs the transform `op` named `name` on `args.input`.
pub fn run<F>(args: TransformArgs, name: &str, op: F) -> Result<()>
where
    F: FnOnce(&Image) -> OpsResult<Image>,
{
    trace!(input = %args.input.display(), output = %args.output.display(), name, "transform::run");

    let image = super::load_image(&args.input)?;
    let (result, _) = super::timed(name, || op(&image));
    super::save_image(&args.output, &result?)?;
    Ok(())
}
