//! Runs every transform on one input and writes each result.
//!
//! Outputs are named `<stem><suffix>.ppm`:
//!
//! | suffix   | content                         |
//! |----------|---------------------------------|
//! | `neg`    | negate                          |
//! | `negneg` | negate of `neg`                 |
//! | `gs`     | greyscale                       |
//! | `mi`     | mirror, fork-join               |
//! | `mimi`   | mirror of `mi`                  |
//! | `mi2`    | mirror, one task per row        |
//! | `gb`     | Gaussian blur                   |

use crate::AllArgs;
use anyhow::{Context, Result};
use pixfork_core::Image;
use pixfork_ops::{Engine, MirrorStrategy, OpsResult};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

pub fn run(args: AllArgs, engine: &Engine) -> Result<()> {
    trace!(input = %args.input.display(), "all::run");

    let image = super::load_image(&args.input)?;
    let stem = args
        .input
        .file_stem()
        .and_then(|s| s.to_str())
        .context("Input path has no file name")?
        .to_string();
    let dir = match &args.out_dir {
        Some(dir) => dir.clone(),
        None => args.input.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    debug!(threads = engine.threads(), dir = %dir.display(), "Writing all transforms");

    let out = |suffix: &str| -> PathBuf { dir.join(format!("{}{}.ppm", stem, suffix)) };

    let negated = report("Negation", || engine.negate(&image))?;
    super::save_image(&out("neg"), &negated)?;
    super::save_image(&out("negneg"), &engine.negate(&negated)?)?;

    let grey = report("Greyscale", || engine.greyscale(&image))?;
    super::save_image(&out("gs"), &grey)?;

    let mirrored = report("Mirror", || engine.mirror_with(&image, MirrorStrategy::ForkJoin))?;
    super::save_image(&out("mi"), &mirrored)?;
    super::save_image(&out("mimi"), &engine.mirror_with(&mirrored, MirrorStrategy::ForkJoin)?)?;

    let mirrored2 = report("Mirror2", || engine.mirror_with(&image, MirrorStrategy::RowParallel))?;
    super::save_image(&out("mi2"), &mirrored2)?;

    let blurred = report("GB", || engine.gaussian_blur(&image, args.radius, args.sigma))?;
    super::save_image(&out("gb"), &blurred)?;

    Ok(())
}

fn report(label: &str, op: impl FnOnce() -> OpsResult<Image>) -> Result<Image> {
    let (result, elapsed) = super::timed(label, op);
    let image = result.with_context(|| format!("{} failed", label))?;
    println!("{:<10} {:.6}", format!("{}:", label), elapsed.as_secs_f64());
    Ok(image)
}
