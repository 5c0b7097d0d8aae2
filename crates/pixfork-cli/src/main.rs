//! pixfork - parallel PPM image transforms
//!
//! Loads a binary PPM, runs one transform on a sized worker pool and
//! writes the result.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pixfork_ops::{Engine, MirrorStrategy};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "pixfork")]
#[command(author, version, about = "Parallel PPM image transforms")]
#[command(long_about = "
Applies pointwise and fork-join spatial transforms to binary PPM (P6) images.
Output is identical for any number of worker threads.

Examples:
  pixfork info florence.ppm                       # Show image info
  pixfork negate florence.ppm -o neg.ppm
  pixfork greyscale florence.ppm -o gs.ppm
  pixfork mirror florence.ppm -o mi.ppm --mirror-strategy rows
  pixfork blur florence.ppm -o gb.ppm -r 60 -s 2
  pixfork -j 4 -v all florence.ppm -d out/        # Every transform, timed
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,

    /// Pixels per task below which mirror runs sequentially
    #[arg(long, global = true, default_value_t = pixfork_ops::spatial::DEFAULT_MIRROR_CUTOFF)]
    mirror_cutoff: usize,

    /// Pixels per task below which blur runs sequentially
    #[arg(long, global = true, default_value_t = pixfork_ops::spatial::DEFAULT_BLUR_CUTOFF)]
    blur_cutoff: usize,

    /// Row distribution used by mirror
    #[arg(long, global = true, value_enum, default_value = "fork-join")]
    mirror_strategy: StrategyArg,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyArg {
    /// Recursive row-range splitting
    ForkJoin,
    /// One task per row
    Rows,
}

impl From<StrategyArg> for MirrorStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::ForkJoin => MirrorStrategy::ForkJoin,
            StrategyArg::Rows => MirrorStrategy::RowParallel,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Display image information
    #[command(visible_alias = "i")]
    Info(InfoArgs),

    /// Invert every channel
    Negate(TransformArgs),

    /// Convert to Rec.601 luma
    #[command(visible_alias = "gs")]
    Greyscale(TransformArgs),

    /// Mirror left to right
    #[command(visible_alias = "mi")]
    Mirror(TransformArgs),

    /// Apply Gaussian blur
    #[command(visible_alias = "gb")]
    Blur(BlurArgs),

    /// Run every transform, writing one file per result
    All(AllArgs),
}

#[derive(Args)]
struct InfoArgs {
    /// Input image(s)
    #[arg(required = true)]
    input: Vec<PathBuf>,
}

#[derive(Args)]
struct TransformArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Args)]
struct BlurArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Kernel radius in pixels (kernel side is 2*radius+1)
    #[arg(short, long, default_value = "60")]
    radius: u32,

    /// Gaussian standard deviation
    #[arg(short, long, default_value = "2.0")]
    sigma: f64,
}

#[derive(Args)]
struct AllArgs {
    /// Input image
    input: PathBuf,

    /// Output directory (default: next to the input)
    #[arg(short = 'd', long)]
    out_dir: Option<PathBuf>,

    /// Blur radius
    #[arg(short, long, default_value = "60")]
    radius: u32,

    /// Blur sigma
    #[arg(short, long, default_value = "2.0")]
    sigma: f64,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let engine = Engine::builder()
        .threads(cli.threads)
        .mirror_cutoff(cli.mirror_cutoff)
        .blur_cutoff(cli.blur_cutoff)
        .mirror_strategy(cli.mirror_strategy.into())
        .build()
        .context("Failed to configure thread pool")?;

    match cli.command {
        Commands::Info(args) => commands::info::run(args, cli.verbose),
        Commands::Negate(args) => {
            commands::transform::run(args, "negate", |img| engine.negate(img))
        }
        Commands::Greyscale(args) => {
            commands::transform::run(args, "greyscale", |img| engine.greyscale(img))
        }
        Commands::Mirror(args) => {
            commands::transform::run(args, "mirror", |img| engine.mirror(img))
        }
        Commands::Blur(args) => commands::blur::run(args, &engine),
        Commands::All(args) => commands::all::run(args, &engine),
    }
}
