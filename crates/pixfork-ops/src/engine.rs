//! Transform engine bound to a worker pool.
//!
//! # Configuration
//!
//! Use [`EngineBuilder`] to size the pool and tune the sequential cutoffs:
//!
//! ```rust
//! use pixfork_ops::{Engine, MirrorStrategy};
//!
//! let engine = Engine::builder()
//!     .threads(2)
//!     .blur_cutoff(2_000)
//!     .mirror_strategy(MirrorStrategy::RowParallel)
//!     .build()
//!     .unwrap();
//! assert_eq!(engine.threads(), 2);
//! ```
//!
//! Output never depends on the pool size: pointwise maps are independent
//! per pixel and fork-join splits are derived from the image shape and
//! cutoff alone.

use crate::spatial::{DEFAULT_BLUR_CUTOFF, DEFAULT_MIRROR_CUTOFF};
use crate::{pointwise, spatial, OpsError, OpsResult};
use pixfork_core::Image;
use tracing::debug;

/// How [`Engine::mirror`] distributes rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MirrorStrategy {
    /// Recursive row-range splitting down to the mirror cutoff.
    #[default]
    ForkJoin,
    /// One parallel task per row.
    RowParallel,
}

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Worker threads for a dedicated pool (0 = use the global rayon pool).
    pub threads: usize,
    /// Pixels per task below which mirror runs sequentially.
    pub mirror_cutoff: usize,
    /// Pixels per task below which blur runs sequentially.
    pub blur_cutoff: usize,
    /// Mirror strategy.
    pub mirror_strategy: MirrorStrategy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            mirror_cutoff: DEFAULT_MIRROR_CUTOFF,
            blur_cutoff: DEFAULT_BLUR_CUTOFF,
            mirror_strategy: MirrorStrategy::default(),
        }
    }
}

/// Builder for [`Engine`].
#[derive(Debug, Clone, Default)]
pub struct EngineBuilder {
    config: EngineConfig,
}

impl EngineBuilder {
    /// Create new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of worker threads (0 = global pool).
    pub fn threads(mut self, threads: usize) -> Self {
        self.config.threads = threads;
        self
    }

    /// Mirror sequential cutoff in pixels, at least 1.
    pub fn mirror_cutoff(mut self, pixels: usize) -> Self {
        self.config.mirror_cutoff = pixels.max(1);
        self
    }

    /// Blur sequential cutoff in pixels, at least 1.
    pub fn blur_cutoff(mut self, pixels: usize) -> Self {
        self.config.blur_cutoff = pixels.max(1);
        self
    }

    /// Mirror strategy.
    pub fn mirror_strategy(mut self, strategy: MirrorStrategy) -> Self {
        self.config.mirror_strategy = strategy;
        self
    }

    /// Build the engine, creating its pool if `threads > 0`.
    pub fn build(self) -> OpsResult<Engine> {
        Engine::with_config(self.config)
    }
}

/// Runs transforms on a configured worker pool.
#[derive(Debug)]
pub struct Engine {
    pool: Option<rayon::ThreadPool>,
    config: EngineConfig,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            pool: None,
            config: EngineConfig::default(),
        }
    }
}

impl Engine {
    /// Engine on the global pool with default cutoffs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a builder.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Create with a custom config.
    pub fn with_config(mut config: EngineConfig) -> OpsResult<Self> {
        config.mirror_cutoff = config.mirror_cutoff.max(1);
        config.blur_cutoff = config.blur_cutoff.max(1);

        let pool = if config.threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(config.threads)
                .thread_name(|i| format!("pixfork-{}", i))
                .build()
                .map_err(|e| OpsError::ThreadPool(e.to_string()))?;
            Some(pool)
        } else {
            None
        };
        debug!(
            threads = config.threads,
            mirror_cutoff = config.mirror_cutoff,
            blur_cutoff = config.blur_cutoff,
            strategy = ?config.mirror_strategy,
            "Engine configured"
        );
        Ok(Self { pool, config })
    }

    /// Active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of worker threads transforms run on.
    pub fn threads(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    /// Inverts every channel.
    pub fn negate(&self, image: &Image) -> OpsResult<Image> {
        self.run(|| pointwise::negate(image))
    }

    /// Converts to Rec.601 luma.
    pub fn greyscale(&self, image: &Image) -> OpsResult<Image> {
        self.run(|| pointwise::greyscale(image))
    }

    /// Mirrors left to right with the configured strategy.
    pub fn mirror(&self, image: &Image) -> OpsResult<Image> {
        self.mirror_with(image, self.config.mirror_strategy)
    }

    /// Mirrors left to right with an explicit strategy.
    pub fn mirror_with(&self, image: &Image, strategy: MirrorStrategy) -> OpsResult<Image> {
        debug!(?strategy, "mirror");
        match strategy {
            MirrorStrategy::ForkJoin => {
                self.run(|| spatial::mirror_with_cutoff(image, self.config.mirror_cutoff))
            }
            MirrorStrategy::RowParallel => self.run(|| spatial::mirror_rows(image)),
        }
    }

    /// Gaussian blur with the configured cutoff.
    pub fn gaussian_blur(&self, image: &Image, radius: u32, sigma: f64) -> OpsResult<Image> {
        self.run(|| {
            spatial::gaussian_blur_with_cutoff(image, radius, sigma, self.config.blur_cutoff)
        })
    }

    fn run<R, F>(&self, op: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }
}
