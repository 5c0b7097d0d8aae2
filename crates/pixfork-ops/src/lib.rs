//! # pixfork-ops
//!
//! Parallel image transforms for pixfork.
//!
//! # Modules
//!
//! - [`pointwise`] - Negate and greyscale, mapped pixel by pixel
//! - [`spatial`] - Horizontal mirror and Gaussian blur
//! - [`kernel`] - Normalized Gaussian kernels
//! - [`forkjoin`] - Row-range fork-join runtime with a sequential cutoff
//! - [`engine`] - Transforms bound to a sized worker pool
//!
//! Every transform reads its source without mutating it and returns a new
//! image of the same dimensions and `max_value`. Output is identical for
//! any worker count.
//!
//! # Example
//!
//! ```rust
//! use pixfork_core::{Image, Rgb};
//! use pixfork_ops::{gaussian_blur, mirror, negate};
//!
//! let img = Image::from_pixels(2, 1, 255, vec![Rgb::new(10, 20, 30), Rgb::new(200, 150, 100)]).unwrap();
//! assert_eq!(negate(&img).unwrap().pixel(0, 0), Rgb::new(245, 235, 225));
//! assert_eq!(mirror(&img).unwrap().pixel(0, 0), Rgb::new(200, 150, 100));
//! let _soft = gaussian_blur(&img, 60, 2.0).unwrap();
//! ```
//!
//! ## Pool size
//!
//! ```rust,ignore
//! use pixfork_ops::Engine;
//!
//! let engine = Engine::builder().threads(4).build()?;
//! let soft = engine.gaussian_blur(&image, 60, 2.0)?;
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod engine;
pub mod forkjoin;
pub mod kernel;
pub mod pointwise;
pub mod spatial;

pub use engine::{Engine, EngineBuilder, EngineConfig, MirrorStrategy};
pub use error::{OpsError, OpsResult};
pub use forkjoin::{fork_join_rows, plan_rows, RowRange};
pub use kernel::Kernel;
pub use pointwise::{greyscale, map_pixels, negate};
pub use spatial::{gaussian_blur, mirror, mirror_rows};
