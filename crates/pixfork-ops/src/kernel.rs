//! Gaussian convolution kernels.
//!
//! # Example
//!
//! ```rust
//! use pixfork_ops::kernel::Kernel;
//!
//! let k = Kernel::gaussian(2, 1.5).unwrap();
//! assert_eq!(k.size(), 5);
//! assert!((k.sum() - 1.0).abs() < 1e-9);
//! ```

use crate::{OpsError, OpsResult};
use tracing::trace;

/// Square convolution kernel of side `2 * radius + 1`.
///
/// Weights are stored row-major (`ky * size + kx`), are non-negative and
/// sum to 1. A kernel is read-only once built and is shared by reference
/// across every task of a blur.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    data: Vec<f64>,
    size: usize,
    radius: u32,
}

impl Kernel {
    /// Builds a normalized 2D Gaussian kernel.
    ///
    /// The 1D sample is `g(i) = exp(-((i - radius) / sigma)^2 / 2)` for
    /// `i in 0..2*radius+1`; the 2D kernel is the outer product `g(i) * g(j)`
    /// divided by its total sum.
    ///
    /// # Errors
    ///
    /// [`OpsError::InvalidParameter`] if `sigma` is not a positive finite
    /// number or the kernel side overflows `usize`, and
    /// [`OpsError::AllocationFailed`] if the kernel would not fit in memory.
    /// Both are reported before any sample is computed.
    pub fn gaussian(radius: u32, sigma: f64) -> OpsResult<Self> {
        trace!(radius, sigma, "Kernel::gaussian");

        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(OpsError::InvalidParameter(format!(
                "sigma must be positive and finite, got {}",
                sigma
            )));
        }
        let size = (radius as usize)
            .checked_mul(2)
            .and_then(|v| v.checked_add(1))
            .ok_or_else(|| OpsError::InvalidParameter(format!("radius {} too large", radius)))?;
        let area = size
            .checked_mul(size)
            .ok_or_else(|| OpsError::InvalidParameter(format!("radius {} too large", radius)))?;

        // Reserve the full kernel before computing any sample.
        let mut data: Vec<f64> = Vec::new();
        data.try_reserve_exact(area)
            .map_err(|_| OpsError::AllocationFailed { requested: area })?;
        let mut hkernel: Vec<f64> = Vec::new();
        hkernel
            .try_reserve_exact(size)
            .map_err(|_| OpsError::AllocationFailed { requested: size })?;

        let center = radius as f64;
        hkernel.extend((0..size).map(|i| {
            let t = (i as f64 - center) / sigma;
            (-(t * t) / 2.0).exp()
        }));

        let mut sum = 0.0f64;
        for gy in &hkernel {
            for gx in &hkernel {
                let w = gy * gx;
                sum += w;
                data.push(w);
            }
        }

        // Normalize
        for w in &mut data {
            *w /= sum;
        }

        Ok(Self { data, size, radius })
    }

    /// Half-size of the kernel.
    #[inline]
    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Side length, `2 * radius + 1`.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Weight at column `kx`, row `ky`.
    #[inline]
    pub fn weight(&self, kx: usize, ky: usize) -> f64 {
        self.data[ky * self.size + kx]
    }

    /// Row `ky` of the kernel.
    #[inline]
    pub fn row(&self, ky: usize) -> &[f64] {
        &self.data[ky * self.size..(ky + 1) * self.size]
    }

    /// All weights, row-major.
    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.data
    }

    /// Sum of all weights.
    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_kernel_sums_to_one() {
        for &(radius, sigma) in &[(0, 1.0), (1, 0.5), (3, 1.0), (5, 2.0), (12, 7.5), (60, 2.0)] {
            let k = Kernel::gaussian(radius, sigma).unwrap();
            assert_eq!(k.size(), 2 * radius as usize + 1);
            assert_abs_diff_eq!(k.sum(), 1.0, epsilon = 1e-9);
            assert!(k.weights().iter().all(|&w| w >= 0.0));
        }
    }

    #[test]
    fn test_kernel_symmetric_under_rotation() {
        let k = Kernel::gaussian(4, 1.3).unwrap();
        let n = k.size();
        for ky in 0..n {
            for kx in 0..n {
                assert_relative_eq!(k.weight(kx, ky), k.weight(n - 1 - kx, n - 1 - ky));
                assert_relative_eq!(k.weight(kx, ky), k.weight(ky, kx));
            }
        }
    }

    #[test]
    fn test_kernel_peak_at_center() {
        let k = Kernel::gaussian(3, 1.0).unwrap();
        let center = k.weight(3, 3);
        assert!(k.weights().iter().all(|&w| w <= center));
        assert_eq!(k.row(3)[3], center);
    }

    #[test]
    fn test_radius_zero_is_identity() {
        let k = Kernel::gaussian(0, 0.1).unwrap();
        assert_eq!(k.weights(), &[1.0]);
    }

    #[test]
    fn test_known_weights() {
        // g = [e^-0.5, 1, e^-0.5]
        let k = Kernel::gaussian(1, 1.0).unwrap();
        let e = (-0.5f64).exp();
        let s = (1.0 + 2.0 * e).powi(2);
        assert_relative_eq!(k.weight(1, 1), 1.0 / s, epsilon = 1e-12);
        assert_relative_eq!(k.weight(0, 1), e / s, epsilon = 1e-12);
        assert_relative_eq!(k.weight(0, 0), e * e / s, epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_sigma() {
        for sigma in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                Kernel::gaussian(2, sigma),
                Err(OpsError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn test_huge_radius_rejected() {
        assert!(Kernel::gaussian(u32::MAX, 1.0).is_err());
    }

    #[test]
    fn test_unallocatable_radius_fails_before_sampling() {
        // Side 2^31+1 fits in usize but the area does not fit in memory.
        assert!(matches!(
            Kernel::gaussian(1 << 30, 2.0),
            Err(OpsError::AllocationFailed { .. }) | Err(OpsError::InvalidParameter(_))
        ));
    }
}
