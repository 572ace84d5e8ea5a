//! Square convolution kernels.
//!
//! # Kernels
//!
//! - [`Kernel::gaussian`] - isotropic 2D Gaussian density (blur)
//! - [`Kernel::box_blur`] - simple average
//! - [`Kernel::identity`] - 1x1 `[1.0]`
//! - [`Kernel::new`] - custom weights
//!
//! Weights are stored row-major with rows along y: the weight for x offset
//! `a` and y offset `b` is `weights[b * size + a]`.
//!
//! # Example
//!
//! ```rust
//! use pixflow_ops::kernel::Kernel;
//!
//! let k = Kernel::gaussian(5, 1.0).unwrap();
//! assert_eq!(k.size(), 5);
//! assert_eq!(k.weights().len(), 25);
//! assert!((k.sum() - 1.0).abs() < 0.01);
//! ```

use crate::{OpsError, OpsResult};
use std::f64::consts::PI;
use tracing::trace;

/// Largest accepted kernel side length.
pub const MAX_KERNEL_SIZE: usize = 255;

/// Square convolution kernel with an odd side length.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    size: usize,
    weights: Vec<f64>,
}

/// Validates a side length and returns the weight count.
fn check_size(size: usize) -> OpsResult<usize> {
    if size == 0 {
        return Err(OpsError::InvalidParameter("kernel size must be > 0".into()));
    }
    if size % 2 == 0 {
        return Err(OpsError::InvalidParameter(format!(
            "kernel size must be odd, got {}",
            size
        )));
    }
    match size.checked_mul(size) {
        Some(count) if size <= MAX_KERNEL_SIZE => Ok(count),
        _ => Err(OpsError::InvalidParameter(format!(
            "kernel size must be <= {}, got {}",
            MAX_KERNEL_SIZE, size
        ))),
    }
}

impl Kernel {
    /// Creates a kernel from row-major weights.
    ///
    /// # Errors
    ///
    /// [`OpsError::InvalidParameter`] if `size` is zero, even or above
    /// [`MAX_KERNEL_SIZE`], if `weights.len() != size * size`, or if any
    /// weight is not finite.
    pub fn new(weights: Vec<f64>, size: usize) -> OpsResult<Self> {
        let count = check_size(size)?;
        if weights.len() != count {
            return Err(OpsError::InvalidParameter(format!(
                "kernel data size {} doesn't match {}x{}",
                weights.len(),
                size,
                size
            )));
        }
        if weights.iter().any(|w| !w.is_finite()) {
            return Err(OpsError::InvalidParameter(
                "kernel weights must be finite".into(),
            ));
        }
        Ok(Self { size, weights })
    }

    /// Generates a Gaussian blur kernel.
    ///
    /// Each cell holds the raw 2D Gaussian density
    /// `1 / (2*pi*s^2) * exp(-(dx^2 + dy^2) / (2*s^2))` where `dx`, `dy` are
    /// offsets from the center cell and `s = spread`. The weights are not
    /// normalized afterwards; for kernels spanning a few `spread`s they sum to
    /// approximately 1.0.
    ///
    /// # Arguments
    ///
    /// * `size` - Side length, odd, non-zero and at most [`MAX_KERNEL_SIZE`]
    /// * `spread` - Standard deviation, finite and > 0
    ///
    /// # Errors
    ///
    /// [`OpsError::InvalidParameter`] for a bad `size` or `spread`, or when
    /// `spread` is so small relative to `size` that a weight underflows to
    /// zero or overflows.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pixflow_ops::kernel::Kernel;
    ///
    /// let k = Kernel::gaussian(1, 1.0).unwrap();
    /// assert!((k.weights()[0] - 1.0 / (2.0 * std::f64::consts::PI)).abs() < 1e-12);
    ///
    /// assert!(Kernel::gaussian(3, 0.0).is_err());
    /// ```
    pub fn gaussian(size: usize, spread: f64) -> OpsResult<Self> {
        trace!(size, spread, "Kernel::gaussian");
        let count = check_size(size)?;
        if !(spread.is_finite() && spread > 0.0) {
            return Err(OpsError::InvalidParameter(format!(
                "spread must be finite and > 0, got {}",
                spread
            )));
        }

        let half = (size / 2) as i64;
        let two_s2 = 2.0 * spread * spread;
        let scale = 1.0 / (PI * two_s2);
        if two_s2 == 0.0 || !scale.is_finite() {
            return Err(OpsError::InvalidParameter(format!(
                "spread {} is too small to build a kernel",
                spread
            )));
        }

        let mut weights = Vec::with_capacity(count);
        for y in 0..size as i64 {
            for x in 0..size as i64 {
                let dx = x - half;
                let dy = y - half;
                let d2 = (dx * dx + dy * dy) as f64;
                weights.push(scale * (-d2 / two_s2).exp());
            }
        }

        // Corner taps vanish first when spread is tiny next to size.
        if weights.iter().any(|&w| !(w.is_finite() && w > 0.0)) {
            return Err(OpsError::InvalidParameter(format!(
                "spread {} is too small for kernel size {}",
                spread, size
            )));
        }

        Ok(Self { size, weights })
    }

    /// Creates a box blur kernel (every weight `1 / size^2`).
    ///
    /// ```rust
    /// use pixflow_ops::kernel::Kernel;
    ///
    /// let k = Kernel::box_blur(3).unwrap();
    /// assert!(k.weights().iter().all(|&w| (w - 1.0 / 9.0).abs() < 1e-12));
    /// ```
    pub fn box_blur(size: usize) -> OpsResult<Self> {
        let count = check_size(size)?;
        Ok(Self {
            size,
            weights: vec![1.0 / count as f64; count],
        })
    }

    /// The 1x1 kernel `[1.0]`; convolving with it leaves a buffer unchanged.
    pub fn identity() -> Self {
        Self {
            size: 1,
            weights: vec![1.0],
        }
    }

    /// Side length.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Offset of the center cell (`size / 2`).
    #[inline]
    pub fn radius(&self) -> usize {
        self.size / 2
    }

    /// Row-major weights.
    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Weight for x offset `a` and y offset `b`, both in `0..size`.
    #[inline]
    pub fn weight(&self, a: usize, b: usize) -> f64 {
        self.weights[b * self.size + a]
    }

    /// Sum of all weights.
    pub fn sum(&self) -> f64 {
        self.weights.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gaussian_shape_and_positivity() {
        for size in [1usize, 3, 5, 9, 23] {
            for spread in [0.5, 1.0, 3.0, 10.0] {
                let k = Kernel::gaussian(size, spread).unwrap();
                assert_eq!(k.weights().len(), size * size);
                assert!(k.weights().iter().all(|&w| w > 0.0));
            }
        }
    }

    #[test]
    fn test_gaussian_single_cell() {
        let k = Kernel::gaussian(1, 2.0).unwrap();
        assert_relative_eq!(k.weights()[0], 1.0 / (2.0 * PI * 4.0), epsilon = 1e-15);
    }

    #[test]
    fn test_gaussian_not_normalized() {
        // A tight kernel truncates the density, so the sum stays below 1.
        let k = Kernel::gaussian(3, 3.0).unwrap();
        assert!(k.sum() < 0.2);

        // The legacy defaults cover +-3.7 sigma and sum to nearly 1.
        let k = Kernel::gaussian(23, 3.0).unwrap();
        assert_relative_eq!(k.sum(), 1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_gaussian_symmetry() {
        let k = Kernel::gaussian(5, 1.5).unwrap();
        let center = k.weight(2, 2);
        for b in 0..5 {
            for a in 0..5 {
                assert!(k.weight(a, b) <= center);
                assert_relative_eq!(k.weight(a, b), k.weight(4 - a, b));
                assert_relative_eq!(k.weight(a, b), k.weight(b, a));
            }
        }
    }

    #[test]
    fn test_gaussian_invalid() {
        assert!(matches!(Kernel::gaussian(0, 1.0), Err(OpsError::InvalidParameter(_))));
        assert!(matches!(Kernel::gaussian(4, 1.0), Err(OpsError::InvalidParameter(_))));
        assert!(matches!(Kernel::gaussian(3, 0.0), Err(OpsError::InvalidParameter(_))));
        assert!(matches!(Kernel::gaussian(3, -1.0), Err(OpsError::InvalidParameter(_))));
        assert!(matches!(Kernel::gaussian(3, f64::NAN), Err(OpsError::InvalidParameter(_))));
    }

    #[test]
    fn test_size_limit() {
        assert!(Kernel::gaussian(MAX_KERNEL_SIZE, 40.0).is_ok());
        for size in [MAX_KERNEL_SIZE + 2, 1_000_001, usize::MAX] {
            assert!(matches!(Kernel::gaussian(size, 3.0), Err(OpsError::InvalidParameter(_))));
            assert!(matches!(Kernel::box_blur(size), Err(OpsError::InvalidParameter(_))));
        }
        assert!(Kernel::new(vec![1.0; 9], 1_000_001).is_err());
    }

    #[test]
    fn test_tiny_spread_rejected() {
        // 2 * spread^2 underflows to zero
        assert!(matches!(Kernel::gaussian(3, 1e-200), Err(OpsError::InvalidParameter(_))));
        assert!(matches!(Kernel::gaussian(1, 1e-200), Err(OpsError::InvalidParameter(_))));
        // Finite scale, but off-center taps underflow to zero
        assert!(matches!(Kernel::gaussian(3, 1e-150), Err(OpsError::InvalidParameter(_))));
        assert!(matches!(Kernel::gaussian(23, 0.01), Err(OpsError::InvalidParameter(_))));

        // Small but usable spreads still work
        let k = Kernel::gaussian(3, 0.1).unwrap();
        assert!(k.weights().iter().all(|&w| w.is_finite() && w > 0.0));
    }

    #[test]
    fn test_kernel_new() {
        let k = Kernel::new(vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0], 3).unwrap();
        // Row 1, column 0: x offset 0, y offset 1
        assert_eq!(k.weight(0, 1), 1.0);
        assert_eq!(k.radius(), 1);

        assert!(Kernel::new(vec![1.0; 8], 3).is_err());
        assert!(Kernel::new(vec![1.0; 4], 2).is_err());
        assert!(Kernel::new(vec![f64::INFINITY], 1).is_err());
    }

    #[test]
    fn test_box_and_identity() {
        let k = Kernel::box_blur(3).unwrap();
        assert_relative_eq!(k.sum(), 1.0, epsilon = 1e-12);
        assert!(Kernel::box_blur(2).is_err());

        let id = Kernel::identity();
        assert_eq!(id.size(), 1);
        assert_eq!(id.weights(), &[1.0]);
    }
}
