//! Kernel convolution (blur).
//!
//! [`convolve`] writes into a fresh buffer and only reads the source, so
//! every output pixel sees the unblurred neighborhood. Edges replicate the
//! nearest valid pixel: source coordinates are clamped to the buffer.
//!
//! # Accumulation
//!
//! Each of R, G, B and A is accumulated independently as
//! `sum(channel * weight)`. How that sum becomes an 8-bit value is selected
//! with [`Accumulate`]:
//!
//! - [`Accumulate::Saturate`] - sum in f64, round, clamp to [0, 255]
//! - [`Accumulate::Wrap`] - every term truncated to u8, summed with 8-bit
//!   wraparound (legacy behavior)
//!
//! # Example
//!
//! ```rust
//! use pixflow_core::{PixelBuffer, Rgba8};
//! use pixflow_ops::filter::{convolve, Accumulate};
//! use pixflow_ops::kernel::Kernel;
//!
//! let src = PixelBuffer::filled(16, 16, Rgba8::rgb(90, 120, 30)).unwrap();
//! let kernel = Kernel::box_blur(3).unwrap();
//! let blurred = convolve(&src, &kernel, Accumulate::Saturate).unwrap();
//! assert_eq!(blurred, src);
//! ```

use crate::kernel::Kernel;
use crate::OpsResult;
use pixflow_core::{PixelBuffer, Rgba8};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// How weighted channel sums are reduced to 8 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accumulate {
    /// Sum in f64, round to nearest, clamp to [0, 255].
    #[default]
    Saturate,
    /// Truncate each term to u8 and add with 8-bit wraparound.
    Wrap,
}

/// Convolves `src` with `kernel`, returning a new buffer of the same size.
///
/// Runs on the calling thread. See [`crate::parallel::convolve`] for the
/// row-parallel variant, which produces identical output.
///
/// # Errors
///
/// [`crate::OpsError::DimensionMismatch`] if the output shape disagrees
/// with the source (an invariant check).
pub fn convolve(src: &PixelBuffer, kernel: &Kernel, mode: Accumulate) -> OpsResult<PixelBuffer> {
    trace!(
        width = src.width(),
        height = src.height(),
        kernel = kernel.size(),
        ?mode,
        "convolve"
    );

    let width = src.width() as usize;
    let mut out = vec![Rgba8::TRANSPARENT; src.pixel_count()];
    for (y, row) in out.chunks_exact_mut(width).enumerate() {
        convolve_row(src, kernel, mode, y, row);
    }

    finish(src, out)
}

/// Wraps convolution output in a buffer and checks its shape.
pub(crate) fn finish(src: &PixelBuffer, out: Vec<Rgba8>) -> OpsResult<PixelBuffer> {
    let dst = PixelBuffer::from_samples(src.width(), src.height(), out)?;
    src.ensure_same_dimensions(&dst)?;
    Ok(dst)
}

/// Computes output row `y` into `row` (length = width).
pub(crate) fn convolve_row(
    src: &PixelBuffer,
    kernel: &Kernel,
    mode: Accumulate,
    y: usize,
    row: &mut [Rgba8],
) {
    let width = src.width() as isize;
    let height = src.height() as isize;
    let size = kernel.size();
    let offset = kernel.radius() as isize;
    let samples = src.samples();

    for (x, out) in row.iter_mut().enumerate() {
        let mut sums = [0.0f64; 4];
        let mut wrapped = [0u8; 4];

        for b in 0..size {
            // Source coordinates with edge clamping
            let sy = (y as isize + b as isize - offset).clamp(0, height - 1);
            let line = (sy * width) as usize;
            for a in 0..size {
                let sx = (x as isize + a as isize - offset).clamp(0, width - 1);
                let px = samples[line + sx as usize].to_array();
                let w = kernel.weight(a, b);

                match mode {
                    Accumulate::Saturate => {
                        for c in 0..4 {
                            sums[c] += px[c] as f64 * w;
                        }
                    }
                    Accumulate::Wrap => {
                        for c in 0..4 {
                            wrapped[c] = wrapped[c].wrapping_add((px[c] as f64 * w) as u8);
                        }
                    }
                }
            }
        }

        *out = match mode {
            Accumulate::Saturate => {
                Rgba8::from_array(sums.map(|s| s.round().clamp(0.0, 255.0) as u8))
            }
            Accumulate::Wrap => Rgba8::from_array(wrapped),
        };
    }
}
