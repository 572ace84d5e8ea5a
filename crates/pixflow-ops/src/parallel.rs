//! Parallel image processing operations using Rayon.
//!
//! Convolution output rows are disjoint and each row only reads the
//! (immutable) source buffer, so rows are distributed across the Rayon pool
//! without any locking.
//!
//! # Example
//!
//! ```rust
//! use pixflow_core::{PixelBuffer, Rgba8};
//! use pixflow_ops::filter::Accumulate;
//! use pixflow_ops::kernel::Kernel;
//! use pixflow_ops::parallel;
//!
//! let src = PixelBuffer::filled(256, 256, Rgba8::gray(64)).unwrap();
//! let kernel = Kernel::gaussian(5, 1.5).unwrap();
//! let blurred = parallel::convolve(&src, &kernel, Accumulate::Saturate).unwrap();
//! assert_eq!(blurred.dimensions(), (256, 256));
//! ```

use crate::filter::{Accumulate, convolve_row, finish};
use crate::kernel::Kernel;
use crate::OpsResult;
use pixflow_core::{PixelBuffer, Rgba8};
use rayon::prelude::*;
use tracing::trace;

/// Parallel convolution.
///
/// Produces exactly the same output as [`crate::filter::convolve`].
pub fn convolve(src: &PixelBuffer, kernel: &Kernel, mode: Accumulate) -> OpsResult<PixelBuffer> {
    trace!(
        width = src.width(),
        height = src.height(),
        kernel = kernel.size(),
        ?mode,
        "parallel::convolve"
    );

    let width = src.width() as usize;
    let mut out = vec![Rgba8::TRANSPARENT; src.pixel_count()];

    out.par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| convolve_row(src, kernel, mode, y, row));

    finish(src, out)
}
