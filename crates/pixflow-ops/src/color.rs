//! Per-pixel color operations.
//!
//! - [`grayscale`] - replace R, G, B with the pixel's luma, keep alpha
//!
//! # Example
//!
//! ```rust
//! use pixflow_core::{PixelBuffer, Rgba8};
//! use pixflow_ops::color::grayscale;
//!
//! let mut buf = PixelBuffer::filled(4, 4, Rgba8::new(200, 100, 50, 7)).unwrap();
//! grayscale(&mut buf);
//! assert_eq!(buf.pixel(0, 0), Rgba8::new(118, 118, 118, 7));
//! ```

use pixflow_core::{PixelBuffer, Rgba8};
use tracing::trace;

/// Converts every pixel to gray in place.
///
/// Luma is `round(0.21*R + 0.72*G + 0.07*B)`; alpha is left untouched.
/// Gray pixels are fixed points, so the operation is idempotent.
pub fn grayscale(buffer: &mut PixelBuffer) {
    trace!(width = buffer.width(), height = buffer.height(), "grayscale");
    buffer.map_pixels(Rgba8::to_gray);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(w: u32, h: u32) -> PixelBuffer {
        let samples = (0..w * h)
            .map(|i| Rgba8::new((i * 7) as u8, (i * 13) as u8, (i * 31) as u8, (i * 3) as u8))
            .collect();
        PixelBuffer::from_samples(w, h, samples).unwrap()
    }

    #[test]
    fn test_grayscale_channels_equal() {
        let mut buf = gradient(16, 9);
        grayscale(&mut buf);
        assert!(buf.samples().iter().all(|px| px.is_gray()));
    }

    #[test]
    fn test_grayscale_idempotent() {
        let mut once = gradient(16, 9);
        grayscale(&mut once);
        let mut twice = once.clone();
        grayscale(&mut twice);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_grayscale_preserves_alpha() {
        let before = gradient(16, 9);
        let mut after = before.clone();
        grayscale(&mut after);
        for (a, b) in before.samples().iter().zip(after.samples()) {
            assert_eq!(a.a, b.a);
        }
    }

    #[test]
    fn test_grayscale_weights() {
        let mut buf = PixelBuffer::from_samples(
            3,
            1,
            vec![Rgba8::rgb(255, 0, 0), Rgba8::rgb(0, 255, 0), Rgba8::rgb(0, 0, 255)],
        )
        .unwrap();
        grayscale(&mut buf);
        assert_eq!(buf.pixel(0, 0), Rgba8::gray(54));
        assert_eq!(buf.pixel(1, 0), Rgba8::gray(184));
        assert_eq!(buf.pixel(2, 0), Rgba8::gray(18));
    }
}
