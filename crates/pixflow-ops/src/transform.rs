//! Geometric transformations.
//!
//! - [`rotate_180`] - point reflection through the buffer center, in place
//!
//! # Example
//!
//! ```rust
//! use pixflow_core::{PixelBuffer, Rgba8};
//! use pixflow_ops::transform::rotate_180;
//!
//! let (a, b, c, d) = (Rgba8::gray(1), Rgba8::gray(2), Rgba8::gray(3), Rgba8::gray(4));
//! let mut buf = PixelBuffer::from_samples(2, 2, vec![a, b, c, d]).unwrap();
//! rotate_180(&mut buf);
//! assert_eq!(buf.samples(), &[d, c, b, a]);
//! ```

use pixflow_core::PixelBuffer;
use tracing::trace;

/// Rotates the buffer 180 degrees in place.
///
/// Pixel (x, y) moves to (width-1-x, height-1-y). In a row-major buffer
/// that position is the mirrored sample index `n-1-i`, so the rotation is a
/// reversal of the sample slice: every pair is swapped exactly once and, for
/// odd pixel counts, the center pixel stays put. The middle row of an
/// odd-height buffer is mirrored in x like any other row. No allocation.
pub fn rotate_180(buffer: &mut PixelBuffer) {
    trace!(width = buffer.width(), height = buffer.height(), "rotate_180");
    buffer.samples_mut().reverse();
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixflow_core::Rgba8;

    fn numbered(w: u32, h: u32) -> PixelBuffer {
        let samples = (0..w * h)
            .map(|i| Rgba8::new(i as u8, (i >> 8) as u8, 0, 255))
            .collect();
        PixelBuffer::from_samples(w, h, samples).unwrap()
    }

    #[test]
    fn test_rotate_2x2() {
        let mut buf = numbered(2, 2);
        let (a, b, c, d) = (buf.pixel(0, 0), buf.pixel(1, 0), buf.pixel(0, 1), buf.pixel(1, 1));
        rotate_180(&mut buf);
        assert_eq!(buf.pixel(0, 0), d);
        assert_eq!(buf.pixel(1, 0), c);
        assert_eq!(buf.pixel(0, 1), b);
        assert_eq!(buf.pixel(1, 1), a);
    }

    #[test]
    fn test_rotate_maps_every_pixel() {
        for (w, h) in [(1, 1), (3, 3), (4, 3), (5, 1), (1, 5), (6, 7)] {
            let src = numbered(w, h);
            let mut dst = src.clone();
            rotate_180(&mut dst);
            for y in 0..h {
                for x in 0..w {
                    assert_eq!(dst.pixel(w - 1 - x, h - 1 - y), src.pixel(x, y));
                }
            }
        }
    }

    #[test]
    fn test_rotate_odd_height_middle_row() {
        // 4x3: the middle row must be mirrored in x
        let src = numbered(4, 3);
        let mut dst = src.clone();
        rotate_180(&mut dst);
        let mid: Vec<_> = dst.row(1).to_vec();
        let mut expected: Vec<_> = src.row(1).to_vec();
        expected.reverse();
        assert_eq!(mid, expected);
    }

    #[test]
    fn test_rotate_involution() {
        let src = numbered(17, 11);
        let mut buf = src.clone();
        rotate_180(&mut buf);
        assert_ne!(buf, src);
        rotate_180(&mut buf);
        assert_eq!(buf, src);
    }
}
