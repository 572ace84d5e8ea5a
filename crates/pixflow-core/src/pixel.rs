//! 8-bit RGBA pixel type and sample quantization.
//!
//! Every pixel that flows through the pipeline is an [`Rgba8`]: four 8-bit
//! channels, alpha included. Wider sample types coming out of decoders are
//! quantized once, when the buffer is built, using [`quantize_u16`] and
//! [`quantize_f32`].
//!
//! # Luma
//!
//! Grayscale conversion uses a fixed weighting:
//! `L = 0.21*R + 0.72*G + 0.07*B`. The coefficients sum to 1.0, so a pixel
//! that is already gray maps onto itself.
//!
//! ```
//! use pixflow_core::Rgba8;
//!
//! let px = Rgba8::new(200, 100, 50, 128);
//! // 0.21*200 + 0.72*100 + 0.07*50 = 117.5
//! assert_eq!(px.luma(), 118);
//! assert_eq!(px.to_gray(), Rgba8::new(118, 118, 118, 128));
//! ```

use std::fmt;

/// Luma coefficient for the red channel.
pub const LUMA_R: f64 = 0.21;

/// Luma coefficient for the green channel.
pub const LUMA_G: f64 = 0.72;

/// Luma coefficient for the blue channel.
pub const LUMA_B: f64 = 0.07;

/// Luma coefficients as an array [R, G, B].
pub const LUMA: [f64; 3] = [LUMA_R, LUMA_G, LUMA_B];

/// A single pixel with four 8-bit channels.
///
/// `#[repr(C)]` keeps the channel order R, G, B, A in memory so a
/// `&[Rgba8]` can be viewed as interleaved RGBA bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(C)]
pub struct Rgba8 {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel (255 = opaque)
    pub a: u8,
}

impl Rgba8 {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Creates a pixel from its four channels.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque pixel.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Creates an opaque gray pixel.
    #[inline]
    pub const fn gray(v: u8) -> Self {
        Self::new(v, v, v, 255)
    }

    /// Channels as `[r, g, b, a]`.
    #[inline]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Builds a pixel from `[r, g, b, a]`.
    #[inline]
    pub const fn from_array(c: [u8; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }

    /// Rounded luma of the color channels.
    #[inline]
    pub fn luma(self) -> u8 {
        let l = LUMA_R * self.r as f64 + LUMA_G * self.g as f64 + LUMA_B * self.b as f64;
        // Weights sum to 1.0, so l never leaves [0, 255] beyond rounding noise.
        l.round().clamp(0.0, 255.0) as u8
    }

    /// Gray pixel with the same luma, alpha preserved.
    #[inline]
    pub fn to_gray(self) -> Self {
        let l = self.luma();
        Self::new(l, l, l, self.a)
    }

    /// Returns `true` when R, G and B are equal.
    #[inline]
    pub fn is_gray(self) -> bool {
        self.r == self.g && self.g == self.b
    }
}

impl fmt::Debug for Rgba8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rgba8({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl From<[u8; 4]> for Rgba8 {
    #[inline]
    fn from(c: [u8; 4]) -> Self {
        Self::from_array(c)
    }
}

impl From<Rgba8> for [u8; 4] {
    #[inline]
    fn from(px: Rgba8) -> Self {
        px.to_array()
    }
}

/// Quantizes a 16-bit sample to 8 bits by keeping the high byte.
#[inline]
pub fn quantize_u16(v: u16) -> u8 {
    (v >> 8) as u8
}

/// Quantizes a normalized float sample to 8 bits.
///
/// Values are clamped to [0.0, 1.0]; NaN maps to 0.
#[inline]
pub fn quantize_f32(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luma_weights_sum_to_one() {
        let sum: f64 = LUMA.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_luma_primaries() {
        assert_eq!(Rgba8::rgb(255, 0, 0).luma(), 54); // 53.55
        assert_eq!(Rgba8::rgb(0, 255, 0).luma(), 184); // 183.6
        assert_eq!(Rgba8::rgb(0, 0, 255).luma(), 18); // 17.85
        assert_eq!(Rgba8::WHITE.luma(), 255);
        assert_eq!(Rgba8::BLACK.luma(), 0);
    }

    #[test]
    fn test_gray_is_fixed_point() {
        for v in 0..=255u8 {
            let px = Rgba8::new(v, v, v, 7);
            assert_eq!(px.to_gray(), px);
        }
    }

    #[test]
    fn test_to_gray_keeps_alpha() {
        let px = Rgba8::new(10, 20, 30, 42);
        let g = px.to_gray();
        assert!(g.is_gray());
        assert_eq!(g.a, 42);
    }

    #[test]
    fn test_quantize() {
        assert_eq!(quantize_u16(0xFFFF), 255);
        assert_eq!(quantize_u16(0x80FF), 128);
        assert_eq!(quantize_u16(0x00FF), 0);

        assert_eq!(quantize_f32(1.0), 255);
        assert_eq!(quantize_f32(0.5), 128);
        assert_eq!(quantize_f32(-3.0), 0);
        assert_eq!(quantize_f32(8.0), 255);
        assert_eq!(quantize_f32(f32::NAN), 0);
    }

    #[test]
    fn test_array_conversions() {
        let px = Rgba8::from([1, 2, 3, 4]);
        assert_eq!(px, Rgba8::new(1, 2, 3, 4));
        let arr: [u8; 4] = px.into();
        assert_eq!(arr, [1, 2, 3, 4]);
    }
}
