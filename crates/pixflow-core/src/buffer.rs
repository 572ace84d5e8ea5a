//! The pixel buffer ("tensor") transformed by the pipeline.
//!
//! [`PixelBuffer`] is a non-empty 2D grid of [`Rgba8`] samples stored in
//! **row-major** order, top-to-bottom:
//!
//! ```text
//! samples: [ (0,0) (1,0) ... (w-1,0) ]  <- row 0
//!          [ (0,1) (1,1) ... (w-1,1) ]  <- row 1
//!          ...
//! ```
//!
//! The grid is always fully populated: construction either yields
//! `width * height` samples or fails, so there is no "missing pixel" state
//! for transforms or encoders to skip.
//!
//! # Usage
//!
//! ```rust
//! use pixflow_core::{PixelBuffer, Rgba8};
//!
//! let mut buf = PixelBuffer::new(4, 2).unwrap();
//! buf.set(3, 1, Rgba8::WHITE).unwrap();
//! assert_eq!(buf.get(3, 1), Some(Rgba8::WHITE));
//! assert_eq!(buf.get(4, 1), None);
//! assert!(buf.set(0, 2, Rgba8::WHITE).is_err());
//! ```

use crate::{Error, ImageData, PixelData, Result, Rgba8, quantize_f32, quantize_u16};

/// Owned, fully populated RGBA8 pixel grid.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    samples: Vec<Rgba8>,
}

/// Validates dimensions and returns the sample count.
fn sample_count(width: u32, height: u32) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(Error::invalid_parameter(format!(
            "buffer dimensions must be non-zero, got {}x{}",
            width, height
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| Error::invalid_parameter(format!("buffer {}x{} overflows", width, height)))
}

impl PixelBuffer {
    /// Creates a buffer filled with transparent black.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::filled(width, height, Rgba8::TRANSPARENT)
    }

    /// Creates a buffer where every pixel is `color`.
    pub fn filled(width: u32, height: u32, color: Rgba8) -> Result<Self> {
        let count = sample_count(width, height)?;
        Ok(Self {
            width,
            height,
            samples: vec![color; count],
        })
    }

    /// Creates a buffer from row-major samples.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] for zero dimensions,
    /// [`Error::UnsupportedPixelFormat`] if `samples.len() != width * height`.
    pub fn from_samples(width: u32, height: u32, samples: Vec<Rgba8>) -> Result<Self> {
        let count = sample_count(width, height)?;
        if samples.len() != count {
            return Err(Error::unsupported_format(format!(
                "expected {} samples for {}x{}, got {}",
                count,
                width,
                height,
                samples.len()
            )));
        }
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Builds a buffer from a decoded image, normalizing every sample to RGBA8.
    ///
    /// Channel layouts: 1 = gray, 2 = gray + alpha, 3 = RGB (opaque),
    /// 4 = RGBA. 16-bit samples keep their high byte; float samples are
    /// clamped to [0, 1] and rounded.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidParameter`] for zero dimensions
    /// - [`Error::UnsupportedPixelFormat`] for other channel counts or when
    ///   the sample count does not match `width * height * channels`
    pub fn from_image(image: &ImageData) -> Result<Self> {
        let count = sample_count(image.width, image.height)?;
        let channels = image.channels as usize;
        if !(1..=4).contains(&channels) {
            return Err(Error::unsupported_format(format!(
                "cannot normalize {} channels to RGBA8",
                image.channels
            )));
        }
        let expected = count * channels;
        if image.data.len() != expected {
            return Err(Error::unsupported_format(format!(
                "expected {} samples for {}x{}x{}, got {}",
                expected,
                image.width,
                image.height,
                channels,
                image.data.len()
            )));
        }

        let samples = match &image.data {
            PixelData::U8(data) => pack(data, channels, |v| v),
            PixelData::U16(data) => pack(data, channels, quantize_u16),
            PixelData::F32(data) => pack(data, channels, quantize_f32),
        };

        Ok(Self {
            width: image.width,
            height: image.height,
            samples,
        })
    }

    /// Converts the buffer into 4-channel u8 image data.
    pub fn to_image(&self) -> ImageData {
        let mut data = Vec::with_capacity(self.samples.len() * 4);
        for px in &self.samples {
            data.extend_from_slice(&px.to_array());
        }
        ImageData::from_u8(self.width, self.height, 4, data)
    }

    /// Returns the buffer width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the buffer height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the total number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Returns the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Rgba8 {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        self.samples[self.index(x, y)]
    }

    /// Returns the pixel at (x, y), or `None` if out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x < self.width && y < self.height {
            Some(self.pixel(x, y))
        } else {
            None
        }
    }

    /// Sets the pixel at (x, y).
    ///
    /// # Errors
    ///
    /// [`Error::OutOfBounds`] if (x, y) is outside the buffer.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, color: Rgba8) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::out_of_bounds(x, y, self.width, self.height));
        }
        let i = self.index(x, y);
        self.samples[i] = color;
        Ok(())
    }

    /// All samples in row-major order.
    #[inline]
    pub fn samples(&self) -> &[Rgba8] {
        &self.samples
    }

    /// Mutable access to all samples in row-major order.
    #[inline]
    pub fn samples_mut(&mut self) -> &mut [Rgba8] {
        &mut self.samples
    }

    /// Returns row `y` as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[Rgba8] {
        let start = y as usize * self.width as usize;
        &self.samples[start..start + self.width as usize]
    }

    /// Iterates over rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Rgba8]> + '_ {
        self.samples.chunks_exact(self.width as usize)
    }

    /// Applies `f` to every pixel in place.
    pub fn map_pixels<F>(&mut self, f: F)
    where
        F: Fn(Rgba8) -> Rgba8,
    {
        for px in &mut self.samples {
            *px = f(*px);
        }
    }

    /// Fails with [`Error::DimensionMismatch`] unless `other` has the same shape.
    pub fn ensure_same_dimensions(&self, other: &PixelBuffer) -> Result<()> {
        if self.dimensions() != other.dimensions() {
            return Err(Error::dimension_mismatch(
                self.dimensions(),
                other.dimensions(),
            ));
        }
        Ok(())
    }
}

/// Packs interleaved samples of 1-4 channels into RGBA8 pixels.
fn pack<T: Copy>(data: &[T], channels: usize, q: impl Fn(T) -> u8) -> Vec<Rgba8> {
    data.chunks_exact(channels)
        .map(|c| match channels {
            1 => Rgba8::gray(q(c[0])),
            2 => {
                let v = q(c[0]);
                Rgba8::new(v, v, v, q(c[1]))
            }
            3 => Rgba8::rgb(q(c[0]), q(c[1]), q(c[2])),
            _ => Rgba8::new(q(c[0]), q(c[1]), q(c[2]), q(c[3])),
        })
        .collect()
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_new() {
        let buf = PixelBuffer::new(100, 50).unwrap();
        assert_eq!(buf.dimensions(), (100, 50));
        assert_eq!(buf.pixel_count(), 5000);
        assert_eq!(buf.pixel(99, 49), Rgba8::TRANSPARENT);
    }

    #[test]
    fn test_buffer_zero_dimensions() {
        assert!(matches!(
            PixelBuffer::new(0, 10),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            PixelBuffer::new(10, 0),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_buffer_get_set() {
        let mut buf = PixelBuffer::filled(3, 3, Rgba8::BLACK).unwrap();
        buf.set(2, 1, Rgba8::rgb(1, 2, 3)).unwrap();
        assert_eq!(buf.get(2, 1), Some(Rgba8::rgb(1, 2, 3)));
        // Row-major: (2, 1) is sample 5
        assert_eq!(buf.samples()[5], Rgba8::rgb(1, 2, 3));
        assert_eq!(buf.get(3, 0), None);
        assert_eq!(
            buf.set(0, 3, Rgba8::WHITE),
            Err(Error::out_of_bounds(0, 3, 3, 3))
        );
    }

    #[test]
    fn test_from_samples_wrong_size() {
        let result = PixelBuffer::from_samples(2, 2, vec![Rgba8::BLACK; 3]);
        assert!(matches!(result, Err(Error::UnsupportedPixelFormat(_))));
    }

    #[test]
    fn test_rows() {
        let samples = (0..6).map(Rgba8::gray).collect();
        let buf = PixelBuffer::from_samples(3, 2, samples).unwrap();
        let rows: Vec<_> = buf.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], buf.row(1));
        assert_eq!(rows[1][0], Rgba8::gray(3));
    }

    #[test]
    fn test_from_image_rgba_roundtrip() {
        let data: Vec<u8> = (0..4 * 3 * 4).map(|i| (i * 5) as u8).collect();
        let img = ImageData::from_u8(4, 3, 4, data);
        let buf = PixelBuffer::from_image(&img).unwrap();
        assert_eq!(buf.pixel(1, 0), Rgba8::new(20, 25, 30, 35));
        assert_eq!(buf.to_image(), img);
    }

    #[test]
    fn test_from_image_layouts() {
        let gray = ImageData::from_u8(1, 1, 1, vec![77]);
        assert_eq!(
            PixelBuffer::from_image(&gray).unwrap().pixel(0, 0),
            Rgba8::new(77, 77, 77, 255)
        );

        let gray_alpha = ImageData::from_u8(1, 1, 2, vec![77, 9]);
        assert_eq!(
            PixelBuffer::from_image(&gray_alpha).unwrap().pixel(0, 0),
            Rgba8::new(77, 77, 77, 9)
        );

        let rgb16 = ImageData::from_u16(1, 1, 3, vec![0xFFFF, 0x8000, 0x0001]);
        assert_eq!(
            PixelBuffer::from_image(&rgb16).unwrap().pixel(0, 0),
            Rgba8::new(255, 128, 0, 255)
        );

        let rgbaf = ImageData::from_f32(1, 1, 4, vec![1.0, 0.0, 0.5, 2.0]);
        assert_eq!(
            PixelBuffer::from_image(&rgbaf).unwrap().pixel(0, 0),
            Rgba8::new(255, 0, 128, 255)
        );
    }

    #[test]
    fn test_from_image_unsupported() {
        let five = ImageData::from_u8(1, 1, 5, vec![0; 5]);
        assert!(matches!(
            PixelBuffer::from_image(&five),
            Err(Error::UnsupportedPixelFormat(_))
        ));

        let short = ImageData::from_u8(2, 2, 3, vec![0; 11]);
        assert!(matches!(
            PixelBuffer::from_image(&short),
            Err(Error::UnsupportedPixelFormat(_))
        ));

        let empty = ImageData::from_u8(0, 2, 3, vec![]);
        assert!(matches!(
            PixelBuffer::from_image(&empty),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_map_pixels() {
        let mut buf = PixelBuffer::filled(2, 2, Rgba8::rgb(10, 20, 30)).unwrap();
        buf.map_pixels(|px| Rgba8::new(px.b, px.g, px.r, px.a));
        assert_eq!(buf.pixel(1, 1), Rgba8::rgb(30, 20, 10));
    }

    #[test]
    fn test_ensure_same_dimensions() {
        let a = PixelBuffer::new(2, 3).unwrap();
        let b = PixelBuffer::new(3, 2).unwrap();
        assert!(a.ensure_same_dimensions(&a.clone()).is_ok());
        assert!(matches!(
            a.ensure_same_dimensions(&b),
            Err(Error::DimensionMismatch { .. })
        ));
    }
}
