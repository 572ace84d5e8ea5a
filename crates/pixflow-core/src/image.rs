//! Decoded image data exchanged with codecs.
//!
//! [`ImageData`] is what a decoder hands to the pipeline and what an
//! encoder receives back: interleaved, row-major samples with 1 to 4
//! channels in one of three sample types.
//!
//! | channels | layout            |
//! |----------|-------------------|
//! | 1        | gray              |
//! | 2        | gray + alpha      |
//! | 3        | R G B             |
//! | 4        | R G B A           |
//!
//! The pipeline itself never works on `ImageData`; it converts once into a
//! [`PixelBuffer`](crate::PixelBuffer) (see
//! [`PixelBuffer::from_image`](crate::PixelBuffer::from_image)).

/// Sample type of an [`ImageData`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    /// 8-bit unsigned integer per channel.
    U8,
    /// 16-bit unsigned integer per channel.
    U16,
    /// 32-bit float per channel, normalized to [0.0, 1.0].
    F32,
}

/// Raw sample storage.
#[derive(Debug, Clone, PartialEq)]
pub enum PixelData {
    /// 8-bit unsigned data.
    U8(Vec<u8>),
    /// 16-bit unsigned data.
    U16(Vec<u16>),
    /// 32-bit float data.
    F32(Vec<f32>),
}

impl PixelData {
    /// Number of samples stored.
    pub fn len(&self) -> usize {
        match self {
            Self::U8(d) => d.len(),
            Self::U16(d) => d.len(),
            Self::F32(d) => d.len(),
        }
    }

    /// Returns `true` if no samples are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sample type of this storage.
    pub fn format(&self) -> SampleFormat {
        match self {
            Self::U8(_) => SampleFormat::U8,
            Self::U16(_) => SampleFormat::U16,
            Self::F32(_) => SampleFormat::F32,
        }
    }
}

/// A decoded pixel grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Number of interleaved channels (1-4).
    pub channels: u32,
    /// Raw sample data, row-major.
    pub data: PixelData,
}

impl ImageData {
    /// Creates ImageData from u8 samples.
    pub fn from_u8(width: u32, height: u32, channels: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            channels,
            data: PixelData::U8(data),
        }
    }

    /// Creates ImageData from u16 samples.
    pub fn from_u16(width: u32, height: u32, channels: u32, data: Vec<u16>) -> Self {
        Self {
            width,
            height,
            channels,
            data: PixelData::U16(data),
        }
    }

    /// Creates ImageData from normalized f32 samples.
    pub fn from_f32(width: u32, height: u32, channels: u32, data: Vec<f32>) -> Self {
        Self {
            width,
            height,
            channels,
            data: PixelData::F32(data),
        }
    }

    /// Sample type of the stored data.
    pub fn format(&self) -> SampleFormat {
        self.data.format()
    }

    /// Returns the total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns the expected number of samples (pixels * channels).
    pub fn sample_count(&self) -> usize {
        self.pixel_count() * self.channels as usize
    }

    /// Returns `true` if the image has an alpha channel.
    pub fn has_alpha(&self) -> bool {
        self.channels == 2 || self.channels == 4
    }

    /// Converts samples to u8, quantizing wider types.
    pub fn to_u8(&self) -> Vec<u8> {
        match &self.data {
            PixelData::U8(data) => data.clone(),
            PixelData::U16(data) => data.iter().map(|&v| crate::quantize_u16(v)).collect(),
            PixelData::F32(data) => data.iter().map(|&v| crate::quantize_f32(v)).collect(),
        }
    }
}
