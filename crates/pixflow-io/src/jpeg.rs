//! JPEG format support.
//!
//! # Decoding
//!
//! | Source layout | Result |
//! |---------------|--------|
//! | RGB24  | 3 channels, u8 |
//! | L8     | 1 channel, u8 |
//! | L16    | 1 channel, u16 |
//! | CMYK32 | 3 channels, u8 (approximate conversion) |
//!
//! # Encoding
//!
//! JPEG carries no alpha. RGBA and gray+alpha images are written with alpha
//! dropped; gray images are written as single-component (luma) JPEGs.
//!
//! # Example
//!
//! ```rust
//! use pixflow_core::ImageData;
//! use pixflow_io::jpeg;
//!
//! let image = ImageData::from_u8(16, 16, 3, vec![100; 16 * 16 * 3]);
//! let bytes = jpeg::encode(&image, jpeg::DEFAULT_QUALITY).unwrap();
//! let back = jpeg::decode(&bytes).unwrap();
//! assert_eq!((back.width, back.height), (16, 16));
//! ```

use crate::{IoError, IoResult};
use pixflow_core::ImageData;
use std::io::Cursor;
use tracing::{debug, trace};

/// Quality used when none is given (matches the common libjpeg default).
pub const DEFAULT_QUALITY: u8 = 75;

/// Decodes a JPEG byte stream.
pub fn decode(bytes: &[u8]) -> IoResult<ImageData> {
    trace!(len = bytes.len(), "jpeg::decode");

    let mut decoder = jpeg_decoder::Decoder::new(Cursor::new(bytes));
    let pixels = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(e.to_string()))?;

    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("missing JPEG info".into()))?;

    let width = info.width as u32;
    let height = info.height as u32;

    let image = match info.pixel_format {
        jpeg_decoder::PixelFormat::RGB24 => ImageData::from_u8(width, height, 3, pixels),
        jpeg_decoder::PixelFormat::L8 => ImageData::from_u8(width, height, 1, pixels),
        jpeg_decoder::PixelFormat::L16 => {
            let gray = pixels
                .chunks_exact(2)
                .map(|l16| u16::from_be_bytes([l16[0], l16[1]]))
                .collect();
            ImageData::from_u16(width, height, 1, gray)
        }
        jpeg_decoder::PixelFormat::CMYK32 => {
            let rgb = pixels.chunks_exact(4).flat_map(cmyk_to_rgb).collect();
            ImageData::from_u8(width, height, 3, rgb)
        }
    };

    Ok(image)
}

/// Naive CMYK to RGB conversion, no color management.
fn cmyk_to_rgb(cmyk: &[u8]) -> [u8; 3] {
    let k = 1.0 - cmyk[3] as f32 / 255.0;
    let ch = |c: u8| ((1.0 - c as f32 / 255.0) * k * 255.0).round() as u8;
    [ch(cmyk[0]), ch(cmyk[1]), ch(cmyk[2])]
}

/// Encodes an image as a baseline JPEG.
///
/// `quality` must be in `1..=100`.
pub fn encode(image: &ImageData, quality: u8) -> IoResult<Vec<u8>> {
    use jpeg_encoder::{ColorType, Encoder};

    trace!(
        width = image.width,
        height = image.height,
        channels = image.channels,
        quality,
        "jpeg::encode"
    );

    if !(1..=100).contains(&quality) {
        return Err(IoError::EncodeError(format!(
            "quality must be 1-100, got {}",
            quality
        )));
    }

    let (width, height) = match (u16::try_from(image.width), u16::try_from(image.height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(IoError::EncodeError(format!(
                "{}x{} exceeds the JPEG size limit of 65535",
                image.width, image.height
            )));
        }
    };

    let data = image.to_u8();
    if data.len() != image.sample_count() {
        return Err(IoError::EncodeError(format!(
            "expected {} samples, got {}",
            image.sample_count(),
            data.len()
        )));
    }

    if image.has_alpha() {
        debug!(channels = image.channels, "jpeg::encode dropping alpha");
    }
    let (color_type, pixel_data) = match image.channels {
        1 => (ColorType::Luma, data),
        2 => (ColorType::Luma, data.chunks_exact(2).map(|ga| ga[0]).collect()),
        3 => (ColorType::Rgb, data),
        4 => (
            ColorType::Rgb,
            data.chunks_exact(4)
                .flat_map(|rgba| [rgba[0], rgba[1], rgba[2]])
                .collect(),
        ),
        n => return Err(IoError::EncodeError(format!("unsupported channel count: {}", n))),
    };

    let mut buffer = Vec::new();
    let encoder = Encoder::new(&mut buffer, quality);
    encoder
        .encode(&pixel_data, width, height, color_type)
        .map_err(|e: jpeg_encoder::EncodingError| IoError::EncodeError(e.to_string()))?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> ImageData {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                data.push((x * 8) as u8);
                data.push((y * 8) as u8);
                data.push(128);
            }
        }
        ImageData::from_u8(width, height, 3, data)
    }

    #[test]
    fn test_roundtrip() {
        let bytes = encode(&gradient(32, 24), DEFAULT_QUALITY).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);

        let loaded = decode(&bytes).unwrap();
        assert_eq!(loaded.width, 32);
        assert_eq!(loaded.height, 24);
        assert_eq!(loaded.channels, 3);
    }

    #[test]
    fn test_flat_color_survives() {
        let image = ImageData::from_u8(16, 16, 3, vec![100; 16 * 16 * 3]);
        let loaded = decode(&encode(&image, 95).unwrap()).unwrap();
        for v in loaded.to_u8() {
            assert!((v as i32 - 100).abs() <= 2, "got {}", v);
        }
    }

    #[test]
    fn test_quality_affects_size() {
        let image = gradient(64, 64);
        let low = encode(&image, 20).unwrap();
        let high = encode(&image, 99).unwrap();
        assert!(high.len() >= low.len());
    }

    #[test]
    fn test_alpha_dropped() {
        let image = ImageData::from_u8(8, 8, 4, [10, 200, 30, 0].repeat(64));
        let loaded = decode(&encode(&image, 90).unwrap()).unwrap();
        assert_eq!(loaded.channels, 3);

        let gray = ImageData::from_u8(8, 8, 2, [77, 0].repeat(64));
        let loaded = decode(&encode(&gray, 90).unwrap()).unwrap();
        assert_eq!(loaded.channels, 1);
    }

    #[test]
    fn test_bad_quality() {
        let image = gradient(4, 4);
        assert!(matches!(encode(&image, 0), Err(IoError::EncodeError(_))));
        assert!(matches!(encode(&image, 101), Err(IoError::EncodeError(_))));
    }

    #[test]
    fn test_cmyk_conversion() {
        assert_eq!(cmyk_to_rgb(&[0, 0, 0, 0]), [255, 255, 255]);
        assert_eq!(cmyk_to_rgb(&[0, 0, 0, 255]), [0, 0, 0]);
        assert_eq!(cmyk_to_rgb(&[255, 0, 0, 0]), [0, 255, 255]);
    }

    #[test]
    fn test_decode_truncated() {
        let bytes = encode(&gradient(16, 16), 90).unwrap();
        assert!(matches!(decode(&bytes[..20]), Err(IoError::DecodeError(_))));
    }
}
