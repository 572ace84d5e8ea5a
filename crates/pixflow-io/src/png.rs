//! PNG format support.
//!
//! Decodes 8- and 16-bit gray, gray+alpha, RGB and RGBA images. Palette
//! images and sub-byte depths are expanded to 8 bits by the decoder, and a
//! `tRNS` chunk becomes an alpha channel. Encoding writes 8-bit samples with
//! the image's own channel layout.
//!
//! # Example
//!
//! ```rust
//! use pixflow_core::ImageData;
//! use pixflow_io::png;
//!
//! let image = ImageData::from_u8(2, 1, 4, vec![255, 0, 0, 255, 0, 0, 255, 128]);
//! let bytes = png::encode(&image).unwrap();
//! let back = png::decode(&bytes).unwrap();
//! assert_eq!(back, image);
//! ```

use crate::{IoError, IoResult};
use pixflow_core::ImageData;
use std::io::Cursor;
use tracing::trace;

/// Decodes a PNG byte stream.
pub fn decode(bytes: &[u8]) -> IoResult<ImageData> {
    trace!(len = bytes.len(), "png::decode");

    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::EXPAND);
    let mut reader = decoder
        .read_info()
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("cannot determine output buffer size".into()))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;
    buf.truncate(info.buffer_size());

    let channels = match info.color_type {
        png::ColorType::Grayscale => 1,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4,
        png::ColorType::Indexed => {
            return Err(IoError::DecodeError("palette was not expanded".into()));
        }
    };

    match info.bit_depth {
        png::BitDepth::Eight => Ok(ImageData::from_u8(info.width, info.height, channels, buf)),
        png::BitDepth::Sixteen => Ok(ImageData::from_u16(
            info.width,
            info.height,
            channels,
            bytes_to_u16(&buf),
        )),
        depth => Err(IoError::DecodeError(format!(
            "unexpected bit depth {:?} after expansion",
            depth
        ))),
    }
}

/// Encodes an image as an 8-bit PNG.
///
/// 16-bit and float samples are quantized the same way buffers are.
pub fn encode(image: &ImageData) -> IoResult<Vec<u8>> {
    trace!(
        width = image.width,
        height = image.height,
        channels = image.channels,
        "png::encode"
    );

    let color_type = match image.channels {
        1 => png::ColorType::Grayscale,
        2 => png::ColorType::GrayscaleAlpha,
        3 => png::ColorType::Rgb,
        4 => png::ColorType::Rgba,
        n => return Err(IoError::EncodeError(format!("unsupported channel count: {}", n))),
    };

    let data = image.to_u8();
    if data.len() != image.sample_count() {
        return Err(IoError::EncodeError(format!(
            "expected {} samples, got {}",
            image.sample_count(),
            data.len()
        )));
    }

    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, image.width, image.height);
        encoder.set_color(color_type);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::default());

        let mut writer = encoder
            .write_header()
            .map_err(|e| IoError::EncodeError(e.to_string()))?;
        writer
            .write_image_data(&data)
            .map_err(|e| IoError::EncodeError(e.to_string()))?;
        writer
            .finish()
            .map_err(|e| IoError::EncodeError(e.to_string()))?;
    }

    Ok(out)
}

/// Converts big-endian byte slice to u16 vector.
fn bytes_to_u16(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks_exact(2)
        .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixflow_core::PixelData;

    fn encode_raw(w: u32, h: u32, color: png::ColorType, depth: png::BitDepth, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, w, h);
            encoder.set_color(color);
            encoder.set_depth(depth);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(data).unwrap();
            writer.finish().unwrap();
        }
        out
    }

    #[test]
    fn test_roundtrip_rgb() {
        let width = 32;
        let height = 32;
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                data.push((x * 8) as u8);
                data.push((y * 8) as u8);
                data.push(128);
            }
        }

        let image = ImageData::from_u8(width, height, 3, data);
        let loaded = decode(&encode(&image).unwrap()).unwrap();
        assert_eq!(loaded, image);
    }

    #[test]
    fn test_decode_gray_alpha() {
        let bytes = encode_raw(2, 1, png::ColorType::GrayscaleAlpha, png::BitDepth::Eight, &[10, 20, 30, 40]);
        let image = decode(&bytes).unwrap();
        assert_eq!(image.channels, 2);
        assert_eq!(image.data, PixelData::U8(vec![10, 20, 30, 40]));
    }

    #[test]
    fn test_decode_16bit() {
        let bytes = encode_raw(1, 1, png::ColorType::Rgb, png::BitDepth::Sixteen, &[0x12, 0x34, 0xFF, 0x00, 0x00, 0x01]);
        let image = decode(&bytes).unwrap();
        assert_eq!(image.channels, 3);
        assert_eq!(image.data, PixelData::U16(vec![0x1234, 0xFF00, 0x0001]));
    }

    #[test]
    fn test_decode_palette_expanded() {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, 2, 1);
            encoder.set_color(png::ColorType::Indexed);
            encoder.set_depth(png::BitDepth::Eight);
            encoder.set_palette(vec![255, 0, 0, 0, 0, 255]);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&[1, 0]).unwrap();
            writer.finish().unwrap();
        }
        let image = decode(&out).unwrap();
        assert_eq!(image.channels, 3);
        assert_eq!(image.data, PixelData::U8(vec![0, 0, 255, 255, 0, 0]));
    }

    #[test]
    fn test_decode_garbage() {
        assert!(matches!(decode(b"\x89PNG\r\n\x1a\nnope"), Err(IoError::DecodeError(_))));
    }

    #[test]
    fn test_encode_rejects_bad_channels() {
        let image = ImageData::from_u8(1, 1, 5, vec![0; 5]);
        assert!(matches!(encode(&image), Err(IoError::EncodeError(_))));
    }
}
