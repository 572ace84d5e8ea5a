//! # pixflow-io
//!
//! PNG and JPEG codecs between bytes, files and [`ImageData`].
//!
//! - **PNG** - lossless, alpha, 8/16-bit
//! - **JPEG** - lossy, used for pipeline output
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use pixflow_io::{decode, read, write};
//!
//! // Read any supported format (detected by magic bytes)
//! let image = read("input.png")?;
//!
//! // Write, choosing the encoder from the extension
//! write("output.jpg", &image)?;
//!
//! // In-memory
//! let image = decode(&request_body)?;
//! ```
//!
//! # Supported Formats
//!
//! | Format | Read | Write | Bit Depths |
//! |--------|------|-------|------------|
//! | PNG | Yes | Yes | 1-16 in, 8 out |
//! | JPEG | Yes | Yes | 8, 16 (lossless) in, 8 out |
//!
//! # Feature Flags
//!
//! - `png` - PNG support (default)
//! - `jpeg` - JPEG support (default)

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod detect;
mod error;

#[cfg(feature = "png")]
pub mod png;

#[cfg(feature = "jpeg")]
pub mod jpeg;

pub use detect::{Format, JPEG_SOI, PNG_SIGNATURE};
pub use error::{IoError, IoResult};
pub use pixflow_core::{ImageData, PixelBuffer, PixelData};

use std::path::Path;
use tracing::debug;

/// Decodes an in-memory image, detecting the format from its signature.
///
/// # Errors
///
/// - [`IoError::UnsupportedFormat`] if the bytes start with neither the PNG
///   signature nor the JPEG start-of-image marker
/// - [`IoError::DecodeError`] if the data is corrupt
pub fn decode(bytes: &[u8]) -> IoResult<ImageData> {
    match Format::from_bytes(bytes) {
        #[cfg(feature = "png")]
        Some(Format::Png) => png::decode(bytes),

        #[cfg(feature = "jpeg")]
        Some(Format::Jpeg) => jpeg::decode(bytes),

        #[allow(unreachable_patterns)]
        Some(format) => Err(IoError::UnsupportedFormat(format!(
            "{:?} support not compiled in",
            format
        ))),

        None => Err(IoError::UnsupportedFormat(
            "not a PNG or JPEG stream".to_string(),
        )),
    }
}

/// Encodes an image in `format`.
///
/// JPEG uses [`jpeg::DEFAULT_QUALITY`].
pub fn encode(image: &ImageData, format: Format) -> IoResult<Vec<u8>> {
    match format {
        #[cfg(feature = "png")]
        Format::Png => png::encode(image),

        #[cfg(feature = "jpeg")]
        Format::Jpeg => jpeg::encode(image, jpeg::DEFAULT_QUALITY),

        #[allow(unreachable_patterns)]
        other => Err(IoError::UnsupportedFormat(format!(
            "{:?} support not compiled in",
            other
        ))),
    }
}

/// Reads an image from a file, detecting the format from magic bytes.
///
/// # Example
///
/// ```rust,ignore
/// use pixflow_io::read;
///
/// let image = read("input.png")?;
/// println!("Size: {}x{}", image.width, image.height);
/// ```
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<ImageData> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let image = decode(&bytes)?;
    debug!(
        path = %path.display(),
        width = image.width,
        height = image.height,
        channels = image.channels,
        "read image"
    );
    Ok(image)
}

/// Writes an image to a file, choosing the encoder from the extension.
///
/// # Errors
///
/// - [`IoError::UnsupportedFormat`] for extensions other than `png`, `jpg`
///   and `jpeg`
/// - [`IoError::EncodeError`] if the image cannot be encoded
/// - [`IoError::Io`] if the file cannot be written
pub fn write<P: AsRef<Path>>(path: P, image: &ImageData) -> IoResult<()> {
    let path = path.as_ref();
    let format = Format::from_extension(path).ok_or_else(|| {
        IoError::UnsupportedFormat(
            path.extension()
                .and_then(|e| e.to_str())
                .unwrap_or("unknown")
                .to_string(),
        )
    })?;

    let bytes = encode(image, format)?;
    std::fs::write(path, &bytes)?;
    debug!(path = %path.display(), ?format, len = bytes.len(), "wrote image");
    Ok(())
}

/// Decodes bytes straight into an RGBA8 [`PixelBuffer`].
pub fn decode_buffer(bytes: &[u8]) -> IoResult<PixelBuffer> {
    Ok(PixelBuffer::from_image(&decode(bytes)?)?)
}
