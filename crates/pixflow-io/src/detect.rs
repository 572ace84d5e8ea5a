//! Format detection from magic bytes and file extensions.

use std::path::Path;

/// PNG file signature.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// JPEG start-of-image marker.
pub const JPEG_SOI: [u8; 2] = [0xFF, 0xD8];

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// PNG format.
    Png,
    /// JPEG format.
    Jpeg,
}

impl Format {
    /// Detects format from raw bytes (magic number check).
    ///
    /// ```rust
    /// use pixflow_io::Format;
    ///
    /// assert_eq!(Format::from_bytes(b"\x89PNG\r\n\x1a\n...."), Some(Format::Png));
    /// assert_eq!(Format::from_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(Format::Jpeg));
    /// assert_eq!(Format::from_bytes(b"GIF89a"), None);
    /// ```
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&PNG_SIGNATURE) {
            Some(Format::Png)
        } else if bytes.starts_with(&JPEG_SOI) {
            Some(Format::Jpeg)
        } else {
            None
        }
    }

    /// Detects format from file extension only (case-insensitive).
    pub fn from_extension<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("png") => Some(Format::Png),
            Some("jpg") | Some("jpeg") => Some(Format::Jpeg),
            _ => None,
        }
    }

    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Format::Png => "image/png",
            Format::Jpeg => "image/jpeg",
        }
    }
}
