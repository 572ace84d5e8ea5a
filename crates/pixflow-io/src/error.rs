//! Error types for I/O operations.

use std::io;
use thiserror::Error;

/// I/O operation error.
#[derive(Debug, Error)]
pub enum IoError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Neither a PNG nor a JPEG signature, or an unknown file extension.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Decoding error (corrupt or truncated data, unsupported layout).
    #[error("decode error: {0}")]
    DecodeError(String),

    /// Encoding error.
    #[error("encode error: {0}")]
    EncodeError(String),

    /// Pixel data rejected while converting to or from a buffer.
    #[error(transparent)]
    Core(#[from] pixflow_core::Error),
}

/// Result type for I/O operations.
pub type IoResult<T> = Result<T, IoError>;
