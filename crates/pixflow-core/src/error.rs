//! Error types for pixflow-core.
//!
//! The [`Error`] enum covers every failure that can occur while building or
//! addressing a [`PixelBuffer`](crate::PixelBuffer):
//! - rejected parameters (zero-sized buffers)
//! - samples that cannot be normalized to 8-bit RGBA
//! - out-of-bounds writes
//!
//! # Usage
//!
//! ```rust
//! use pixflow_core::{Error, Result};
//!
//! fn check(x: u32, y: u32, width: u32, height: u32) -> Result<()> {
//!     if x >= width || y >= height {
//!         return Err(Error::out_of_bounds(x, y, width, height));
//!     }
//!     Ok(())
//! }
//! assert!(check(4, 0, 4, 4).is_err());
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by pixel buffer construction and access.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A parameter was rejected before any pixel work started.
    ///
    /// Returned for zero-sized buffers and for dimensions whose sample
    /// count would overflow `usize`.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Source samples cannot be normalized to 8-bit RGBA.
    ///
    /// Raised when a decoded image carries an unsupported channel layout
    /// or when its sample count disagrees with its dimensions.
    #[error("unsupported pixel format: {0}")]
    UnsupportedPixelFormat(String),

    /// Pixel coordinates are outside the buffer.
    #[error("pixel ({x}, {y}) out of bounds for buffer {width}x{height}")]
    OutOfBounds {
        /// X coordinate that was out of bounds
        x: u32,
        /// Y coordinate that was out of bounds
        y: u32,
        /// Buffer width
        width: u32,
        /// Buffer height
        height: u32,
    },

    /// Two buffers that must share a shape do not.
    #[error("dimension mismatch: {a_width}x{a_height} vs {b_width}x{b_height}")]
    DimensionMismatch {
        /// First buffer width
        a_width: u32,
        /// First buffer height
        a_height: u32,
        /// Second buffer width
        b_width: u32,
        /// Second buffer height
        b_height: u32,
    },
}

impl Error {
    /// Creates an [`Error::OutOfBounds`] error.
    #[inline]
    pub fn out_of_bounds(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self::OutOfBounds {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates an [`Error::DimensionMismatch`] error from two `(w, h)` pairs.
    #[inline]
    pub fn dimension_mismatch(a: (u32, u32), b: (u32, u32)) -> Self {
        Self::DimensionMismatch {
            a_width: a.0,
            a_height: a.1,
            b_width: b.0,
            b_height: b.1,
        }
    }

    /// Creates an [`Error::InvalidParameter`] error.
    #[inline]
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Creates an [`Error::UnsupportedPixelFormat`] error.
    #[inline]
    pub fn unsupported_format(msg: impl Into<String>) -> Self {
        Self::UnsupportedPixelFormat(msg.into())
    }
}
