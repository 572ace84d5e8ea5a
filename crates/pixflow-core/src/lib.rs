//! # pixflow-core
//!
//! Core types for the pixflow image transform pipeline.
//!
//! - [`Rgba8`] - 8-bit RGBA pixel and the luma weighting used for grayscale
//! - [`ImageData`] - decoded pixel grid exchanged with codecs
//! - [`PixelBuffer`] - the fully populated RGBA8 grid every transform works on
//! - [`Error`] / [`Result`] - construction and access failures
//!
//! ## Crate Structure
//!
//! ```text
//! pixflow-core (this crate)
//!    ^
//!    +-- pixflow-ops (kernel, transforms, pipeline)
//!    +-- pixflow-io (PNG/JPEG codecs)
//!    +-- pixflow-server, pixflow-cli
//! ```
//!
//! ## Example
//!
//! ```rust
//! use pixflow_core::{ImageData, PixelBuffer, Rgba8};
//!
//! let decoded = ImageData::from_u8(2, 1, 3, vec![255, 0, 0, 0, 0, 255]);
//! let buf = PixelBuffer::from_image(&decoded).unwrap();
//! assert_eq!(buf.pixel(1, 0), Rgba8::rgb(0, 0, 255));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod buffer;
pub mod error;
pub mod image;
pub mod pixel;

pub use buffer::PixelBuffer;
pub use error::{Error, Result};
pub use image::{ImageData, PixelData, SampleFormat};
pub use pixel::{LUMA, LUMA_B, LUMA_G, LUMA_R, Rgba8, quantize_f32, quantize_u16};
