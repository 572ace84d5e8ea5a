//! # pixflow-ops
//!
//! Pixel transforms and the stage pipeline.
//!
//! This crate provides the three transforms pixflow applies to decoded
//! images, plus the coordinator that chains them.
//!
//! # Modules
//!
//! - [`kernel`] - Gaussian and box convolution kernels
//! - [`color`] - Grayscale conversion
//! - [`transform`] - 180-degree rotation
//! - [`filter`] - Convolution with edge clamping
//! - [`parallel`] - Row-parallel convolution (feature `parallel`)
//! - [`pipeline`] - Ordered and concurrent stage scheduling
//!
//! # Example
//!
//! ```rust
//! use pixflow_core::{PixelBuffer, Rgba8};
//! use pixflow_ops::{run, TransformRequest};
//!
//! let buf = PixelBuffer::filled(32, 32, Rgba8::rgb(10, 200, 90)).unwrap();
//! let request = TransformRequest::new().with_grayscale().with_blur();
//! let out = run(buf, &request).unwrap();
//! assert_eq!(out.dimensions(), (32, 32));
//! ```
//!
//! # Common Operations
//!
//! ## Blur
//!
//! ```rust,ignore
//! use pixflow_ops::{filter::{convolve, Accumulate}, Kernel};
//!
//! let kernel = Kernel::gaussian(23, 3.0)?;
//! let blurred = convolve(&buffer, &kernel, Accumulate::Saturate)?;
//! ```
//!
//! ## Custom stage order
//!
//! ```rust,ignore
//! use pixflow_ops::{Pipeline, PipelineConfig, StageKind};
//!
//! let config = PipelineConfig::with_order([StageKind::Grayscale, StageKind::Blur, StageKind::Rotate]);
//! let out = Pipeline::new(config)?.run(buffer, &request)?;
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod color;
pub mod filter;
pub mod kernel;
pub mod pipeline;
pub mod transform;

#[cfg(feature = "parallel")]
pub mod parallel;

pub use error::{OpsError, OpsResult};
pub use filter::Accumulate;
pub use kernel::{Kernel, MAX_KERNEL_SIZE};
pub use pipeline::{
    BlurParams, Pipeline, PipelineConfig, PipelineOutput, Schedule, StageKind, TransformRequest,
    run,
};
