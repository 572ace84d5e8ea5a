//! Error types for kernel generation, transforms and the pipeline.

use thiserror::Error;

/// Error type for image operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Invalid parameter value (kernel size, spread, buffer dimensions,
    /// stage order).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A sample cannot be normalized to 8-bit RGBA.
    #[error("unsupported pixel format: {0}")]
    UnsupportedPixelFormat(String),

    /// Output shape disagrees with the input shape.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// A concurrently dispatched stage panicked or poisoned the buffer lock.
    #[error("stage '{0}' panicked")]
    StagePanicked(String),

    /// A stage worker thread could not be started.
    #[error("failed to spawn stage worker: {0}")]
    WorkerSpawn(#[from] std::io::Error),
}

impl From<pixflow_core::Error> for OpsError {
    fn from(err: pixflow_core::Error) -> Self {
        use pixflow_core::Error as E;
        match err {
            E::InvalidParameter(msg) => Self::InvalidParameter(msg),
            E::UnsupportedPixelFormat(msg) => Self::UnsupportedPixelFormat(msg),
            e @ E::DimensionMismatch { .. } => Self::DimensionMismatch(e.to_string()),
            e @ E::OutOfBounds { .. } => Self::InvalidParameter(e.to_string()),
        }
    }
}

/// Result type for image operations.
pub type OpsResult<T> = Result<T, OpsError>;
