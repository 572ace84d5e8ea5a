//! Server configuration.
//!
//! Deserializes from YAML; every field has a default, so an empty document
//! is a valid config:
//!
//! ```yaml
//! listen: 127.0.0.1:8080
//! max_body_mb: 32
//! jpeg_quality: 75
//! pipeline:
//!   order: [blur, grayscale, rotate]
//!   schedule: ordered
//! blur:
//!   size: 23
//!   spread: 3.0
//!   accumulate: saturate
//! ```

use pixflow_ops::{BlurParams, PipelineConfig};
use serde::{Deserialize, Serialize};

/// Default listen address.
pub const DEFAULT_LISTEN: &str = "127.0.0.1:8080";

/// Default request body limit in MiB.
pub const DEFAULT_MAX_BODY_MB: usize = 32;

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind.
    pub listen: String,
    /// Request body limit in MiB.
    pub max_body_mb: usize,
    /// Quality of the JPEG response.
    pub jpeg_quality: u8,
    /// Stage order and schedule.
    pub pipeline: PipelineConfig,
    /// Blur kernel used when a request enables blur without overrides.
    pub blur: BlurParams,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN.to_string(),
            max_body_mb: DEFAULT_MAX_BODY_MB,
            jpeg_quality: pixflow_io::jpeg::DEFAULT_QUALITY,
            pipeline: PipelineConfig::default(),
            blur: BlurParams::default(),
        }
    }
}

impl ServerConfig {
    /// Body limit in bytes.
    pub fn max_body_bytes(&self) -> usize {
        self.max_body_mb.saturating_mul(1024 * 1024)
    }
}
