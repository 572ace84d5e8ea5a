//! CLI command implementations

pub mod kernel;
pub mod process;
pub mod serve;

use anyhow::{Context, Result};
use pixflow_io::ImageData;
use pixflow_server::ServerConfig;
use std::path::Path;

/// Load image from path
pub fn load_image(path: &Path) -> Result<ImageData> {
    pixflow_io::read(path).with_context(|| format!("Failed to load: {}", path.display()))
}

/// Save image to path. JPEG output uses `jpeg_quality`.
pub fn save_image(path: &Path, image: &ImageData, jpeg_quality: u8) -> Result<()> {
    let result = match pixflow_io::Format::from_extension(path) {
        Some(pixflow_io::Format::Jpeg) => pixflow_io::jpeg::encode(image, jpeg_quality)
            .and_then(|bytes| std::fs::write(path, bytes).map_err(Into::into)),
        _ => pixflow_io::write(path, image),
    };
    result.with_context(|| format!("Failed to save: {}", path.display()))
}

/// Loads a YAML config, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<ServerConfig> {
    let Some(path) = path else {
        return Ok(ServerConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    serde_yaml::from_str(&text).with_context(|| format!("Invalid config: {}", path.display()))
}
