use std::path::Path;

use anyhow::{bail, Context, Result};
use log::{debug, info};

use crate::config::GenerationConfig;
use crate::providers::FileSystemProvider;

/// Load the configuration file if one is given, defaults otherwise.
pub async fn load_config(path: Option<&Path>) -> Result<GenerationConfig> {
    let Some(path) = path else {
        debug!("No configuration file given, using defaults");
        return Ok(GenerationConfig::default());
    };

    if !FileSystemProvider::file_exists(path).await? {
        bail!("Configuration file not found: {}", path.display());
    }

    let content = FileSystemProvider::read_file(path).await?;
    let config = GenerationConfig::from_json_str(&content, path)
        .context("Failed to load generation configuration")?;
    info!("Loaded configuration from {}", path.display());
    Ok(config)
}
