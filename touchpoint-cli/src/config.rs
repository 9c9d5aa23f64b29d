//! Configuration loading for the CLI
//!
//! Reads `config.toml` from the touchpoint config directory; a missing
//! file yields the defaults.

use anyhow::{Context, Result};
use touchpoint_core::TrackerConfig;

pub fn load() -> Result<TrackerConfig> {
    let path = touchpoint_paths::config_dir().join("config.toml");
    if !path.exists() {
        return Ok(TrackerConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    TrackerConfig::from_toml(&content)
        .with_context(|| format!("failed to parse {}", path.display()))
}
