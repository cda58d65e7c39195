//! Locating and loading `convgen.toml`.

use anyhow::{Context, Result};
use convgen_core::GeneratorConfig;
use std::path::{Path, PathBuf};

/// File name looked up next to the source file.
pub const CONFIG_FILE_NAME: &str = "convgen.toml";

/// Load configuration from a file
pub fn from_file(path: impl AsRef<Path>) -> Result<GeneratorConfig> {
    let content = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read config: {:?}", path.as_ref()))?;

    from_str(&content).with_context(|| format!("Invalid config: {:?}", path.as_ref()))
}

/// Parse and validate configuration from a string
pub fn from_str(content: &str) -> Result<GeneratorConfig> {
    let config: GeneratorConfig = toml::from_str(content).context("Failed to parse config")?;
    config.validate()?;
    Ok(config)
}

/// The config file to use for `target`: `explicit` when given, otherwise a
/// `convgen.toml` in the same directory if one exists.
pub fn locate(explicit: Option<&Path>, target: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let sibling = target
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(CONFIG_FILE_NAME);
    sibling.is_file().then_some(sibling)
}

/// Resolve and load the configuration for `target`, falling back to defaults.
pub fn load(explicit: Option<&Path>, target: &Path) -> Result<GeneratorConfig> {
    match locate(explicit, target) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            from_file(&path)
        }
        None => Ok(GeneratorConfig::default()),
    }
}
