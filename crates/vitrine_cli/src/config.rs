//! Vitrine configuration file handling

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use vitrine_landing::LandingConfig;

/// Default configuration file name
pub const CONFIG_FILE: &str = "vitrine.toml";

/// Resolve `path` to a config file, looking for vitrine.toml in directories
pub fn config_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(CONFIG_FILE)
    } else {
        path.to_path_buf()
    }
}

/// Load and validate configuration from a file or directory
pub fn load_from_path(path: &Path) -> Result<LandingConfig> {
    let config_path = config_path(path);

    if !config_path.exists() {
        anyhow::bail!(
            "No {} found at {}. Run `vitrine init` to create one.",
            CONFIG_FILE,
            path.display()
        );
    }

    let content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;

    let config: LandingConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", config_path.display()))?;

    config
        .validate()
        .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;

    tracing::debug!(path = %config_path.display(), "loaded configuration");
    Ok(config)
}

/// Load from `path` when given, else from ./vitrine.toml if present, else defaults
pub fn load_or_default(path: Option<&Path>) -> Result<LandingConfig> {
    match path {
        Some(path) => load_from_path(path),
        None if Path::new(CONFIG_FILE).exists() => load_from_path(Path::new(CONFIG_FILE)),
        None => Ok(LandingConfig::default()),
    }
}

/// Serialize to TOML string
pub fn to_toml(config: &LandingConfig) -> Result<String> {
    toml::to_string_pretty(config).context("Failed to serialize config")
}

/// Write the default configuration to `path` (a file or directory)
pub fn write_default(path: &Path, force: bool) -> Result<PathBuf> {
    let config_path = config_path(path);
    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Pass --force to overwrite it.",
            config_path.display()
        );
    }

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(&config_path, to_toml(&LandingConfig::default())?)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    Ok(config_path)
}
