//! Configuration loading and discovery for `triplestack.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::StackConfig;
use crate::options::{ProcessOptions, Resolution};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name searched for during discovery
pub const CONFIG_FILE: &str = "triplestack.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse triplestack.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Work on a copy of the skin directory
    pub copy: Option<bool>,
    /// Override the target resolution
    pub resolution: Option<Resolution>,
    /// Force the overlay file's resolution
    pub force_overlay: Option<bool>,
    /// Override the `HitCircleOverlap` value
    pub overlap: Option<String>,
}

/// Find triplestack.toml by walking up from the current working directory.
pub fn find_config() -> Option<PathBuf> {
    env::current_dir().ok().and_then(find_config_from)
}

/// Find triplestack.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.is_file() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration.
///
/// An explicit path must exist. Without one, the discovered file is used,
/// or built-in defaults if there is none.
pub fn load_config(path: Option<&Path>) -> Result<StackConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => {
            log::debug!("loading configuration from {}", p.display());
            load_config_file(&p)
        }
        None => Ok(StackConfig::default()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<StackConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: StackConfig = toml::from_str(&contents)?;
    check(config)
}

fn check(config: StackConfig) -> Result<StackConfig, ConfigError> {
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }
    Ok(config)
}

/// Merge CLI overrides into a configuration and re-validate it.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(
    mut config: StackConfig,
    overrides: &CliOverrides,
) -> Result<StackConfig, ConfigError> {
    if let Some(copy) = overrides.copy {
        config.defaults.copy = copy;
    }
    if let Some(resolution) = overrides.resolution {
        config.defaults.resolution = resolution;
    }
    if let Some(force_overlay) = overrides.force_overlay {
        config.defaults.force_overlay = force_overlay;
    }
    if let Some(ref overlap) = overrides.overlap {
        config.ini.overlap = overlap.clone();
    }
    check(config)
}

impl StackConfig {
    /// Processing options for one run
    pub fn options(&self) -> ProcessOptions {
        ProcessOptions {
            create_copy: self.defaults.copy,
            resolution: self.defaults.resolution,
            force_overlay: self.defaults.force_overlay,
        }
    }
}
