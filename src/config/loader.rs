//! Configuration loading and discovery for `palswap.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::PalswapConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file
pub const CONFIG_FILE: &str = "palswap.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse palswap.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override the default palette
    pub palette: Option<String>,
    /// Override strict decoding
    pub strict: Option<bool>,
    /// Override scale factor
    pub scale: Option<u32>,
}

/// Find palswap.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for palswap.toml
/// 2. Check XDG_CONFIG_HOME/palswap/palswap.toml (or ~/.config/palswap/palswap.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find palswap.toml in XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("palswap").join(CONFIG_FILE);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find palswap.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a palswap.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns the default
/// configuration.
pub fn load_config(path: Option<&Path>) -> Result<PalswapConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(PalswapConfig::default()),
    }
}

/// Load configuration from a specific file path.
///
/// Relative paths inside the file are resolved against the file's directory.
fn load_config_file(path: &Path) -> Result<PalswapConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let mut config: PalswapConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    if let Some(root) = path.parent() {
        if let Some(palette) = config.paths.palette.as_mut() {
            if !palette.starts_with('@') {
                *palette = resolve_path(root, Path::new(palette.as_str())).display().to_string();
            }
        }
        if let Some(out) = config.paths.out.as_mut() {
            *out = resolve_path(root, out);
        }
    }

    Ok(config)
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut PalswapConfig, overrides: &CliOverrides) {
    if let Some(ref palette) = overrides.palette {
        config.paths.palette = Some(palette.clone());
    }

    if let Some(strict) = overrides.strict {
        config.decode.strict = strict;
    }

    if let Some(scale) = overrides.scale {
        config.encode.scale = scale;
    }
}

/// Resolve a path relative to a base directory.
///
/// If the path is absolute, returns it unchanged.
pub fn resolve_path(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() || root.as_os_str().is_empty() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
