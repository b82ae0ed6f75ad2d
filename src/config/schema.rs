//! Configuration schema types for `palswap.toml`
//!
//! Every section is optional:
//!
//! ```toml
//! [paths]
//! palette = "themes/dracula.json"   # or "@dracula"
//! out = "build"
//!
//! [decode]
//! strict = true
//!
//! [encode]
//! scale = 4
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Largest accepted `encode.scale`
pub const MAX_SCALE: u32 = 64;

/// File locations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Palette used when a command gets no `--palette`: a JSON file or `@builtin`
    #[serde(default)]
    pub palette: Option<String>,
    /// Output directory for generated files; next to the input when unset
    #[serde(default)]
    pub out: Option<PathBuf>,
}

/// Decoding settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecodeConfig {
    /// Treat unmatched pixels as an error
    #[serde(default)]
    pub strict: bool,
}

/// Encoding settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodeConfig {
    /// Integer upscale factor for written images
    #[serde(default = "default_scale")]
    pub scale: u32,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self { scale: default_scale() }
    }
}

fn default_scale() -> u32 {
    1
}

/// Root of `palswap.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PalswapConfig {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub decode: DecodeConfig,
    #[serde(default)]
    pub encode: EncodeConfig,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "encode.scale")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "palswap.toml: '{}' {}", self.field, self.message)
    }
}

impl PalswapConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if let Some(palette) = &self.paths.palette {
            if palette.trim().is_empty() || palette == "@" {
                errors.push(ConfigValidationError {
                    field: "paths.palette".to_string(),
                    message: "must be a file path or @name".to_string(),
                });
            }
        }

        if self.encode.scale == 0 || self.encode.scale > MAX_SCALE {
            errors.push(ConfigValidationError {
                field: "encode.scale".to_string(),
                message: format!("must be between 1 and {}", MAX_SCALE),
            });
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_parse() {
        let config: PalswapConfig = toml::from_str("").unwrap();
        assert_eq!(config, PalswapConfig::default());
        assert_eq!(config.paths.out, None);
        assert_eq!(config.encode.scale, 1);
        assert!(!config.decode.strict);
        assert!(config.is_valid());
    }

    #[test]
    fn test_full_config_parse() {
        let toml = r#"
[paths]
palette = "@dracula"
out = "dist"

[decode]
strict = true

[encode]
scale = 4
"#;
        let config: PalswapConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.paths.palette.as_deref(), Some("@dracula"));
        assert_eq!(config.paths.out, Some(PathBuf::from("dist")));
        assert!(config.decode.strict);
        assert_eq!(config.encode.scale, 4);
    }

    #[test]
    fn test_validation_scale_bounds() {
        let mut config = PalswapConfig::default();
        config.encode.scale = 0;
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "encode.scale");

        config.encode.scale = MAX_SCALE + 1;
        assert!(!config.is_valid());
    }

    #[test]
    fn test_validation_empty_palette() {
        let mut config = PalswapConfig::default();
        config.paths.palette = Some("  ".to_string());
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "palswap.toml: 'paths.palette' must be a file path or @name");
    }
}
