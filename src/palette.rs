//! Palette configuration and resolved palettes
//!
//! A palette maps keys such as `"dark"` or `"primary"` to an ordered list of
//! variant colors. The raw form ([`PaletteConfig`]) holds hex strings as they
//! appear in a JSON theme file:
//!
//! ```json
//! { "dark": ["#333333", "#333333"], "light": ["#555555", "#555555"] }
//! ```
//!
//! [`Palette::build`] resolves every string to a [`Color`]. Key order is the
//! order of the source document and decides which key wins when several
//! could match a pixel.

use crate::color::{Color, ColorError};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Error type for palette loading and construction
#[derive(Debug, Error)]
pub enum PaletteError {
    /// A variant is not a valid `#RRGGBB` color
    #[error("key '{key}' variant {position}: {source}")]
    Color {
        key: String,
        position: usize,
        #[source]
        source: ColorError,
    },
    /// A key has no variants
    #[error("key '{0}' has no colors")]
    EmptyVariants(String),
    /// The same key appears twice
    #[error("duplicate palette key '{0}'")]
    DuplicateKey(String),
    /// Palette file could not be read
    #[error("failed to read palette: {0}")]
    Io(#[from] std::io::Error),
    /// Palette file is not a JSON object of string lists
    #[error("failed to parse palette: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Raw palette: ordered `key -> [hex, ...]` as written in a theme file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaletteConfig {
    entries: Vec<(String, Vec<String>)>,
}

impl PaletteConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a key. Order of insertion is kept.
    pub fn insert(&mut self, key: impl Into<String>, colors: Vec<String>) {
        self.entries.push((key.into(), colors));
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, colors: &[&str]) -> Self {
        self.insert(key, colors.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a JSON palette document.
    pub fn from_json_str(s: &str) -> Result<Self, PaletteError> {
        Ok(serde_json::from_str(s)?)
    }
}

impl Serialize for PaletteConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, colors) in &self.entries {
            map.serialize_entry(key, colors)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PaletteConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ConfigVisitor;

        impl<'de> Visitor<'de> for ConfigVisitor {
            type Value = PaletteConfig;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping palette keys to lists of hex colors")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut config = PaletteConfig::new();
                let mut seen = HashSet::new();
                while let Some((key, colors)) = access.next_entry::<String, Vec<String>>()? {
                    if !seen.insert(key.clone()) {
                        return Err(serde::de::Error::custom(format!(
                            "duplicate palette key '{}'",
                            key
                        )));
                    }
                    config.insert(key, colors);
                }
                Ok(config)
            }
        }

        deserializer.deserialize_map(ConfigVisitor)
    }
}

/// A palette with every variant resolved to a [`Color`].
///
/// Read-only once built, so it can be shared freely between threads.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    name: String,
    entries: Vec<(String, Vec<Color>)>,
    index: HashMap<String, usize>,
}

impl Palette {
    /// Resolve a raw config. Fails on the first bad color, empty variant list
    /// or duplicate key; nothing is returned on failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use palswap::palette::{Palette, PaletteConfig};
    ///
    /// let config = PaletteConfig::new()
    ///     .with("dark", &["#333333", "#333333"])
    ///     .with("light", &["#555555", "#555555"]);
    /// let palette = Palette::build("theme", &config).unwrap();
    /// assert_eq!(palette.keys().collect::<Vec<_>>(), vec!["dark", "light"]);
    /// assert_eq!(palette.lookup("light", 1).unwrap().to_hex(), "#555555");
    /// ```
    pub fn build(name: impl Into<String>, config: &PaletteConfig) -> Result<Self, PaletteError> {
        let mut entries = Vec::with_capacity(config.len());
        let mut index = HashMap::with_capacity(config.len());

        for (key, hexes) in config.iter() {
            if hexes.is_empty() {
                return Err(PaletteError::EmptyVariants(key.to_string()));
            }
            if index.contains_key(key) {
                return Err(PaletteError::DuplicateKey(key.to_string()));
            }
            let colors = hexes
                .iter()
                .enumerate()
                .map(|(position, hex)| {
                    Color::from_hex(hex).map_err(|source| PaletteError::Color {
                        key: key.to_string(),
                        position,
                        source,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            index.insert(key.to_string(), entries.len());
            entries.push((key.to_string(), colors));
        }

        Ok(Self { name: name.into(), entries, index })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in palette order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// `(key, variants)` pairs in palette order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Color])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Variant list of a key
    pub fn variants(&self, key: &str) -> Option<&[Color]> {
        self.index.get(key).map(|&i| self.entries[i].1.as_slice())
    }

    /// The color at `palette[key][index]`
    pub fn lookup(&self, key: &str, index: usize) -> Option<Color> {
        self.variants(key).and_then(|v| v.get(index).copied())
    }

    /// Convert back to hex strings.
    pub fn to_config(&self) -> PaletteConfig {
        let mut config = PaletteConfig::new();
        for (key, colors) in &self.entries {
            config.insert(key.clone(), colors.iter().map(|c| c.to_hex()).collect());
        }
        config
    }
}

/// Load and build a palette from a JSON file. The palette is named after the
/// file stem.
pub fn load_palette(path: &Path) -> Result<Palette, PaletteError> {
    let contents = fs::read_to_string(path)?;
    let config = PaletteConfig::from_json_str(&contents)?;
    let name = path.file_stem().and_then(|s| s.to_str()).unwrap_or("palette");
    Palette::build(name, &config)
}
