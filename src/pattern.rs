//! Patterns: per-pixel palette classifications
//!
//! A [`Pattern`] records, for every pixel of a source grid in row-major
//! order, which palette key and variant index matched it. Patterns do not
//! hold colors, so they can be replayed against any palette with the same
//! key/variant structure.
//!
//! On disk a pattern is JSON. Unmatched pixels are `null`, which keeps them
//! distinct from a real `{"key": ..., "index": 0}` entry:
//!
//! ```json
//! {"shape": {"height": 1, "width": 2, "channels": 3},
//!  "pixels": [{"key": "dark", "index": 0}, null]}
//! ```

use crate::grid::Shape;
use crate::palette::Palette;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Error type for reading and writing pattern files
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("failed to access pattern file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid pattern JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Pixel count disagrees with the recorded shape
    #[error("pattern has {actual} pixels but shape {shape} needs {expected}")]
    LengthMismatch { shape: Shape, expected: usize, actual: usize },
    /// `height * width` does not fit in memory
    #[error("pattern shape {0} is too large")]
    TooLarge(Shape),
}

/// A non-fatal condition worth reporting to the user
#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    pub message: String,
}

impl Warning {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Classification of one pixel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<KeyIndex>", into = "Option<KeyIndex>")]
pub enum PixelMatch {
    /// The pixel equals `palette[key][index]`
    Matched { key: String, index: usize },
    /// No palette key matched the pixel
    NoMatch,
}

impl PixelMatch {
    pub fn matched(key: impl Into<String>, index: usize) -> Self {
        PixelMatch::Matched { key: key.into(), index }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, PixelMatch::Matched { .. })
    }

    /// `(key, index)` for a match
    pub fn as_pair(&self) -> Option<(&str, usize)> {
        match self {
            PixelMatch::Matched { key, index } => Some((key.as_str(), *index)),
            PixelMatch::NoMatch => None,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct KeyIndex {
    key: String,
    index: usize,
}

impl From<Option<KeyIndex>> for PixelMatch {
    fn from(value: Option<KeyIndex>) -> Self {
        match value {
            Some(KeyIndex { key, index }) => PixelMatch::Matched { key, index },
            None => PixelMatch::NoMatch,
        }
    }
}

impl From<PixelMatch> for Option<KeyIndex> {
    fn from(value: PixelMatch) -> Self {
        match value {
            PixelMatch::Matched { key, index } => Some(KeyIndex { key, index }),
            PixelMatch::NoMatch => None,
        }
    }
}

/// Row-major classifications of a grid, plus the grid's shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    /// Shape of the grid the pattern was decoded from
    pub shape: Shape,
    /// Name of the palette used for decoding
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub palette: Option<String>,
    pub pixels: Vec<PixelMatch>,
}

impl Pattern {
    pub fn new(shape: Shape, pixels: Vec<PixelMatch>) -> Self {
        Self { shape, palette: None, pixels }
    }

    /// Record the palette name used for decoding.
    pub fn with_palette(mut self, name: impl Into<String>) -> Self {
        self.palette = Some(name.into());
        self
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn matched_count(&self) -> usize {
        self.pixels.iter().filter(|p| p.is_match()).count()
    }

    pub fn unmatched_count(&self) -> usize {
        self.len() - self.matched_count()
    }

    /// True when every pixel matched a key, i.e. the pattern can be encoded.
    pub fn is_complete(&self) -> bool {
        self.pixels.iter().all(PixelMatch::is_match)
    }

    /// Pixel count per key, in order of first appearance
    pub fn key_counts(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for (key, _) in self.pixels.iter().filter_map(PixelMatch::as_pair) {
            match counts.iter_mut().find(|(k, _)| k == key) {
                Some((_, n)) => *n += 1,
                None => counts.push((key.to_string(), 1)),
            }
        }
        counts
    }

    /// Distinct `(key, index)` pairs that `palette` cannot resolve, in order
    /// of first appearance. Empty when the pattern can be replayed against it.
    pub fn missing_entries(&self, palette: &Palette) -> Vec<(String, usize)> {
        let mut missing: Vec<(String, usize)> = Vec::new();
        for (key, index) in self.pixels.iter().filter_map(PixelMatch::as_pair) {
            if palette.lookup(key, index).is_none()
                && !missing.iter().any(|(k, i)| k == key && *i == index)
            {
                missing.push((key.to_string(), index));
            }
        }
        missing
    }

    /// Warnings about unmatched pixels.
    pub fn warnings(&self) -> Vec<Warning> {
        let unmatched = self.unmatched_count();
        if unmatched == 0 {
            return Vec::new();
        }
        let width = self.shape.width.max(1);
        let first = self.pixels.iter().position(|p| !p.is_match()).unwrap_or(0);
        vec![Warning::new(format!(
            "{} of {} pixels did not match any palette key (first at row {}, column {})",
            unmatched,
            self.len(),
            first / width,
            first % width
        ))]
    }

    /// Check that the pixel count agrees with the shape.
    pub fn validate(&self) -> Result<(), PatternError> {
        let expected = self.shape.pixel_count().ok_or(PatternError::TooLarge(self.shape))?;
        if self.pixels.len() != expected {
            return Err(PatternError::LengthMismatch {
                shape: self.shape,
                expected,
                actual: self.pixels.len(),
            });
        }
        Ok(())
    }

    pub fn to_json_string(&self) -> Result<String, PatternError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self, PatternError> {
        let pattern: Pattern = serde_json::from_str(s)?;
        pattern.validate()?;
        Ok(pattern)
    }

    /// Write the pattern as JSON, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), PatternError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_json_string()?)?;
        Ok(())
    }

    /// Read a pattern written by [`save`](Self::save).
    pub fn load(path: &Path) -> Result<Self, PatternError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}
