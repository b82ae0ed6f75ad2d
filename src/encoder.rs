//! Pattern to image rendering
//!
//! Encoding replays a pattern against a palette: element `i` becomes the
//! pixel at row `i / width`, column `i % width`, colored with
//! `palette[key][index]`. Output grids always have four channels in
//! `[A, R, G, B]` order with alpha forced to 255.

use crate::decoder::decode;
use crate::grid::{PixelGrid, PixelLayout, Shape};
use crate::palette::Palette;
use crate::pattern::{Pattern, PixelMatch};
use thiserror::Error;

/// Alpha written for every encoded pixel
pub const OPAQUE: u8 = 255;

/// Error type for encoding failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Pattern length is not `height * width`
    #[error("pattern has {actual} pixels but shape {shape} needs {expected}")]
    ShapeMismatch { shape: Shape, expected: usize, actual: usize },
    /// A pixel was never classified
    #[error("pixel at row {row}, column {col} did not match any palette key and cannot be encoded")]
    UnresolvedPixel { row: usize, col: usize },
    /// The palette has no color for a pattern entry
    #[error("palette '{palette}' has no color for key '{key}' variant {index}")]
    Configuration { palette: String, key: String, index: usize },
    /// `height * width` overflows
    #[error("shape {0} is too large to encode")]
    TooLarge(Shape),
}

/// Render `pattern` with `palette` into a `(height, width, 4)` grid.
///
/// Only `shape.height` and `shape.width` are used; the output channel depth
/// is always 4. The length check happens before any pixel is written, and
/// no grid is returned unless every element was rendered.
///
/// # Examples
///
/// ```
/// use palswap::encoder::encode;
/// use palswap::grid::Shape;
/// use palswap::palette::{Palette, PaletteConfig};
/// use palswap::pattern::PixelMatch;
///
/// let palette = Palette::build("p", &PaletteConfig::new().with("dark", &["#333333"])).unwrap();
/// let grid = encode(&[PixelMatch::matched("dark", 0)], &palette, Shape::new(1, 1, 4)).unwrap();
/// assert_eq!(grid.pixel(0, 0), &[255, 0x33, 0x33, 0x33]);
/// ```
pub fn encode(
    pattern: &[PixelMatch],
    palette: &Palette,
    shape: Shape,
) -> Result<PixelGrid, EncodeError> {
    let expected = shape.pixel_count().ok_or(EncodeError::TooLarge(shape))?;
    if pattern.len() != expected {
        return Err(EncodeError::ShapeMismatch { shape, expected, actual: pattern.len() });
    }

    let mut grid = PixelGrid::zeroed(shape.height, shape.width, PixelLayout::Argb)
        .map_err(|_| EncodeError::TooLarge(shape))?;
    for (i, element) in pattern.iter().enumerate() {
        let (row, col) = (i / shape.width, i % shape.width);
        let (key, index) = match element {
            PixelMatch::Matched { key, index } => (key, *index),
            PixelMatch::NoMatch => return Err(EncodeError::UnresolvedPixel { row, col }),
        };
        let color = palette.lookup(key, index).ok_or_else(|| EncodeError::Configuration {
            palette: palette.name().to_string(),
            key: key.clone(),
            index,
        })?;
        let [r, g, b] = color.to_rgb_array();
        grid.set_pixel(row, col, &[OPAQUE, r, g, b]);
    }

    Ok(grid)
}

/// Encode a pattern with the shape it was decoded from.
pub fn encode_pattern(pattern: &Pattern, palette: &Palette) -> Result<PixelGrid, EncodeError> {
    encode(&pattern.pixels, palette, pattern.shape)
}

/// Decode `grid` against `from` and re-render it with `to`.
///
/// Fails with [`EncodeError::UnresolvedPixel`] if any pixel has no match in
/// `from`, and with [`EncodeError::Configuration`] if `to` lacks a key or
/// variant used by the pattern.
pub fn recolor(grid: &PixelGrid, from: &Palette, to: &Palette) -> Result<PixelGrid, EncodeError> {
    let pattern = decode(grid, from);
    encode(&pattern.pixels, to, grid.shape())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::PaletteConfig;

    fn theme() -> Palette {
        Palette::build(
            "theme",
            &PaletteConfig::new()
                .with("dark", &["#333333", "#333333"])
                .with("light", &["#555555", "#555555"]),
        )
        .unwrap()
    }

    #[test]
    fn test_encode_dark_light_scenario() {
        let pattern = [PixelMatch::matched("dark", 0), PixelMatch::matched("light", 0)];
        let grid = encode(&pattern, &theme(), Shape::new(1, 2, 4)).unwrap();
        assert_eq!(grid.shape(), Shape::new(1, 2, 4));
        assert_eq!(grid.pixel(0, 0), &[255, 0x33, 0x33, 0x33]);
        assert_eq!(grid.pixel(0, 1), &[255, 0x55, 0x55, 0x55]);
    }

    #[test]
    fn test_encode_unravels_row_major() {
        let pattern = [
            PixelMatch::matched("dark", 0),
            PixelMatch::matched("dark", 1),
            PixelMatch::matched("light", 0),
            PixelMatch::matched("light", 1),
            PixelMatch::matched("dark", 0),
            PixelMatch::matched("light", 0),
        ];
        let grid = encode(&pattern, &theme(), Shape::new(2, 3, 3)).unwrap();
        assert_eq!(grid.shape(), Shape::new(2, 3, 4));
        assert_eq!(grid.rgb_at(0, 2), [0x55, 0x55, 0x55]);
        assert_eq!(grid.rgb_at(1, 0), [0x55, 0x55, 0x55]);
        assert_eq!(grid.rgb_at(1, 1), [0x33, 0x33, 0x33]);
    }

    #[test]
    fn test_encode_no_match_is_unresolved() {
        let err = encode(&[PixelMatch::NoMatch], &theme(), Shape::new(1, 1, 4)).unwrap_err();
        assert_eq!(err, EncodeError::UnresolvedPixel { row: 0, col: 0 });

        let pattern = [PixelMatch::matched("dark", 0), PixelMatch::NoMatch];
        let err = encode(&pattern, &theme(), Shape::new(2, 1, 4)).unwrap_err();
        assert_eq!(err, EncodeError::UnresolvedPixel { row: 1, col: 0 });
    }

    #[test]
    fn test_encode_shape_mismatch() {
        let pattern = vec![PixelMatch::matched("dark", 0); 3];
        let err = encode(&pattern, &theme(), Shape::new(1, 2, 4)).unwrap_err();
        assert_eq!(
            err,
            EncodeError::ShapeMismatch { shape: Shape::new(1, 2, 4), expected: 2, actual: 3 }
        );

        let err = encode(&pattern[..1], &theme(), Shape::new(1, 2, 4)).unwrap_err();
        assert!(matches!(err, EncodeError::ShapeMismatch { actual: 1, .. }));
    }

    #[test]
    fn test_encode_oversized_shape() {
        let shape = Shape::new(usize::MAX, 2, 4);
        assert_eq!(encode(&[], &theme(), shape).unwrap_err(), EncodeError::TooLarge(shape));
    }

    #[test]
    fn test_encode_missing_palette_entry_is_configuration_error() {
        let err =
            encode(&[PixelMatch::matched("accent", 0)], &theme(), Shape::new(1, 1, 4)).unwrap_err();
        assert_eq!(
            err,
            EncodeError::Configuration {
                palette: "theme".to_string(),
                key: "accent".to_string(),
                index: 0
            }
        );

        let err =
            encode(&[PixelMatch::matched("dark", 2)], &theme(), Shape::new(1, 1, 4)).unwrap_err();
        assert!(matches!(err, EncodeError::Configuration { index: 2, .. }));
    }

    #[test]
    fn test_decode_encode_preserves_rgb_and_forces_alpha() {
        let source = PixelGrid::from_rows(&[
            vec![[0x33u8, 0x33, 0x33, 0], [0x55, 0x55, 0x55, 10]],
            vec![[0x55, 0x55, 0x55, 200], [0x33, 0x33, 0x33, 255]],
        ])
        .unwrap();
        let palette = theme();
        let pattern = decode(&source, &palette);
        let out = encode(&pattern.pixels, &palette, source.shape()).unwrap();

        for row in 0..2 {
            for col in 0..2 {
                assert_eq!(out.rgb_at(row, col), source.rgb_at(row, col));
                assert_eq!(out.pixel(row, col)[0], 255);
            }
        }
    }

    #[test]
    fn test_cross_palette_replay_keeps_structure() {
        let source = PixelGrid::from_rows(&[
            vec![[0x33u8, 0x33, 0x33], [0x55, 0x55, 0x55], [0x33, 0x33, 0x33]],
        ])
        .unwrap();
        let target = Palette::build(
            "dracula",
            &PaletteConfig::new()
                .with("dark", &["#282a36", "#282a36"])
                .with("light", &["#f8f8f2", "#f8f8f2"]),
        )
        .unwrap();

        let out = recolor(&source, &theme(), &target).unwrap();
        assert_eq!(out.rgb_at(0, 0), [0x28, 0x2a, 0x36]);
        assert_eq!(out.rgb_at(0, 1), [0xf8, 0xf8, 0xf2]);
        assert_eq!(out.rgb_at(0, 0), out.rgb_at(0, 2));
        assert_ne!(out.rgb_at(0, 0), out.rgb_at(0, 1));
    }

    #[test]
    fn test_recolor_refuses_unmatched_pixels() {
        let source = PixelGrid::from_rows(&[vec![[0x33u8, 0x33, 0x33], [1, 2, 3]]]).unwrap();
        let err = recolor(&source, &theme(), &theme()).unwrap_err();
        assert_eq!(err, EncodeError::UnresolvedPixel { row: 0, col: 1 });
    }

    #[test]
    fn test_encode_pattern_uses_recorded_shape() {
        let pattern = Pattern::new(Shape::new(1, 1, 3), vec![PixelMatch::matched("light", 1)]);
        let grid = encode_pattern(&pattern, &theme()).unwrap();
        assert_eq!(grid.pixel(0, 0), &[255, 0x55, 0x55, 0x55]);
    }
}
