//! Image to pattern classification
//!
//! Every pixel is compared against the palette by exact RGB equality; alpha
//! is ignored. A key is a candidate for a pixel only when *all* of its
//! variants equal the pixel, so only keys whose variants are identical can
//! ever match. The first candidate in palette order wins and the recorded
//! index is the first variant equal to the pixel. Pixels without a candidate
//! become [`PixelMatch::NoMatch`]; decoding itself never fails.

use crate::color::Color;
use crate::grid::PixelGrid;
use crate::palette::Palette;
use crate::pattern::{Pattern, PixelMatch};
use std::collections::HashMap;

/// Classify every pixel of `grid` against `palette`.
///
/// The returned pattern has exactly `height * width` entries in row-major
/// order and records the grid's shape for re-encoding.
///
/// # Examples
///
/// ```
/// use palswap::decoder::decode;
/// use palswap::grid::PixelGrid;
/// use palswap::palette::{Palette, PaletteConfig};
/// use palswap::pattern::PixelMatch;
///
/// let palette = Palette::build(
///     "theme",
///     &PaletteConfig::new()
///         .with("dark", &["#333333", "#333333"])
///         .with("light", &["#555555", "#555555"]),
/// )
/// .unwrap();
/// let grid = PixelGrid::from_rows(&[vec![[0x33u8, 0x33, 0x33], [0x55, 0x55, 0x55]]]).unwrap();
///
/// let pattern = decode(&grid, &palette);
/// assert_eq!(
///     pattern.pixels,
///     vec![PixelMatch::matched("dark", 0), PixelMatch::matched("light", 0)]
/// );
/// ```
pub fn decode(grid: &PixelGrid, palette: &Palette) -> Pattern {
    // Images tend to reuse a handful of colors
    let mut cache: HashMap<[u8; 3], PixelMatch> = HashMap::new();

    let pixels = grid
        .rgb_pixels()
        .map(|rgb| {
            cache
                .entry(rgb)
                .or_insert_with(|| {
                    let [r, g, b] = rgb;
                    classify(Color::from_rgb(r, g, b), palette)
                })
                .clone()
        })
        .collect();

    Pattern::new(grid.shape(), pixels).with_palette(palette.name())
}

/// Classify a single color against `palette`.
pub fn classify(color: Color, palette: &Palette) -> PixelMatch {
    palette
        .iter()
        .find(|(_, variants)| variants.iter().all(|v| v.rgb_eq(color)))
        .and_then(|(key, variants)| {
            variants.iter().position(|v| v.rgb_eq(color)).map(|i| PixelMatch::matched(key, i))
        })
        .unwrap_or(PixelMatch::NoMatch)
}
