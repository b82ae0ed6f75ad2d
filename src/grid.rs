//! Pixel grids and their shapes
//!
//! A [`PixelGrid`] is a row-major block of channel bytes with a known
//! [`Shape`]. Source grids are RGB or RGBA; grids produced by the encoder
//! carry alpha first (`[A, R, G, B]`).

use image::{DynamicImage, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error type for grid construction and conversion
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Pixels must have 3 or 4 channels
    #[error("unsupported channel depth {0}, expected 3 or 4")]
    InvalidChannels(usize),
    /// Byte buffer does not match the declared shape
    #[error("pixel data has {actual} bytes, shape {shape} needs {expected}")]
    DataLength { shape: Shape, expected: usize, actual: usize },
    /// Nested rows are not all the same width or depth
    #[error("row {row} has {actual} values where {expected} were expected")]
    Ragged { row: usize, expected: usize, actual: usize },
    /// Dimensions do not fit an image buffer
    #[error("grid {0} is too large for an image")]
    TooLarge(Shape),
}

/// `(height, width, channels)` of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    pub height: usize,
    pub width: usize,
    pub channels: usize,
}

impl Shape {
    pub const fn new(height: usize, width: usize, channels: usize) -> Self {
        Self { height, width, channels }
    }

    /// Number of pixels (`height * width`), `None` on overflow
    pub const fn pixel_count(&self) -> Option<usize> {
        self.height.checked_mul(self.width)
    }

    /// Number of channel bytes (`height * width * channels`), `None` on overflow
    pub const fn byte_len(&self) -> Option<usize> {
        match self.pixel_count() {
            Some(pixels) => pixels.checked_mul(self.channels),
            None => None,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.height, self.width, self.channels)
    }
}

/// Byte order of the channels inside each pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelLayout {
    /// `[R, G, B]`
    Rgb,
    /// `[R, G, B, A]`
    Rgba,
    /// `[A, R, G, B]`, the layout written by the encoder
    Argb,
}

impl PixelLayout {
    pub const fn channels(self) -> usize {
        match self {
            PixelLayout::Rgb => 3,
            PixelLayout::Rgba | PixelLayout::Argb => 4,
        }
    }

    /// Index of the red byte within a pixel
    const fn rgb_offset(self) -> usize {
        match self {
            PixelLayout::Argb => 1,
            PixelLayout::Rgb | PixelLayout::Rgba => 0,
        }
    }

    fn for_channels(channels: usize) -> Result<Self, GridError> {
        match channels {
            3 => Ok(PixelLayout::Rgb),
            4 => Ok(PixelLayout::Rgba),
            n => Err(GridError::InvalidChannels(n)),
        }
    }
}

/// A 2-D grid of pixels stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    shape: Shape,
    layout: PixelLayout,
    data: Vec<u8>,
}

impl PixelGrid {
    /// Wrap raw RGB (3 channels) or RGBA (4 channels) bytes.
    pub fn from_raw(
        height: usize,
        width: usize,
        channels: usize,
        data: Vec<u8>,
    ) -> Result<Self, GridError> {
        let layout = PixelLayout::for_channels(channels)?;
        let shape = Shape::new(height, width, channels);
        let expected = shape.byte_len().ok_or(GridError::TooLarge(shape))?;
        if data.len() != expected {
            return Err(GridError::DataLength { shape, expected, actual: data.len() });
        }
        Ok(Self { shape, layout, data })
    }

    /// Build from nested rows of pixels, e.g. `[[[0x33, 0x33, 0x33], ...], ...]`.
    ///
    /// Every row must have the same number of pixels and every pixel the same
    /// number of channels (3 or 4).
    pub fn from_rows<P: AsRef<[u8]>>(rows: &[Vec<P>]) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        let channels = rows
            .first()
            .and_then(|r| r.first())
            .map(|p| p.as_ref().len())
            .unwrap_or(3);
        PixelLayout::for_channels(channels)?;
        let shape = Shape::new(height, width, channels);
        let capacity = shape.byte_len().ok_or(GridError::TooLarge(shape))?;

        let mut data = Vec::with_capacity(capacity);
        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(GridError::Ragged { row: y, expected: width, actual: row.len() });
            }
            for pixel in row {
                let pixel = pixel.as_ref();
                if pixel.len() != channels {
                    return Err(GridError::Ragged { row: y, expected: channels, actual: pixel.len() });
                }
                data.extend_from_slice(pixel);
            }
        }

        Self::from_raw(height, width, channels, data)
    }

    /// A zero-filled grid in the given layout.
    pub fn zeroed(height: usize, width: usize, layout: PixelLayout) -> Result<Self, GridError> {
        let shape = Shape::new(height, width, layout.channels());
        let len = shape.byte_len().ok_or(GridError::TooLarge(shape))?;
        Ok(Self { shape, layout, data: vec![0; len] })
    }

    /// Convert a decoded image. RGB8 images keep 3 channels, everything else
    /// is converted to RGBA8.
    pub fn from_image(image: &DynamicImage) -> Self {
        match image {
            DynamicImage::ImageRgb8(rgb) => {
                let (w, h) = rgb.dimensions();
                Self {
                    shape: Shape::new(h as usize, w as usize, 3),
                    layout: PixelLayout::Rgb,
                    data: rgb.as_raw().clone(),
                }
            }
            other => {
                let rgba = other.to_rgba8();
                let (w, h) = rgba.dimensions();
                Self {
                    shape: Shape::new(h as usize, w as usize, 4),
                    layout: PixelLayout::Rgba,
                    data: rgba.into_raw(),
                }
            }
        }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    pub fn height(&self) -> usize {
        self.shape.height
    }

    pub fn width(&self) -> usize {
        self.shape.width
    }

    fn offset(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.shape.height && col < self.shape.width,
            "pixel ({}, {}) out of bounds for grid {}",
            row,
            col,
            self.shape
        );
        (row * self.shape.width + col) * self.shape.channels
    }

    /// Channel bytes of the pixel at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the grid.
    pub fn pixel(&self, row: usize, col: usize) -> &[u8] {
        let start = self.offset(row, col);
        &self.data[start..start + self.shape.channels]
    }

    /// Overwrite the pixel at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the grid or `bytes` does not
    /// match the channel depth.
    pub fn set_pixel(&mut self, row: usize, col: usize, bytes: &[u8]) {
        let start = self.offset(row, col);
        let channels = self.shape.channels;
        self.data[start..start + channels].copy_from_slice(bytes);
    }

    /// Red, green and blue bytes of a pixel, whatever the layout.
    pub fn rgb_at(&self, row: usize, col: usize) -> [u8; 3] {
        rgb_of(self.pixel(row, col), self.layout)
    }

    /// Row-major iterator over the RGB bytes of every pixel.
    pub fn rgb_pixels(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        let layout = self.layout;
        self.data.chunks_exact(self.shape.channels).map(move |p| rgb_of(p, layout))
    }

    /// Convert to an RGBA image buffer. RGB grids become opaque; ARGB grids
    /// are reordered.
    pub fn to_rgba_image(&self) -> Result<RgbaImage, GridError> {
        let w = u32::try_from(self.shape.width).map_err(|_| GridError::TooLarge(self.shape))?;
        let h = u32::try_from(self.shape.height).map_err(|_| GridError::TooLarge(self.shape))?;

        let mut image = RgbaImage::new(w, h);
        for (i, p) in self.data.chunks_exact(self.shape.channels).enumerate() {
            let rgba = match self.layout {
                PixelLayout::Rgb => [p[0], p[1], p[2], 255],
                PixelLayout::Rgba => [p[0], p[1], p[2], p[3]],
                PixelLayout::Argb => [p[1], p[2], p[3], p[0]],
            };
            let x = (i % self.shape.width) as u32;
            let y = (i / self.shape.width) as u32;
            image.put_pixel(x, y, Rgba(rgba));
        }
        Ok(image)
    }
}

fn rgb_of(pixel: &[u8], layout: PixelLayout) -> [u8; 3] {
    let o = layout.rgb_offset();
    [pixel[o], pixel[o + 1], pixel[o + 2]]
}
