//! palswap - Library for palette-based image theming
//!
//! This library provides functionality to:
//! - Classify every pixel of an image against a named color palette
//! - Store the classification as a palette-independent pattern
//! - Re-render a pattern with a different palette of the same shape

pub mod cli;
pub mod color;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod grid;
pub mod output;
pub mod palette;
pub mod palettes;
pub mod pattern;
