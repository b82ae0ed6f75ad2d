//! Encode command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::config::PalswapConfig;
use crate::encoder::encode_pattern;
use crate::output::save_grid;
use crate::pattern::Pattern;

use super::{output_path, resolve_palette, DEFAULT_PALETTE, EXIT_ERROR, EXIT_SUCCESS};

/// Execute the encode command
pub fn run_encode(
    input: &Path,
    output: Option<&Path>,
    quiet: bool,
    config: &PalswapConfig,
) -> ExitCode {
    let pattern = match Pattern::load(input) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: Cannot read pattern '{}': {}", input.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let palette_spec = config.paths.palette.as_deref().unwrap_or(DEFAULT_PALETTE);
    let palette = match resolve_palette(palette_spec) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let missing = pattern.missing_entries(&palette);
    if !missing.is_empty() {
        eprintln!(
            "Error: Palette '{}' cannot render this pattern; missing entries:",
            palette.name()
        );
        for (key, index) in &missing {
            match palette.variants(key) {
                Some(v) => eprintln!("  {}[{}] (key has {} variants)", key, index, v.len()),
                None => eprintln!("  {}[{}] (no such key)", key, index),
            }
        }
        return ExitCode::from(EXIT_ERROR);
    }

    let grid = match encode_pattern(&pattern, &palette) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Error: {}", e);
            if !pattern.is_complete() {
                eprintln!("Hint: decode the source with a palette that covers every pixel");
            }
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let output_path = output_path(input, palette.name(), "png", output, config, true);
    if let Err(e) = save_grid(&grid, &output_path, config.encode.scale) {
        eprintln!("Error: Failed to save '{}': {}", output_path.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }

    if !quiet {
        println!("Saved: {}", output_path.display());
    }
    ExitCode::from(EXIT_SUCCESS)
}
