//! Decode command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::config::PalswapConfig;
use crate::decoder::decode;
use crate::output::load_grid;

use super::{output_path, resolve_palette, DEFAULT_PALETTE, EXIT_ERROR, EXIT_SUCCESS};

/// Execute the decode command
pub fn run_decode(
    input: &Path,
    output: Option<&Path>,
    quiet: bool,
    config: &PalswapConfig,
) -> ExitCode {
    let palette_spec = config.paths.palette.as_deref().unwrap_or(DEFAULT_PALETTE);
    let palette = match resolve_palette(palette_spec) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let grid = match load_grid(input) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Error: Cannot open image '{}': {}", input.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let pattern = decode(&grid, &palette);

    for warning in pattern.warnings() {
        eprintln!("Warning: {}", warning.message);
    }
    if config.decode.strict && !pattern.is_complete() {
        eprintln!("Error: Unmatched pixels in strict mode");
        return ExitCode::from(EXIT_ERROR);
    }

    let output_path = output_path(input, "pattern", "json", output, config, true);
    if let Err(e) = pattern.save(&output_path) {
        eprintln!("Error: Failed to save '{}': {}", output_path.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }

    if !quiet {
        println!(
            "Decoded {} ({}x{}) with palette '{}'",
            input.display(),
            grid.width(),
            grid.height(),
            palette.name()
        );
        println!("  matched:   {}/{}", pattern.matched_count(), pattern.len());
        for (key, count) in pattern.key_counts() {
            println!("    {:<12} {}", key, count);
        }
        println!("Saved: {}", output_path.display());
    }

    ExitCode::from(EXIT_SUCCESS)
}
