//! Recolor command implementation
//!
//! Images are independent, so they are processed on a rayon pool. Both
//! palettes are built once and shared read-only by every job. Output paths
//! are resolved before any job starts and must be distinct.

use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::PalswapConfig;
use crate::encoder::recolor;
use crate::output::{load_grid, save_grid};
use crate::palette::Palette;

use super::{
    output_path, resolve_palette, DEFAULT_PALETTE, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS,
};

/// Outcome of recoloring one image
struct RecolorOutcome {
    input: PathBuf,
    result: Result<PathBuf, String>,
}

/// Execute the recolor command
pub fn run_recolor(
    inputs: &[PathBuf],
    to_spec: &str,
    output: Option<&Path>,
    jobs: Option<usize>,
    quiet: bool,
    config: &PalswapConfig,
) -> ExitCode {
    let from_spec = config.paths.palette.as_deref().unwrap_or(DEFAULT_PALETTE);
    let (from, to) = match (resolve_palette(from_spec), resolve_palette(to_spec)) {
        (Ok(from), Ok(to)) => (from, to),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = jobs {
        if n == 0 {
            eprintln!("Error: --jobs must be at least 1");
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
        builder = builder.num_threads(n);
    }
    let pool = match builder.build() {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("Error: Failed to start worker pool: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let single = inputs.len() == 1;
    let targets: Vec<(&PathBuf, PathBuf)> = inputs
        .iter()
        .map(|input| (input, output_path(input, to.name(), "png", output, config, single)))
        .collect();
    if let Some((first, second, target)) = find_collision(&targets) {
        eprintln!(
            "Error: '{}' and '{}' would both be written to '{}'",
            first.display(),
            second.display(),
            target.display()
        );
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let outcomes: Vec<RecolorOutcome> = pool.install(|| {
        targets
            .par_iter()
            .map(|(input, target)| RecolorOutcome {
                input: (*input).clone(),
                result: recolor_file(input, target, &from, &to, config.encode.scale)
                    .map(|()| target.clone()),
            })
            .collect()
    });

    let mut failures = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(path) => {
                if !quiet {
                    println!("Saved: {}", path.display());
                }
            }
            Err(e) => {
                failures += 1;
                eprintln!("Error: {}: {}", outcome.input.display(), e);
            }
        }
    }

    if failures > 0 {
        eprintln!("{} of {} images failed", failures, outcomes.len());
        return ExitCode::from(EXIT_ERROR);
    }
    ExitCode::from(EXIT_SUCCESS)
}

/// First pair of inputs that map to the same output file.
fn find_collision<'a>(
    targets: &'a [(&'a PathBuf, PathBuf)],
) -> Option<(&'a Path, &'a Path, &'a Path)> {
    let mut seen: HashMap<&Path, &Path> = HashMap::new();
    for (input, target) in targets {
        if let Some(previous) = seen.insert(target.as_path(), input.as_path()) {
            return Some((previous, input.as_path(), target.as_path()));
        }
    }
    None
}

fn recolor_file(
    input: &Path,
    target: &Path,
    from: &Palette,
    to: &Palette,
    scale: u32,
) -> Result<(), String> {
    let grid = load_grid(input).map_err(|e| e.to_string())?;
    let recolored = recolor(&grid, from, to).map_err(|e| e.to_string())?;
    save_grid(&recolored, target, scale).map_err(|e| e.to_string())
}
