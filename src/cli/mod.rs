//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod decode;
mod encode;
mod info;
mod recolor;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::loader::merge_cli_overrides;
use crate::config::{load_config, CliOverrides, PalswapConfig, MAX_SCALE};
use crate::output::generate_output_path;
use crate::palette::{load_palette, Palette};
use crate::palettes;

pub use info::PaletteAction;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Palette used when neither the command line nor palswap.toml names one
pub(crate) const DEFAULT_PALETTE: &str = "@default";

/// palswap - Classify images against a palette and re-render them with another
#[derive(Parser)]
#[command(name = "palswap")]
#[command(about = "palswap - Classify images against a palette and re-render them with another")]
#[command(version)]
pub struct Cli {
    /// Path to palswap.toml (default: search upward, then ~/.config/palswap)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode an image into a pattern file
    Decode {
        /// Input image
        input: PathBuf,

        /// Palette JSON file or @builtin name
        #[arg(short, long)]
        palette: Option<String>,

        /// Output pattern file (default: {input}_pattern.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fail if any pixel does not match a palette key
        #[arg(long)]
        strict: bool,

        /// Only print warnings and errors
        #[arg(short, long)]
        quiet: bool,
    },
    /// Render a pattern file with a palette
    Encode {
        /// Input pattern file
        input: PathBuf,

        /// Palette JSON file or @builtin name
        #[arg(short, long)]
        palette: Option<String>,

        /// Output PNG (default: {input}_{palette}.png)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Scale output by integer factor
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_SCALE as i64))]
        scale: Option<u32>,

        /// Only print warnings and errors
        #[arg(short, long)]
        quiet: bool,
    },
    /// Decode images with one palette and render them with another
    Recolor {
        /// Input images
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Palette the images are drawn with (JSON file or @builtin)
        #[arg(long)]
        from: Option<String>,

        /// Palette to render with (JSON file or @builtin)
        #[arg(long)]
        to: String,

        /// Output file or directory.
        /// If omitted: {input}_{palette}.png
        /// If directory (ends with /): dir/{input}.png
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Scale output by integer factor
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_SCALE as i64))]
        scale: Option<u32>,

        /// Number of images processed in parallel (default: all cores)
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Only print warnings and errors
        #[arg(short, long)]
        quiet: bool,
    },
    /// List and inspect built-in palettes
    Palettes {
        #[command(subcommand)]
        action: PaletteAction,
    },
    /// Show statistics for a pattern file
    Inspect {
        /// Input pattern file
        input: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Resolve a palette argument: `@name` for a built-in, otherwise a JSON file.
pub(crate) fn resolve_palette(spec: &str) -> Result<Palette, String> {
    match spec.strip_prefix('@') {
        Some(name) => {
            let config = palettes::get_builtin(name).ok_or_else(|| {
                let names: Vec<String> =
                    palettes::list_builtins().iter().map(|n| format!("@{}", n)).collect();
                format!("Unknown palette '{}'. Available: {}", spec, names.join(", "))
            })?;
            Palette::build(name, &config).map_err(|e| format!("Invalid palette '{}': {}", spec, e))
        }
        None => load_palette(Path::new(spec))
            .map_err(|e| format!("Failed to load palette '{}': {}", spec, e)),
    }
}

/// Load palswap.toml and apply command-line overrides.
fn load_effective_config(
    path: Option<&Path>,
    overrides: &CliOverrides,
) -> Result<PalswapConfig, String> {
    let mut config = load_config(path).map_err(|e| e.to_string())?;
    merge_cli_overrides(&mut config, overrides);
    Ok(config)
}

/// Output path for `input`, honoring `-o` first and `paths.out` second.
pub(crate) fn output_path(
    input: &Path,
    tag: &str,
    extension: &str,
    output: Option<&Path>,
    config: &PalswapConfig,
    is_single_input: bool,
) -> PathBuf {
    match (output, config.paths.out.as_deref()) {
        (Some(o), _) => generate_output_path(input, tag, extension, Some(o), is_single_input),
        (None, Some(dir)) => {
            let default = generate_output_path(input, tag, extension, None, is_single_input);
            dir.join(default.file_name().unwrap_or_default())
        }
        (None, None) => generate_output_path(input, tag, extension, None, is_single_input),
    }
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Decode { input, palette, output, strict, quiet } => {
            let overrides =
                CliOverrides { palette, strict: strict.then_some(true), ..Default::default() };
            match load_effective_config(config_path, &overrides) {
                Ok(config) => decode::run_decode(&input, output.as_deref(), quiet, &config),
                Err(e) => config_failure(&e),
            }
        }
        Commands::Encode { input, palette, output, scale, quiet } => {
            let overrides = CliOverrides { palette, scale, ..Default::default() };
            match load_effective_config(config_path, &overrides) {
                Ok(config) => encode::run_encode(&input, output.as_deref(), quiet, &config),
                Err(e) => config_failure(&e),
            }
        }
        Commands::Recolor { inputs, from, to, output, scale, jobs, quiet } => {
            let overrides = CliOverrides { palette: from, scale, ..Default::default() };
            match load_effective_config(config_path, &overrides) {
                Ok(config) => {
                    recolor::run_recolor(&inputs, &to, output.as_deref(), jobs, quiet, &config)
                }
                Err(e) => config_failure(&e),
            }
        }
        Commands::Palettes { action } => info::run_palettes(action),
        Commands::Inspect { input, json } => info::run_inspect(&input, json),
    }
}

fn config_failure(message: &str) -> ExitCode {
    eprintln!("Error: {}", message);
    ExitCode::from(EXIT_INVALID_ARGS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_recolor_arguments() {
        let cli = Cli::parse_from([
            "palswap", "recolor", "a.png", "b.png", "--from", "@default", "--to", "@nord", "-j",
            "2",
        ]);
        match cli.command {
            Commands::Recolor { inputs, from, to, jobs, .. } => {
                assert_eq!(inputs, vec![PathBuf::from("a.png"), PathBuf::from("b.png")]);
                assert_eq!(from.as_deref(), Some("@default"));
                assert_eq!(to, "@nord");
                assert_eq!(jobs, Some(2));
            }
            _ => panic!("expected recolor"),
        }
    }

    #[test]
    fn test_scale_is_range_checked() {
        let result =
            Cli::try_parse_from(["palswap", "encode", "p.json", "--scale", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_builtin_palette() {
        let palette = resolve_palette("@nord").unwrap();
        assert_eq!(palette.name(), "nord");

        let err = resolve_palette("@nope").unwrap_err();
        assert!(err.contains("Unknown palette '@nope'"));
        assert!(err.contains("@default"));
    }

    #[test]
    fn test_resolve_palette_file_error() {
        let err = resolve_palette("missing/theme.json").unwrap_err();
        assert!(err.starts_with("Failed to load palette 'missing/theme.json'"));
    }

    #[test]
    fn test_output_path_prefers_flag_then_config_dir() {
        let mut config = PalswapConfig::default();
        let input = Path::new("img/bg.png");

        assert_eq!(
            output_path(input, "nord", "png", None, &config, true),
            PathBuf::from("img/bg_nord.png")
        );

        config.paths.out = Some(PathBuf::from("dist"));
        assert_eq!(
            output_path(input, "nord", "png", None, &config, true),
            PathBuf::from("dist/bg_nord.png")
        );
        assert_eq!(
            output_path(input, "nord", "png", Some(Path::new("x.png")), &config, true),
            PathBuf::from("x.png")
        );
    }
}
