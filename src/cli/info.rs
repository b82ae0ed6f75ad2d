//! Info command implementations (palettes, inspect)

use clap::Subcommand;
use serde_json::json;
use std::path::Path;
use std::process::ExitCode;

use crate::palettes;
use crate::pattern::Pattern;

use super::{resolve_palette, EXIT_ERROR, EXIT_SUCCESS};

#[derive(Subcommand)]
pub enum PaletteAction {
    /// List all available built-in palettes
    List,
    /// Show the keys and colors of a palette
    Show {
        /// Built-in name (with or without @) or a palette JSON file
        name: String,

        /// Output the palette as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Execute the palettes command
pub fn run_palettes(action: PaletteAction) -> ExitCode {
    match action {
        PaletteAction::List => {
            println!("Built-in palettes:");
            for name in palettes::list_builtins() {
                println!("  @{}", name);
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        PaletteAction::Show { name, json } => {
            let spec = if palettes::get_builtin(&name).is_some() {
                format!("@{}", name)
            } else {
                name
            };
            let palette = match resolve_palette(&spec) {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::from(EXIT_ERROR);
                }
            };

            if json {
                match serde_json::to_string_pretty(&palette.to_config()) {
                    Ok(s) => println!("{}", s),
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        return ExitCode::from(EXIT_ERROR);
                    }
                }
            } else {
                println!("Palette: {}", palette.name());
                println!();
                for (key, colors) in palette.iter() {
                    let hexes: Vec<String> = colors.iter().map(|c| c.to_hex()).collect();
                    println!("  {:<12} {}", key, hexes.join(" "));
                }
            }
            ExitCode::from(EXIT_SUCCESS)
        }
    }
}

/// Execute the inspect command
pub fn run_inspect(input: &Path, json_output: bool) -> ExitCode {
    let pattern = match Pattern::load(input) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: Cannot read pattern '{}': {}", input.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let key_counts = pattern.key_counts();

    if json_output {
        let keys: serde_json::Map<String, serde_json::Value> =
            key_counts.iter().map(|(k, n)| (k.clone(), json!(n))).collect();
        let summary = json!({
            "shape": pattern.shape,
            "palette": pattern.palette,
            "pixels": pattern.len(),
            "matched": pattern.matched_count(),
            "unmatched": pattern.unmatched_count(),
            "keys": keys,
        });
        println!("{}", summary);
    } else {
        println!("Pattern: {}", input.display());
        println!("  shape:     {}", pattern.shape);
        if let Some(name) = &pattern.palette {
            println!("  palette:   {}", name);
        }
        println!("  pixels:    {}", pattern.len());
        println!("  matched:   {}", pattern.matched_count());
        println!("  unmatched: {}", pattern.unmatched_count());
        if !key_counts.is_empty() {
            println!("  keys:");
            for (key, count) in &key_counts {
                println!("    {:<12} {}", key, count);
            }
        }
    }

    ExitCode::from(EXIT_SUCCESS)
}
