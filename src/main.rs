//! palswap - Command-line tool for recoloring images between palettes

use std::process::ExitCode;

use palswap::cli;

fn main() -> ExitCode {
    cli::run()
}
