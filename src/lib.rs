//! Portfolio dashboard core: region → business entity → project rollups,
//! chart geometry and SVG/JSON screen rendering.

pub mod aggregate;
pub mod api;
pub mod catalog;
pub mod cli;
pub mod error;
pub mod fixtures;
pub mod format;
pub mod geometry;
pub mod palette;
pub mod preferences;
pub mod render;
pub mod services;
pub mod state;
pub mod types;

use std::process::ExitCode;

use clap::Parser;

/// Parse arguments, run the command and map failures to a non-zero exit.
pub fn run() -> ExitCode {
    let cli = cli::Cli::parse();
    match cli::execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            cli::report_error(&e);
            ExitCode::FAILURE
        }
    }
}
