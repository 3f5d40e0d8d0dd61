//! Defaults command implementation
//!
//! Prints the default settings as pretty JSON, a starting point for a
//! settings file.

use anyhow::Result;
use pixelsynth_spec::Settings;
use std::process::ExitCode;

/// Run the defaults command
pub fn run() -> Result<ExitCode> {
    println!("{}", Settings::default().to_json_pretty()?);
    Ok(ExitCode::SUCCESS)
}
