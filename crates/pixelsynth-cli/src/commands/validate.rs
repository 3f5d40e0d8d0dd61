//! Validate command implementation
//!
//! Checks a settings file without touching any image.

use anyhow::{Context, Result};
use colored::Colorize;
use pixelsynth_spec::{settings_hash, validate_settings, ValidationResult};
use std::path::Path;
use std::process::ExitCode;

use super::json_output::{
    input_error_to_json, to_json_string, validation_error_to_json, validation_warning_to_json,
    JsonError, JsonWarning, ValidateOutput, ValidateResult,
};
use crate::input::load_settings;

/// Run the validate command
///
/// # Arguments
/// * `settings_path` - Path to the settings JSON file
/// * `json_output` - Whether to output machine-readable JSON diagnostics
///
/// # Returns
/// Exit code: 0 if valid, 1 if invalid
pub fn run(settings_path: &str, json_output: bool) -> Result<ExitCode> {
    if json_output {
        run_json(settings_path)
    } else {
        run_human(settings_path)
    }
}

/// Run validate with human-readable (colored) output
fn run_human(settings_path: &str) -> Result<ExitCode> {
    println!("{} {}", "Validating:".cyan().bold(), settings_path);

    let settings = load_settings(Some(Path::new(settings_path)))
        .with_context(|| format!("Failed to load settings file: {}", settings_path))?;
    let hash = settings_hash(&settings).unwrap_or_else(|_| "unknown".to_string());
    println!("{} {}", "Hash:".dimmed(), &hash[..hash.len().min(16)]);

    let result = validate_settings(&settings);
    print_validation_results(&result);

    if result.is_ok() {
        println!("\n{} Settings are valid", "SUCCESS".green().bold());
        Ok(ExitCode::SUCCESS)
    } else {
        println!(
            "\n{} Settings have {} error(s)",
            "FAILED".red().bold(),
            result.errors.len()
        );
        Ok(ExitCode::from(1))
    }
}

/// Run validate with machine-readable JSON output
fn run_json(settings_path: &str) -> Result<ExitCode> {
    let settings = match load_settings(Some(Path::new(settings_path))) {
        Ok(settings) => settings,
        Err(e) => {
            let output = ValidateOutput::failure(vec![input_error_to_json(&e)], vec![]);
            println!("{}", to_json_string(&output));
            return Ok(ExitCode::from(1));
        }
    };

    let result = validate_settings(&settings);
    let warnings: Vec<JsonWarning> = result.warnings.iter().map(validation_warning_to_json).collect();

    let output = if result.is_ok() {
        let details = ValidateResult {
            settings_hash: settings_hash(&settings).unwrap_or_else(|_| "unknown".to_string()),
            total_ticks: settings.total_ticks(),
        };
        ValidateOutput::success(details, warnings)
    } else {
        let errors: Vec<JsonError> = result.errors.iter().map(validation_error_to_json).collect();
        ValidateOutput::failure(errors, warnings)
    };

    println!("{}", to_json_string(&output));
    if output.success {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

/// Print validation results to the console
fn print_validation_results(result: &ValidationResult) {
    if !result.errors.is_empty() {
        println!("\n{}", "Errors:".red().bold());
        for error in &result.errors {
            let path_info = error
                .path
                .as_ref()
                .map(|p| format!(" at {}", p))
                .unwrap_or_default();
            println!(
                "  {} [{}]{}: {}",
                "x".red(),
                error.code.to_string().red(),
                path_info.dimmed(),
                error.message
            );
        }
    }

    if !result.warnings.is_empty() {
        println!("\n{}", "Warnings:".yellow().bold());
        for warning in &result.warnings {
            let path_info = warning
                .path
                .as_ref()
                .map(|p| format!(" at {}", p))
                .unwrap_or_default();
            println!(
                "  {} [{}]{}: {}",
                "!".yellow(),
                warning.code.to_string().yellow(),
                path_info.dimmed(),
                warning.message
            );
        }
    }
}
