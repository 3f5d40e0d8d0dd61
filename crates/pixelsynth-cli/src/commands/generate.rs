//! Generate command implementation
//!
//! Decodes an image, resolves settings, and writes a Standard MIDI File.

use anyhow::{Context, Result};
use colored::Colorize;
use pixelsynth_backend_midi::{generate_midi, GenerateError, PixelSource};
use pixelsynth_spec::{settings_hash, BackendError, ValidationWarning};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use super::json_output::{
    error_codes, generate_error_to_json, input_error_to_json, to_json_string,
    validation_warning_to_json, warning_codes, GenerateOutput, GenerateResult, JsonError,
    JsonWarning,
};
use crate::input::{
    default_output_path, load_image, resolve_settings, LoadedImage, SettingsOverrides,
};

/// Exit code for generation failures (as opposed to bad input).
pub const EXIT_GENERATION_FAILED: u8 = 2;

/// Options for one generate run.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Input image path
    pub input: String,
    /// Settings JSON file
    pub settings: Option<String>,
    /// Analyzer suggestion JSON file
    pub suggestion: Option<String>,
    /// Output MIDI path (default: input path with `.mid`)
    pub output: Option<String>,
    /// Widest image sampled without downscaling
    pub max_width: u32,
    /// Per-field overrides
    pub overrides: SettingsOverrides,
}

impl GenerateOptions {
    fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(path) => PathBuf::from(path),
            None => default_output_path(Path::new(&self.input), "mid"),
        }
    }
}

/// Run the generate command
///
/// # Returns
/// Exit code: 0 on success, 1 for input or settings problems, 2 if generation fails
pub fn run(options: &GenerateOptions, json_output: bool) -> Result<ExitCode> {
    if json_output {
        run_json(options)
    } else {
        run_human(options)
    }
}

/// Run generate with human-readable (colored) output
fn run_human(options: &GenerateOptions) -> Result<ExitCode> {
    let start = Instant::now();
    let output_path = options.output_path();

    println!("{} {}", "Generating from:".cyan().bold(), options.input);

    let resolved = resolve_settings(
        options.settings.as_deref().map(Path::new),
        options.suggestion.as_deref().map(Path::new),
        &options.overrides,
    )
    .context("Failed to resolve settings")?;
    if let Some(reason) = &resolved.fallback_reason {
        println!(
            "  {} [suggestion]: {} (using fallback)",
            "!".yellow(),
            reason
        );
    }
    if let Some(title) = &resolved.title {
        println!("{} {}", "Title:".cyan().bold(), title);
    }

    let loaded = load_image(Path::new(&options.input), options.max_width)
        .with_context(|| format!("Failed to load image: {}", options.input))?;
    print_image_info(&loaded);

    let settings = resolved.settings;
    println!(
        "{} {} bpm, {} bars, {}x{} grid, {} {}",
        "Settings:".dimmed(),
        settings.bpm,
        settings.duration_bars,
        settings.resolution_x,
        settings.resolution_y,
        settings.root_note,
        settings.scale
    );

    let result = match generate_midi(&loaded.image, &settings) {
        Ok(result) => result,
        Err(GenerateError::InvalidSettings(errors)) => {
            println!("\n{}", "Errors:".red().bold());
            for error in &errors {
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
            println!(
                "\n{} Settings have {} error(s)",
                "FAILED".red().bold(),
                errors.len()
            );
            return Ok(ExitCode::from(1));
        }
        Err(e) => {
            println!(
                "\n{} [{}] {}",
                "FAILED".red().bold(),
                e.code().red(),
                e
            );
            return Ok(ExitCode::from(EXIT_GENERATION_FAILED));
        }
    };

    print_warnings(&result.warnings);

    std::fs::write(&output_path, &result.data)
        .with_context(|| format!("Failed to write output: {}", output_path.display()))?;

    let duration_ms = start.elapsed().as_millis() as u64;
    println!(
        "  {} {} ({} notes, {} bytes)",
        "->".green(),
        output_path.display(),
        result.note_count,
        result.data.len()
    );
    println!("  {} {}", "hash:".dimmed(), &result.hash[..16]);
    println!(
        "\n{} Generated {} notes ({}ms)",
        "SUCCESS".green().bold(),
        result.note_count,
        duration_ms
    );
    Ok(ExitCode::SUCCESS)
}

/// Run generate with machine-readable JSON output
fn run_json(options: &GenerateOptions) -> Result<ExitCode> {
    let output_path = options.output_path();
    let mut warnings: Vec<JsonWarning> = Vec::new();

    let resolved = match resolve_settings(
        options.settings.as_deref().map(Path::new),
        options.suggestion.as_deref().map(Path::new),
        &options.overrides,
    ) {
        Ok(resolved) => resolved,
        Err(e) => return print_failure(vec![input_error_to_json(&e)], warnings, None, None, 1),
    };
    if let Some(reason) = &resolved.fallback_reason {
        warnings.push(JsonWarning::new(
            warning_codes::SUGGESTION_FALLBACK,
            format!("{} (using fallback)", reason),
        ));
    }
    let settings_hash = settings_hash(&resolved.settings).ok();

    let loaded = match load_image(Path::new(&options.input), options.max_width) {
        Ok(loaded) => loaded,
        Err(e) => {
            return print_failure(vec![input_error_to_json(&e)], warnings, settings_hash, None, 1)
        }
    };
    if loaded.was_downscaled() {
        warnings.push(JsonWarning::new(
            warning_codes::IMAGE_DOWNSCALED,
            format!(
                "image downscaled from {}x{} to {}x{}",
                loaded.original_width,
                loaded.original_height,
                loaded.image.width(),
                loaded.image.height()
            ),
        ));
    }
    let source_hash = Some(loaded.source_hash.clone());

    let result = match generate_midi(&loaded.image, &resolved.settings) {
        Ok(result) => result,
        Err(e) => {
            let code = match e {
                GenerateError::InvalidSettings(_) => 1,
                _ => EXIT_GENERATION_FAILED,
            };
            return print_failure(generate_error_to_json(&e), warnings, settings_hash, source_hash, code);
        }
    };
    warnings.extend(result.warnings.iter().map(validation_warning_to_json));

    if let Err(e) = std::fs::write(&output_path, &result.data) {
        let error = JsonError::new(error_codes::FILE_WRITE, e.to_string())
            .with_file(output_path.display().to_string());
        return print_failure(
            vec![error],
            warnings,
            settings_hash,
            source_hash,
            EXIT_GENERATION_FAILED,
        );
    }

    let summary = GenerateResult {
        output: output_path.display().to_string(),
        hash: result.hash,
        note_count: result.note_count,
        ticks_per_step: result.ticks_per_step,
        sampled_width: loaded.image.width(),
        sampled_height: loaded.image.height(),
        title: resolved.title,
    };
    let output = GenerateOutput::success(
        summary,
        settings_hash.unwrap_or_else(|| "unknown".to_string()),
        loaded.source_hash,
        warnings,
    );
    println!("{}", to_json_string(&output));
    Ok(ExitCode::SUCCESS)
}

fn print_failure(
    errors: Vec<JsonError>,
    warnings: Vec<JsonWarning>,
    settings_hash: Option<String>,
    source_hash: Option<String>,
    code: u8,
) -> Result<ExitCode> {
    let output = GenerateOutput::failure(errors, warnings, settings_hash, source_hash);
    println!("{}", to_json_string(&output));
    Ok(ExitCode::from(code))
}

fn print_image_info(loaded: &LoadedImage) {
    if loaded.was_downscaled() {
        println!(
            "{} {}x{} (downscaled from {}x{})",
            "Image:".dimmed(),
            loaded.image.width(),
            loaded.image.height(),
            loaded.original_width,
            loaded.original_height
        );
    } else {
        println!(
            "{} {}x{}",
            "Image:".dimmed(),
            loaded.image.width(),
            loaded.image.height()
        );
    }
}

fn print_warnings(warnings: &[ValidationWarning]) {
    if warnings.is_empty() {
        return;
    }
    println!("\n{}", "Warnings:".yellow().bold());
    for warning in warnings {
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
