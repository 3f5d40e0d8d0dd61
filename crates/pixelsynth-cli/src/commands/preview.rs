//! Preview command implementation
//!
//! Renders the cell map of an image as a PNG: white cells sound in scale,
//! dark red cells sound after snapping, black cells are silent.

use anyhow::{Context, Result};
use colored::Colorize;
use pixelsynth_backend_midi::{classify_cells, CellMap, CellState};
use pixelsynth_spec::validate_settings;
use png::{BitDepth, ColorType, Compression, Encoder, FilterType};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::input::{default_output_path, load_image, resolve_settings, SettingsOverrides};

/// Default edge length of one cell in the preview, in pixels.
pub const DEFAULT_CELL_SIZE: u32 = 4;

/// Run the preview command
///
/// # Arguments
/// * `input` - Image file path
/// * `settings_path` - Optional settings JSON file
/// * `output` - Output PNG path (default: `<input>.preview.png`)
/// * `cell_size` - Pixel edge length per grid cell
/// * `max_width` - Widest image sampled without downscaling
/// * `overrides` - Per-field settings overrides
///
/// # Returns
/// Exit code: 0 on success, 1 if the settings are invalid
pub fn run(
    input: &str,
    settings_path: Option<&str>,
    output: Option<&str>,
    cell_size: u32,
    max_width: u32,
    overrides: &SettingsOverrides,
) -> Result<ExitCode> {
    let output_path = output
        .map(PathBuf::from)
        .unwrap_or_else(|| default_output_path(Path::new(input), "preview.png"));

    println!("{} {}", "Previewing:".cyan().bold(), input);

    let settings = resolve_settings(settings_path.map(Path::new), None, overrides)
        .context("Failed to resolve settings")?
        .settings;
    let validation = validate_settings(&settings);
    if !validation.is_ok() {
        println!("\n{}", "Errors:".red().bold());
        for error in &validation.errors {
            println!("  {} {}", "x".red(), error);
        }
        return Ok(ExitCode::from(1));
    }

    let loaded = load_image(Path::new(input), max_width)
        .with_context(|| format!("Failed to load image: {}", input))?;
    let map = classify_cells(&loaded.image, &settings);

    let mut png = Vec::new();
    write_preview_png(&map, cell_size, &mut png).context("Failed to render preview")?;
    std::fs::write(&output_path, &png)
        .with_context(|| format!("Failed to write output: {}", output_path.display()))?;

    println!(
        "  {} {} in scale, {} off scale, {} silent",
        "cells:".dimmed(),
        map.count(CellState::InScale).to_string().green(),
        map.count(CellState::OffScale).to_string().red(),
        map.count(CellState::Inactive)
    );
    println!("  {} {}", "->".green(), output_path.display());
    Ok(ExitCode::SUCCESS)
}

/// Encode a cell map as an RGBA PNG.
pub fn write_preview_png<W: Write>(map: &CellMap, cell_size: u32, writer: W) -> Result<()> {
    let (width, height, data) = map.to_rgba(cell_size)?;
    if width == 0 || height == 0 {
        anyhow::bail!("cell map is empty");
    }

    let mut encoder = Encoder::new(writer, width, height);
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);
    encoder.set_compression(Compression::Default);
    encoder.set_filter(FilterType::NoFilter);

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(&data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelsynth_backend_midi::RgbaImage;
    use pixelsynth_spec::Settings;

    #[test]
    fn test_preview_png_dimensions() {
        let image = RgbaImage::filled(8, 8, [255, 255, 255, 255]).unwrap();
        let settings = Settings::builder().resolution(4, 2).build();
        let map = classify_cells(&image, &settings);

        let mut buf = Vec::new();
        write_preview_png(&map, 3, &mut buf).unwrap();

        let decoded = image::load_from_memory(&buf).unwrap().to_rgba8();
        assert_eq!((decoded.width(), decoded.height()), (12, 6));
        assert_eq!(decoded.get_pixel(0, 0).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_preview_png_rejects_oversized_cells() {
        let image = RgbaImage::filled(4, 4, [255, 255, 255, 255]).unwrap();
        let settings = Settings::builder().resolution(512, 128).build();
        let map = classify_cells(&image, &settings);

        let mut buf = Vec::new();
        let err = write_preview_png(&map, 16_777_216, &mut buf).unwrap_err();
        assert!(err.to_string().contains("pixel limit"), "{}", err);
        assert!(buf.is_empty());
    }
}
