//! Input loading for images, settings files, and suggestions.
//!
//! Images are decoded with the `image` crate into RGBA8 and downscaled
//! before sampling. Settings are resolved in layers: defaults, then a
//! settings file, then a suggestion, then individual command-line overrides.

use image::imageops::{self, FilterType};
use pixelsynth_backend_midi::{PixelSource, RgbaImage};
use pixelsynth_spec::{PitchClass, Scale, Settings, SettingsError, Suggestion};
use std::path::{Path, PathBuf};

/// Widest image sampled without downscaling.
pub const DEFAULT_MAX_WIDTH: u32 = 512;

/// Errors that can occur while loading inputs.
#[derive(Debug)]
pub enum InputError {
    /// File could not be read.
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Image bytes could not be decoded.
    ImageDecode { path: PathBuf, message: String },

    /// Settings or suggestion JSON could not be parsed.
    JsonParse { path: PathBuf, message: String },

    /// Suggestion names an unknown scale or root.
    InvalidSuggestion { message: String },
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::FileRead { path, source } => {
                write!(f, "failed to read file '{}': {}", path.display(), source)
            }
            InputError::ImageDecode { path, message } => {
                write!(f, "failed to decode image '{}': {}", path.display(), message)
            }
            InputError::JsonParse { path, message } => {
                write!(f, "failed to parse '{}': {}", path.display(), message)
            }
            InputError::InvalidSuggestion { message } => {
                write!(f, "invalid suggestion: {}", message)
            }
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InputError::FileRead { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// A decoded image ready for sampling.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// Pixels after any downscaling.
    pub image: RgbaImage,
    /// Width of the file as decoded.
    pub original_width: u32,
    /// Height of the file as decoded.
    pub original_height: u32,
    /// BLAKE3 hash of the file bytes.
    pub source_hash: String,
}

impl LoadedImage {
    /// True if the image was shrunk to fit the maximum width.
    pub fn was_downscaled(&self) -> bool {
        self.image.width() != self.original_width
    }
}

/// Loads and decodes an image file, shrinking it to at most `max_width` pixels wide.
pub fn load_image(path: &Path, max_width: u32) -> Result<LoadedImage, InputError> {
    let bytes = std::fs::read(path).map_err(|e| InputError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let source_hash = blake3::hash(&bytes).to_hex().to_string();

    let decoded = image::load_from_memory(&bytes).map_err(|e| InputError::ImageDecode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let rgba = decoded.to_rgba8();
    let (original_width, original_height) = (rgba.width(), rgba.height());

    let scaled = downscale_to_width(rgba, max_width);
    log::debug!(
        "decoded {} as {}x{}, sampling {}x{}",
        path.display(),
        original_width,
        original_height,
        scaled.width(),
        scaled.height()
    );

    let (width, height) = (scaled.width(), scaled.height());
    let image = RgbaImage::new(width, height, scaled.into_raw()).map_err(|e| {
        InputError::ImageDecode {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;

    Ok(LoadedImage {
        image,
        original_width,
        original_height,
        source_hash,
    })
}

/// Shrinks `image` to `max_width` with nearest-neighbour filtering, keeping
/// the aspect ratio with the scaled height truncated. Images already narrow
/// enough are returned unchanged.
pub fn downscale_to_width(image: image::RgbaImage, max_width: u32) -> image::RgbaImage {
    let max_width = max_width.max(1);
    if image.width() <= max_width {
        return image;
    }
    let scale = max_width as f64 / image.width() as f64;
    let height = ((image.height() as f64 * scale).floor() as u32).max(1);
    imageops::resize(&image, max_width, height, FilterType::Nearest)
}

/// Loads a settings file, or the defaults when no path is given.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, InputError> {
    let Some(path) = path else {
        return Ok(Settings::default());
    };
    Settings::from_file(path).map_err(|e| match e {
        SettingsError::Io(source) => InputError::FileRead {
            path: path.to_path_buf(),
            source,
        },
        SettingsError::JsonParse(err) => InputError::JsonParse {
            path: path.to_path_buf(),
            message: err.to_string(),
        },
    })
}

/// Loads an analyzer suggestion file.
pub fn load_suggestion(path: &Path) -> Result<Suggestion, InputError> {
    let text = std::fs::read_to_string(path).map_err(|e| InputError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&text).map_err(|e| InputError::JsonParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Per-field command-line overrides, applied last.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsOverrides {
    pub bpm: Option<f64>,
    pub threshold: Option<u8>,
    pub duration_bars: Option<u32>,
    pub min_note: Option<u8>,
    pub max_note: Option<u8>,
    pub scale: Option<Scale>,
    pub root_note: Option<PitchClass>,
    pub resolution_x: Option<u32>,
    pub resolution_y: Option<u32>,
    pub channel: Option<u8>,
}

impl SettingsOverrides {
    /// Returns `settings` with every present override applied.
    pub fn apply(&self, settings: Settings) -> Settings {
        Settings {
            bpm: self.bpm.unwrap_or(settings.bpm),
            threshold: self.threshold.unwrap_or(settings.threshold),
            duration_bars: self.duration_bars.unwrap_or(settings.duration_bars),
            min_note: self.min_note.unwrap_or(settings.min_note),
            max_note: self.max_note.unwrap_or(settings.max_note),
            scale: self.scale.unwrap_or(settings.scale),
            root_note: self.root_note.unwrap_or(settings.root_note),
            resolution_x: self.resolution_x.unwrap_or(settings.resolution_x),
            resolution_y: self.resolution_y.unwrap_or(settings.resolution_y),
            channel: self.channel.unwrap_or(settings.channel),
        }
    }
}

/// Outcome of settings resolution.
#[derive(Debug, Clone)]
pub struct ResolvedSettings {
    /// Final settings, not yet validated.
    pub settings: Settings,
    /// Title carried by the applied suggestion, if any.
    pub title: Option<String>,
    /// Set when the suggestion file was unusable and the fallback was applied instead.
    pub fallback_reason: Option<String>,
}

/// Layers defaults, settings file, suggestion, and overrides.
///
/// An unreadable or unrecognized suggestion does not fail the run: the
/// fallback suggestion is applied and the reason reported.
pub fn resolve_settings(
    settings_path: Option<&Path>,
    suggestion_path: Option<&Path>,
    overrides: &SettingsOverrides,
) -> Result<ResolvedSettings, InputError> {
    let mut settings = load_settings(settings_path)?;
    let mut title = None;
    let mut fallback_reason = None;

    if let Some(path) = suggestion_path {
        let applied = load_suggestion(path).and_then(|suggestion| {
            let next = suggestion
                .apply(settings.clone())
                .map_err(|e| InputError::InvalidSuggestion {
                    message: e.to_string(),
                })?;
            Ok((next, suggestion.title))
        });

        let (next, suggested_title) = match applied {
            Ok(applied) => applied,
            Err(e) => {
                log::warn!("{}; using fallback suggestion", e);
                fallback_reason = Some(e.to_string());
                let fallback = Suggestion::fallback();
                let next = fallback
                    .apply(settings.clone())
                    .map_err(|e| InputError::InvalidSuggestion {
                        message: e.to_string(),
                    })?;
                (next, fallback.title)
            }
        };
        settings = next;
        if !suggested_title.is_empty() {
            title = Some(suggested_title);
        }
    }

    Ok(ResolvedSettings {
        settings: overrides.apply(settings),
        title,
        fallback_reason,
    })
}

/// Default output path: the input path with its extension replaced.
pub fn default_output_path(input: &Path, extension: &str) -> PathBuf {
    input.with_extension(extension)
}
