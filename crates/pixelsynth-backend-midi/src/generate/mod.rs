//! Main entry point for MIDI generation.
//!
//! [`generate_midi`] runs the whole pipeline: validate settings, sample the
//! grid, map active cells to notes, and serialize the notes as a Standard
//! MIDI File.

use pixelsynth_spec::{validate_settings, BackendError, ValidationError, ValidationWarning};
use pixelsynth_spec::Settings;
use thiserror::Error;

use crate::mapper::{map_samples, TimeGrid};
use crate::sampler::{active_samples, PixelSource};
use crate::smf::SmfFile;


/// Error type for MIDI generation.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Settings failed validation; nothing was generated.
    #[error("Invalid settings: {}", join_errors(.0))]
    InvalidSettings(Vec<ValidationError>),

    /// The time grid cannot be built.
    #[error("Degenerate timing: {0}")]
    DegenerateTiming(String),

    /// A mapped or encoded pitch is outside 0-127.
    #[error("Pitch {pitch} at tick {tick} is outside 0-127")]
    PitchOutOfRange {
        /// Offending pitch.
        pitch: i32,
        /// Tick of the note or event.
        tick: u32,
    },

    /// A mapped or encoded velocity is outside 1-127.
    #[error("Velocity {velocity} at tick {tick} is outside 1-127")]
    VelocityOutOfRange {
        /// Offending velocity.
        velocity: i32,
        /// Tick of the note or event.
        tick: u32,
    },

    /// The pixel buffer is unusable.
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// A track value cannot be represented in the file format.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// IO error during writing.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl BackendError for GenerateError {
    fn code(&self) -> &'static str {
        match self {
            GenerateError::InvalidSettings(_) => "MIDI_001",
            GenerateError::DegenerateTiming(_) => "MIDI_002",
            GenerateError::PitchOutOfRange { .. } => "MIDI_003",
            GenerateError::VelocityOutOfRange { .. } => "MIDI_004",
            GenerateError::InvalidImage(_) => "MIDI_005",
            GenerateError::Encoding(_) => "MIDI_006",
            GenerateError::Io(_) => "MIDI_007",
        }
    }

    fn category(&self) -> &'static str {
        "midi"
    }
}

/// Result of MIDI generation.
#[derive(Debug, Clone)]
pub struct GenerateResult {
    /// Standard MIDI File bytes.
    pub data: Vec<u8>,
    /// BLAKE3 hash of the generated data.
    pub hash: String,
    /// File extension ("mid").
    pub extension: &'static str,
    /// Number of notes written.
    pub note_count: usize,
    /// Ticks per grid column.
    pub ticks_per_step: u32,
    /// Advisory warnings raised by settings validation.
    pub warnings: Vec<ValidationWarning>,
}

/// Generate a MIDI file from an image.
///
/// Settings are validated first; any error aborts with
/// [`GenerateError::InvalidSettings`] carrying every problem found.
/// Validation warnings are logged and returned in the result.
///
/// # Arguments
/// * `pixels` - Decoded RGBA source
/// * `settings` - Generation parameters
///
/// # Returns
/// `GenerateResult` containing the file bytes, hash, and note statistics
pub fn generate_midi<P: PixelSource + ?Sized>(
    pixels: &P,
    settings: &Settings,
) -> Result<GenerateResult, GenerateError> {
    let warnings = match validate_settings(settings).into_result() {
        Ok(warnings) => warnings,
        Err(errors) => return Err(GenerateError::InvalidSettings(errors)),
    };
    for warning in &warnings {
        log::warn!("{}", warning);
    }

    if pixels.width() == 0 || pixels.height() == 0 {
        return Err(GenerateError::InvalidImage(format!(
            "image must be at least 1x1, got {}x{}",
            pixels.width(),
            pixels.height()
        )));
    }

    let grid = TimeGrid::new(settings)?;
    let samples = active_samples(pixels, settings);
    let notes = map_samples(&samples, settings)?;
    let file = SmfFile::from_notes(&notes, settings)?;
    let data = file.to_bytes()?;
    let hash = blake3::hash(&data).to_hex().to_string();

    log::debug!(
        "generated {} notes, {} bytes, hash {}",
        notes.len(),
        data.len(),
        hash
    );

    Ok(GenerateResult {
        data,
        hash,
        extension: "mid",
        note_count: notes.len(),
        ticks_per_step: grid.ticks_per_step,
        warnings,
    })
}
