//! Settings validation.
//!
//! Validation collects every problem in one pass so a caller can report them
//! together. Errors block generation; warnings only flag values outside the
//! ranges the interactive controls offer.

use crate::error::{
    ErrorCode, ValidationError, ValidationResult, ValidationWarning, WarningCode,
};
use crate::settings::{Settings, MAX_MIDI_VALUE, MAX_TEMPO_MICROS};

/// Tempo range offered by the tempo control.
pub const RECOMMENDED_BPM: (f64, f64) = (40.0, 240.0);

/// Longest song offered by the duration control, in bars.
pub const RECOMMENDED_MAX_BARS: u32 = 32;

/// Horizontal resolution range offered by the grid control.
pub const RECOMMENDED_RESOLUTION_X: (u32, u32) = (16, 512);

/// Vertical resolution range offered by the grid control.
pub const RECOMMENDED_RESOLUTION_Y: (u32, u32) = (12, 128);

/// Largest grid the controls can produce.
pub const RECOMMENDED_MAX_CELLS: u64 =
    RECOMMENDED_RESOLUTION_X.1 as u64 * RECOMMENDED_RESOLUTION_Y.1 as u64;

/// Validates a settings record.
///
/// # Example
/// ```
/// use pixelsynth_spec::{Settings, ErrorCode};
/// use pixelsynth_spec::validation::validate_settings;
///
/// assert!(validate_settings(&Settings::default()).is_ok());
///
/// let bad = Settings { threshold: 255, ..Default::default() };
/// let errors = validate_settings(&bad).into_result().unwrap_err();
/// assert_eq!(errors[0].code, ErrorCode::InvalidThreshold);
/// ```
pub fn validate_settings(settings: &Settings) -> ValidationResult {
    let mut result = ValidationResult::success();

    validate_tempo(settings, &mut result);
    validate_threshold(settings, &mut result);
    validate_duration(settings, &mut result);
    validate_note_range(settings, &mut result);
    validate_resolution(settings, &mut result);
    validate_channel(settings, &mut result);

    result
}

fn validate_tempo(settings: &Settings, result: &mut ValidationResult) {
    let bpm = settings.bpm;
    if !bpm.is_finite() || bpm <= 0.0 {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidTempo,
            format!("bpm must be a positive number, got {}", bpm),
            "bpm",
        ));
        return;
    }

    let micros = settings.micros_per_quarter();
    if micros < 1.0 || micros > MAX_TEMPO_MICROS as f64 {
        result.add_error(ValidationError::with_path(
            ErrorCode::TempoOutOfRange,
            format!(
                "bpm {} gives {} microseconds per quarter note, outside 1-{}",
                bpm, micros, MAX_TEMPO_MICROS
            ),
            "bpm",
        ));
        return;
    }

    if bpm < RECOMMENDED_BPM.0 || bpm > RECOMMENDED_BPM.1 {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::UnusualTempo,
            format!(
                "bpm {} is outside the usual {}-{} range",
                bpm, RECOMMENDED_BPM.0, RECOMMENDED_BPM.1
            ),
            "bpm",
        ));
    }
}

fn validate_threshold(settings: &Settings, result: &mut ValidationResult) {
    // brightness tops out at 255, so nothing can exceed a 255 threshold and the
    // velocity ramp would divide by zero
    if settings.threshold == u8::MAX {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidThreshold,
            "threshold must be below 255",
            "threshold",
        ));
    }
}

fn validate_duration(settings: &Settings, result: &mut ValidationResult) {
    if settings.duration_bars < 1 {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidDuration,
            "duration_bars must be at least 1",
            "duration_bars",
        ));
    } else if settings.duration_bars > RECOMMENDED_MAX_BARS {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::LongDuration,
            format!(
                "duration_bars {} exceeds the usual maximum of {}",
                settings.duration_bars, RECOMMENDED_MAX_BARS
            ),
            "duration_bars",
        ));
    }
}

fn validate_note_range(settings: &Settings, result: &mut ValidationResult) {
    let mut in_range = true;
    for (name, value) in [("min_note", settings.min_note), ("max_note", settings.max_note)] {
        if value > MAX_MIDI_VALUE {
            in_range = false;
            result.add_error(ValidationError::with_path(
                ErrorCode::NoteOutOfRange,
                format!("{} must be 0-{}, got {}", name, MAX_MIDI_VALUE, value),
                name,
            ));
        }
    }

    if in_range && settings.min_note > settings.max_note {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvertedNoteRange,
            format!(
                "min_note ({}) must not exceed max_note ({})",
                settings.min_note, settings.max_note
            ),
            "min_note",
        ));
    }
}

fn validate_resolution(settings: &Settings, result: &mut ValidationResult) {
    let axes = [
        ("resolution_x", settings.resolution_x, RECOMMENDED_RESOLUTION_X, WarningCode::UnusualResolutionX),
        ("resolution_y", settings.resolution_y, RECOMMENDED_RESOLUTION_Y, WarningCode::UnusualResolutionY),
    ];

    let mut nonzero = true;
    for (name, value, (lo, hi), warning) in axes {
        if value < 1 {
            nonzero = false;
            result.add_error(ValidationError::with_path(
                ErrorCode::InvalidResolution,
                format!("{} must be at least 1", name),
                name,
            ));
        } else if value < lo || value > hi {
            result.add_warning(ValidationWarning::with_path(
                warning,
                format!("{} {} is outside the usual {}-{} range", name, value, lo, hi),
                name,
            ));
        }
    }

    if nonzero && settings.cell_count() > RECOMMENDED_MAX_CELLS {
        result.add_warning(ValidationWarning::new(
            WarningCode::LargeGrid,
            format!(
                "grid has {} cells, above the recommended {}",
                settings.cell_count(),
                RECOMMENDED_MAX_CELLS
            ),
        ));
    }
}

fn validate_channel(settings: &Settings, result: &mut ValidationResult) {
    if settings.channel > 15 {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidChannel,
            format!("channel must be 0-15, got {}", settings.channel),
            "channel",
        ));
    }
}
