//! PixelSynth Canonical Settings Library
//!
//! This crate provides types, validation, and hashing for the settings record
//! that drives an image-to-MIDI generation run.
//!
//! # Overview
//!
//! A generation run is fully described by a [`Settings`] value:
//!
//! - **Timing**: `bpm` and `duration_bars` on a fixed 4/4, 480 PPQ grid
//! - **Sampling**: brightness `threshold` and the `resolution_x` × `resolution_y` grid
//! - **Pitch**: `min_note`..`max_note` range, optionally quantized to a [`Scale`] rooted at a [`PitchClass`]
//! - **Output**: MIDI `channel`
//!
//! # Example
//!
//! ```
//! use pixelsynth_spec::{Settings, Scale, PitchClass};
//! use pixelsynth_spec::validation::validate_settings;
//!
//! let settings = Settings::builder()
//!     .bpm(96.0)
//!     .scale(Scale::PentatonicMinor)
//!     .root_note(PitchClass::A)
//!     .resolution(64, 32)
//!     .build();
//!
//! let result = validate_settings(&settings);
//! assert!(result.is_ok());
//! assert_eq!(settings.total_ticks(), 4 * 4 * 480);
//! ```
//!
//! # Modules
//!
//! - [`error`]: Error and warning types for validation
//! - [`scale`]: Closed scale and pitch-class enumerations
//! - [`settings`]: Settings record, builder, and format constants
//! - [`suggestion`]: Advisory parameter suggestions from an external analyzer
//! - [`validation`]: Settings validation
//! - [`hash`]: Canonical settings hashing

pub mod error;
pub mod hash;
pub mod scale;
pub mod settings;
pub mod suggestion;
pub mod validation;

// Re-export commonly used types at the crate root
pub use error::{
    BackendError, ErrorCode, SettingsError, ValidationError, ValidationResult, ValidationWarning,
    WarningCode,
};
pub use hash::settings_hash;
pub use scale::{ParseScaleError, PitchClass, Scale};
pub use settings::{
    Settings, SettingsBuilder, BEATS_PER_BAR, MAX_MIDI_VALUE, MAX_TEMPO_MICROS, TICKS_PER_QUARTER,
};
pub use suggestion::{Suggestion, SuggestionError};
pub use validation::validate_settings;
