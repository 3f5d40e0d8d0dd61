//! Settings record, builder, and fixed format constants.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::scale::{PitchClass, Scale};

/// Pulses per quarter note. Shared by the note grid and the MIDI header division.
pub const TICKS_PER_QUARTER: u16 = 480;

/// Beats per bar (fixed 4/4 meter).
pub const BEATS_PER_BAR: u32 = 4;

/// Largest value of the 24-bit tempo meta-event payload.
pub const MAX_TEMPO_MICROS: u32 = 0xFF_FFFF;

/// Largest MIDI data byte (pitch, velocity).
pub const MAX_MIDI_VALUE: u8 = 127;

const MICROS_PER_MINUTE: f64 = 60_000_000.0;

/// Parameters for one image-to-MIDI generation run.
///
/// Immutable for the duration of a run. Every field has a default, so a
/// settings file only needs the keys it changes. Keys are snake_case; the
/// camelCase spellings written by the web front-end are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Tempo in beats per minute.
    pub bpm: f64,
    /// Brightness a cell must exceed (strictly) to sound (0-254).
    pub threshold: u8,
    /// Song length in 4/4 bars.
    #[serde(alias = "durationBars")]
    pub duration_bars: u32,
    /// Lowest MIDI note (bottom grid row maps toward this).
    #[serde(alias = "minNote")]
    pub min_note: u8,
    /// Highest MIDI note (top grid row maps to this).
    #[serde(alias = "maxNote")]
    pub max_note: u8,
    /// Scale used to quantize pitches.
    pub scale: Scale,
    /// Root of the scale.
    #[serde(alias = "rootNote")]
    pub root_note: PitchClass,
    /// Number of time steps across the image.
    #[serde(alias = "resolutionX")]
    pub resolution_x: u32,
    /// Number of pitch rows down the image.
    #[serde(alias = "resolutionY")]
    pub resolution_y: u32,
    /// MIDI channel (0-15).
    pub channel: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bpm: 120.0,
            threshold: 100,
            duration_bars: 4,
            min_note: 36, // C2
            max_note: 96, // C7
            scale: Scale::Chromatic,
            root_note: PitchClass::C,
            resolution_x: 128,
            resolution_y: 64,
            channel: 0,
        }
    }
}

impl Settings {
    /// Creates a builder seeded with the default settings.
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::new()
    }

    /// Parses settings from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a settings JSON file.
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Serializes the settings to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Total song length in ticks: `duration_bars * 4 * 480`.
    pub fn total_ticks(&self) -> u64 {
        self.duration_bars as u64 * BEATS_PER_BAR as u64 * TICKS_PER_QUARTER as u64
    }

    /// Microseconds per quarter note, `round(60_000_000 / bpm)`.
    ///
    /// Only meaningful for a positive finite tempo; validation rejects the rest.
    pub fn micros_per_quarter(&self) -> f64 {
        (MICROS_PER_MINUTE / self.bpm).round()
    }

    /// Number of grid cells sampled per run.
    pub fn cell_count(&self) -> u64 {
        self.resolution_x as u64 * self.resolution_y as u64
    }
}

/// Builder for [`Settings`].
#[derive(Debug, Clone, Default)]
pub struct SettingsBuilder {
    settings: Settings,
}

impl SettingsBuilder {
    /// Creates a builder seeded with the default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tempo.
    pub fn bpm(mut self, bpm: f64) -> Self {
        self.settings.bpm = bpm;
        self
    }

    /// Sets the brightness threshold.
    pub fn threshold(mut self, threshold: u8) -> Self {
        self.settings.threshold = threshold;
        self
    }

    /// Sets the song length in bars.
    pub fn duration_bars(mut self, bars: u32) -> Self {
        self.settings.duration_bars = bars;
        self
    }

    /// Sets the pitch range.
    pub fn note_range(mut self, min_note: u8, max_note: u8) -> Self {
        self.settings.min_note = min_note;
        self.settings.max_note = max_note;
        self
    }

    /// Sets the quantization scale.
    pub fn scale(mut self, scale: Scale) -> Self {
        self.settings.scale = scale;
        self
    }

    /// Sets the scale root.
    pub fn root_note(mut self, root: PitchClass) -> Self {
        self.settings.root_note = root;
        self
    }

    /// Sets the sampling grid.
    pub fn resolution(mut self, x: u32, y: u32) -> Self {
        self.settings.resolution_x = x;
        self.settings.resolution_y = y;
        self
    }

    /// Sets the MIDI channel.
    pub fn channel(mut self, channel: u8) -> Self {
        self.settings.channel = channel;
        self
    }

    /// Builds the settings. Validation is a separate step.
    pub fn build(self) -> Settings {
        self.settings
    }
}
