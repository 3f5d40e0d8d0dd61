//! Cell-to-note mapping.
//!
//! Each active cell becomes one note: the column picks the start tick on a
//! fixed grid, the row picks the pitch (top row = highest), and the
//! brightness above threshold picks the velocity.

use pixelsynth_spec::{PitchClass, Scale, Settings, MAX_MIDI_VALUE};

use crate::generate::GenerateError;
use crate::sampler::Sample;
use crate::smf::MAX_VLQ_VALUE;

/// Lowest velocity an active cell can produce.
pub const VELOCITY_FLOOR: f64 = 40.0;

/// Velocity span added on top of [`VELOCITY_FLOOR`] at full brightness.
pub const VELOCITY_SPAN: f64 = 87.0;

/// Farthest semitone distance searched when snapping to a scale.
pub const MAX_SNAP_DISTANCE: i32 = 11;

/// A single note on the tick timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note {
    /// MIDI key, after scale quantization.
    pub pitch: u8,
    /// Note-on velocity, 1-127.
    pub velocity: u8,
    /// Start tick.
    pub start_time: u32,
    /// Length in ticks, always positive.
    pub duration: u32,
}

impl Note {
    /// Tick at which the note is released.
    pub fn end_time(&self) -> u32 {
        self.start_time + self.duration
    }
}

/// Fixed time grid derived from the song length and horizontal resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeGrid {
    /// Song length in ticks.
    pub total_ticks: u32,
    /// Ticks per grid column: `floor(total_ticks / resolution_x)`.
    pub ticks_per_step: u32,
}

impl TimeGrid {
    /// Builds the grid for `settings`.
    ///
    /// Fails with [`GenerateError::DegenerateTiming`] when the columns are so
    /// dense that a step rounds down to zero ticks, or when the timeline is too
    /// long to encode as MIDI delta times.
    pub fn new(settings: &Settings) -> Result<Self, GenerateError> {
        let total_ticks = settings.total_ticks();
        if total_ticks > MAX_VLQ_VALUE as u64 {
            return Err(GenerateError::DegenerateTiming(format!(
                "{} bars is {} ticks, more than the {} a MIDI delta time can hold",
                settings.duration_bars, total_ticks, MAX_VLQ_VALUE
            )));
        }
        let total_ticks = total_ticks as u32;

        let ticks_per_step = match settings.resolution_x {
            0 => 0,
            columns => total_ticks / columns,
        };
        if ticks_per_step == 0 {
            return Err(GenerateError::DegenerateTiming(format!(
                "{} columns over {} ticks leaves zero ticks per step",
                settings.resolution_x, total_ticks
            )));
        }

        Ok(Self {
            total_ticks,
            ticks_per_step,
        })
    }

    /// Start tick of column `x`.
    pub fn start_of(&self, x: u32) -> u32 {
        x * self.ticks_per_step
    }
}

/// Unquantized pitch for grid row `y`.
///
/// Row 0 maps to `max_note`; lower rows descend linearly toward `min_note`
/// without ever reaching it unless the range is empty.
pub fn raw_pitch(y: u32, settings: &Settings) -> i32 {
    let ratio = 1.0 - y as f64 / settings.resolution_y as f64;
    let min = settings.min_note as f64;
    let max = settings.max_note as f64;
    (min + ratio * (max - min)).floor() as i32
}

/// Moves `pitch` to the nearest member of `scale` rooted at `root`.
///
/// Searches one semitone at a time, trying the upward neighbour before the
/// downward one at each distance. Chromatic and in-scale pitches are returned
/// unchanged, as is any pitch with no member within an octave.
pub fn snap_to_scale(pitch: i32, scale: Scale, root: PitchClass) -> i32 {
    if scale.contains(pitch, root) {
        return pitch;
    }
    for offset in 1..=MAX_SNAP_DISTANCE {
        if scale.contains(pitch + offset, root) {
            return pitch + offset;
        }
        if scale.contains(pitch - offset, root) {
            return pitch - offset;
        }
    }
    pitch
}

/// Velocity for a cell of `brightness` above `threshold`.
///
/// Ramps linearly from 40 just above the threshold to 127 at full brightness.
/// `threshold` must be below 255.
pub fn velocity_for(brightness: f64, threshold: u8) -> i32 {
    let threshold = threshold as f64;
    let ratio = (brightness - threshold) / (255.0 - threshold);
    (VELOCITY_FLOOR + ratio * VELOCITY_SPAN).floor() as i32
}

/// Converts sampled cells to notes, preserving sample order.
///
/// Inactive cells are skipped. A pitch or velocity outside the MIDI data
/// range is reported rather than clamped.
pub fn map_samples(samples: &[Sample], settings: &Settings) -> Result<Vec<Note>, GenerateError> {
    let grid = TimeGrid::new(settings)?;
    let mut notes = Vec::new();

    for sample in samples.iter().filter(|s| s.is_active(settings.threshold)) {
        let raw = raw_pitch(sample.y, settings);
        let pitch = snap_to_scale(raw, settings.scale, settings.root_note);
        let start_time = grid.start_of(sample.x);
        let pitch = u8::try_from(pitch)
            .ok()
            .filter(|p| *p <= MAX_MIDI_VALUE)
            .ok_or(GenerateError::PitchOutOfRange {
                pitch,
                tick: start_time,
            })?;

        let velocity = velocity_for(sample.brightness, settings.threshold);
        let velocity = u8::try_from(velocity)
            .ok()
            .filter(|v| (1..=MAX_MIDI_VALUE).contains(v))
            .ok_or(GenerateError::VelocityOutOfRange {
                velocity,
                tick: start_time,
            })?;

        let note = Note {
            pitch,
            velocity,
            start_time,
            duration: grid.ticks_per_step,
        };
        log::trace!(
            "cell ({}, {}) -> pitch {} (raw {}) velocity {} at tick {}",
            sample.x,
            sample.y,
            note.pitch,
            raw,
            note.velocity,
            note.start_time
        );
        notes.push(note);
    }

    log::debug!(
        "mapped {} of {} cells to notes, {} ticks per step",
        notes.len(),
        samples.len(),
        grid.ticks_per_step
    );
    Ok(notes)
}
