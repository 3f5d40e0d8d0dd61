//! Advisory parameter suggestions.
//!
//! An external image analyzer may propose a tempo, scale, root, and title for
//! an image. Suggestions are plain inputs: applying one yields an ordinary
//! [`Settings`] value that goes through the same validation as any other.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scale::{ParseScaleError, PitchClass, Scale};
use crate::settings::Settings;

/// Error applying a suggestion to settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SuggestionError {
    /// The suggested scale or root is not one of the known names.
    #[error("invalid suggestion: {0}")]
    Unrecognized(#[from] ParseScaleError),
}

/// Parameters proposed by an image analyzer.
///
/// The wire format uses the analyzer's camelCase keys (`suggestedBpm`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    /// Proposed tempo.
    pub suggested_bpm: f64,
    /// Proposed scale name, e.g. "pentatonic_minor".
    pub suggested_scale: String,
    /// Proposed root note name, e.g. "F#".
    pub suggested_root: String,
    /// Proposed track title.
    #[serde(default)]
    pub title: String,
    /// Short description of the image mood.
    #[serde(default)]
    pub mood_description: String,
}

impl Suggestion {
    /// Caller-policy fallback used when no analyzer is available.
    pub fn fallback() -> Self {
        Self {
            suggested_bpm: 120.0,
            suggested_scale: Scale::Minor.as_str().to_string(),
            suggested_root: PitchClass::C.name().to_string(),
            title: "Untitled Scan".to_string(),
            mood_description: "Analysis unavailable, using defaults.".to_string(),
        }
    }

    /// Returns `settings` with tempo, scale, and root replaced by the suggestion.
    ///
    /// The result is not validated here; a wild tempo is reported by
    /// [`crate::validation::validate_settings`] like any manual value.
    pub fn apply(&self, settings: Settings) -> Result<Settings, SuggestionError> {
        let scale: Scale = self.suggested_scale.parse()?;
        let root_note: PitchClass = self.suggested_root.parse()?;
        Ok(Settings {
            bpm: self.suggested_bpm,
            scale,
            root_note,
            ..settings
        })
    }
}
