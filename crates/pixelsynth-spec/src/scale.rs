//! Closed scale and pitch-class enumerations.
//!
//! Scales are modeled as a tagged enumeration with a fixed interval set per
//! variant, so an unknown scale name is rejected while parsing settings
//! instead of surfacing halfway through a generation run.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a scale or root-note name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseScaleError {
    /// Unknown scale name.
    #[error("unknown scale '{0}' (expected chromatic, major, minor, pentatonic_major, pentatonic_minor, blues, or diminished)")]
    UnknownScale(String),

    /// Unknown root note name.
    #[error("unknown root note '{0}' (expected one of C, C#, D, D#, E, F, F#, G, G#, A, A#, B)")]
    UnknownPitchClass(String),
}

/// Musical scale used to quantize generated pitches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Scale {
    /// Pass-through: every pitch is kept as-is.
    #[default]
    Chromatic,
    /// Major (Ionian): W W H W W W H.
    Major,
    /// Natural minor (Aeolian): W H W W H W W.
    Minor,
    /// Major pentatonic.
    PentatonicMajor,
    /// Minor pentatonic.
    PentatonicMinor,
    /// Minor pentatonic with the flat fifth.
    Blues,
    /// Whole-half octatonic.
    Diminished,
}

impl Scale {
    /// Every scale, in declaration order.
    pub const ALL: [Scale; 7] = [
        Scale::Chromatic,
        Scale::Major,
        Scale::Minor,
        Scale::PentatonicMajor,
        Scale::PentatonicMinor,
        Scale::Blues,
        Scale::Diminished,
    ];

    /// Semitone offsets from the root that belong to this scale.
    pub fn intervals(&self) -> &'static [u8] {
        match self {
            Scale::Chromatic => &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
            Scale::Major => &[0, 2, 4, 5, 7, 9, 11],
            Scale::Minor => &[0, 2, 3, 5, 7, 8, 10],
            Scale::PentatonicMajor => &[0, 2, 4, 7, 9],
            Scale::PentatonicMinor => &[0, 3, 5, 7, 10],
            Scale::Blues => &[0, 3, 5, 6, 7, 10],
            Scale::Diminished => &[0, 2, 3, 5, 6, 8, 9, 11],
        }
    }

    /// Returns true for the pass-through scale.
    pub fn is_chromatic(&self) -> bool {
        matches!(self, Scale::Chromatic)
    }

    /// Returns true if `pitch` belongs to this scale rooted at `root`.
    ///
    /// The pitch class is `(pitch - root + 120) mod 12`; the +120 bias keeps
    /// the operand non-negative for every pitch the mapper can produce.
    pub fn contains(&self, pitch: i32, root: PitchClass) -> bool {
        if self.is_chromatic() {
            return true;
        }
        let relative = (pitch - root.index() as i32 + 120).rem_euclid(12) as u8;
        self.intervals().contains(&relative)
    }

    /// Snake-case identifier, as used in settings JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scale::Chromatic => "chromatic",
            Scale::Major => "major",
            Scale::Minor => "minor",
            Scale::PentatonicMajor => "pentatonic_major",
            Scale::PentatonicMinor => "pentatonic_minor",
            Scale::Blues => "blues",
            Scale::Diminished => "diminished",
        }
    }
}

impl std::fmt::Display for Scale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Scale {
    type Err = ParseScaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Scale::ALL
            .iter()
            .copied()
            .find(|scale| scale.as_str() == normalized)
            .ok_or_else(|| ParseScaleError::UnknownScale(s.to_string()))
    }
}

/// One of the twelve pitch classes, used as the scale root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PitchClass {
    #[default]
    #[serde(rename = "C")]
    C,
    #[serde(rename = "C#")]
    CSharp,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "D#")]
    DSharp,
    #[serde(rename = "E")]
    E,
    #[serde(rename = "F")]
    F,
    #[serde(rename = "F#")]
    FSharp,
    #[serde(rename = "G")]
    G,
    #[serde(rename = "G#")]
    GSharp,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A#")]
    ASharp,
    #[serde(rename = "B")]
    B,
}

impl PitchClass {
    /// All pitch classes, indexed by semitone above C.
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::CSharp,
        PitchClass::D,
        PitchClass::DSharp,
        PitchClass::E,
        PitchClass::F,
        PitchClass::FSharp,
        PitchClass::G,
        PitchClass::GSharp,
        PitchClass::A,
        PitchClass::ASharp,
        PitchClass::B,
    ];

    /// Semitones above C (0-11).
    pub fn index(&self) -> u8 {
        *self as u8
    }

    /// Sharp-spelled name ("C", "C#", ...).
    pub fn name(&self) -> &'static str {
        const NAMES: [&str; 12] = [
            "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
        ];
        NAMES[self.index() as usize]
    }
}

impl std::fmt::Display for PitchClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for PitchClass {
    type Err = ParseScaleError;

    /// Accepts sharp names plus the common flat spellings (`Db`, `Eb`, `Gb`, `Ab`, `Bb`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let letter = chars.next().map(|c| c.to_ascii_uppercase());
        let accidental: String = chars.collect();

        let natural = match letter {
            Some('C') => 0,
            Some('D') => 2,
            Some('E') => 4,
            Some('F') => 5,
            Some('G') => 7,
            Some('A') => 9,
            Some('B') => 11,
            _ => return Err(ParseScaleError::UnknownPitchClass(s.to_string())),
        };

        let index = match accidental.as_str() {
            "" => natural,
            "#" | "s" | "sharp" => natural + 1,
            "b" | "flat" => natural + 11,
            _ => return Err(ParseScaleError::UnknownPitchClass(s.to_string())),
        };

        Ok(PitchClass::ALL[index % 12])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_intervals() {
        assert_eq!(Scale::Chromatic.intervals().len(), 12);
        assert_eq!(Scale::Major.intervals(), &[0, 2, 4, 5, 7, 9, 11]);
        assert_eq!(Scale::Blues.intervals(), &[0, 3, 5, 6, 7, 10]);
        assert_eq!(Scale::Diminished.intervals().len(), 8);
    }

    #[test]
    fn test_scale_contains_with_root() {
        // C major
        assert!(Scale::Major.contains(60, PitchClass::C));
        assert!(!Scale::Major.contains(61, PitchClass::C));
        // D major has F# (66) but not F (65)
        assert!(Scale::Major.contains(66, PitchClass::D));
        assert!(!Scale::Major.contains(65, PitchClass::D));
        // low pitches below the root still resolve
        assert!(Scale::Minor.contains(0, PitchClass::B) == Scale::Minor.contains(12, PitchClass::B));
    }

    #[test]
    fn test_chromatic_contains_everything() {
        for pitch in 0..128 {
            assert!(Scale::Chromatic.contains(pitch, PitchClass::GSharp));
        }
    }

    #[test]
    fn test_scale_parse() {
        assert_eq!("major".parse::<Scale>().unwrap(), Scale::Major);
        assert_eq!("Pentatonic-Minor".parse::<Scale>().unwrap(), Scale::PentatonicMinor);
        assert_eq!("pentatonic major".parse::<Scale>().unwrap(), Scale::PentatonicMajor);
        assert!("lydian".parse::<Scale>().is_err());
    }

    #[test]
    fn test_scale_serde_names() {
        let json = serde_json::to_string(&Scale::PentatonicMajor).unwrap();
        assert_eq!(json, "\"pentatonic_major\"");
        let parsed: Scale = serde_json::from_str("\"blues\"").unwrap();
        assert_eq!(parsed, Scale::Blues);
    }

    #[test]
    fn test_pitch_class_index_and_name() {
        assert_eq!(PitchClass::C.index(), 0);
        assert_eq!(PitchClass::FSharp.index(), 6);
        assert_eq!(PitchClass::B.index(), 11);
        assert_eq!(PitchClass::ASharp.name(), "A#");
    }

    #[test]
    fn test_pitch_class_parse() {
        assert_eq!("C#".parse::<PitchClass>().unwrap(), PitchClass::CSharp);
        assert_eq!("bb".parse::<PitchClass>().unwrap(), PitchClass::ASharp);
        assert_eq!("Cb".parse::<PitchClass>().unwrap(), PitchClass::B);
        assert_eq!("g".parse::<PitchClass>().unwrap(), PitchClass::G);
        assert!("H".parse::<PitchClass>().is_err());
        assert!("C##".parse::<PitchClass>().is_err());
        assert!("".parse::<PitchClass>().is_err());
    }

    #[test]
    fn test_pitch_class_serde_names() {
        let json = serde_json::to_string(&PitchClass::DSharp).unwrap();
        assert_eq!(json, "\"D#\"");
        let parsed: PitchClass = serde_json::from_str("\"G#\"").unwrap();
        assert_eq!(parsed, PitchClass::GSharp);
    }

    #[test]
    fn test_every_non_chromatic_scale_has_a_member_within_eleven_semitones() {
        for scale in Scale::ALL {
            for root in PitchClass::ALL {
                for pitch in 0..128 {
                    let found = (0..12).any(|offset| {
                        scale.contains(pitch + offset, root) || scale.contains(pitch - offset, root)
                    });
                    assert!(found, "{} {} {}", scale, root, pitch);
                }
            }
        }
    }
}
