//! Complete SMF file assembly.

use std::io::{self, Write};

use pixelsynth_spec::Settings;

use super::event::build_event_stream;
use super::header::SmfHeader;
use super::track::SmfTrack;
use crate::generate::GenerateError;
use crate::mapper::Note;

/// A format-0 Standard MIDI File.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmfFile {
    /// Header chunk.
    pub header: SmfHeader,
    /// The single track.
    pub track: SmfTrack,
}

impl SmfFile {
    /// Creates a file around one track.
    pub fn new(division: u16, track: SmfTrack) -> Self {
        Self {
            header: SmfHeader::format_0(division),
            track,
        }
    }

    /// Builds the file for `notes` using the tempo, channel, and division of `settings`.
    pub fn from_notes(notes: &[Note], settings: &Settings) -> Result<Self, GenerateError> {
        let micros = settings.micros_per_quarter();
        if !micros.is_finite() || micros < 0.0 || micros > u32::MAX as f64 {
            return Err(GenerateError::Encoding(format!(
                "bpm {} has no valid tempo encoding",
                settings.bpm
            )));
        }
        let events = build_event_stream(notes);
        let track = SmfTrack::new(micros as u32, settings.channel, events)?;
        Ok(Self::new(pixelsynth_spec::TICKS_PER_QUARTER, track))
    }

    /// Write the file to a writer.
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        self.header.write(writer)?;
        self.track.write(writer)?;
        Ok(())
    }

    /// Write the file to a byte vector.
    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write(&mut buffer)?;
        Ok(buffer)
    }

    /// Compute the BLAKE3 hash of the file bytes.
    pub fn compute_hash(&self) -> io::Result<String> {
        let bytes = self.to_bytes()?;
        Ok(blake3::hash(&bytes).to_hex().to_string())
    }
}
