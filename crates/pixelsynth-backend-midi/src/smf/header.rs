//! SMF header chunk and format constants.

use byteorder::{BigEndian, WriteBytesExt};
use std::io::{self, Write};

/// Header chunk identifier.
pub const MTHD: &[u8; 4] = b"MThd";

/// Track chunk identifier.
pub const MTRK: &[u8; 4] = b"MTrk";

/// Length of the header chunk body.
pub const MTHD_LENGTH: u32 = 6;

/// Single multi-channel track.
pub const SMF_FORMAT_0: u16 = 0;

/// Note-on status nibble; the low nibble carries the channel.
pub const STATUS_NOTE_ON: u8 = 0x90;

/// Meta event prefix.
pub const META_PREFIX: u8 = 0xFF;

/// Set Tempo meta type.
pub const META_TEMPO: u8 = 0x51;

/// End of Track meta type.
pub const META_END_OF_TRACK: u8 = 0x2F;

/// Highest channel number.
pub const MAX_CHANNEL: u8 = 15;

/// SMF header chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmfHeader {
    /// File format (0, 1, or 2).
    pub format: u16,
    /// Number of track chunks that follow.
    pub num_tracks: u16,
    /// Ticks per quarter note.
    pub division: u16,
}

impl SmfHeader {
    /// Header for a format-0 file with one track.
    pub fn format_0(division: u16) -> Self {
        Self {
            format: SMF_FORMAT_0,
            num_tracks: 1,
            division,
        }
    }

    /// Write the 14-byte header chunk.
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(MTHD)?;
        writer.write_u32::<BigEndian>(MTHD_LENGTH)?;
        writer.write_u16::<BigEndian>(self.format)?;
        writer.write_u16::<BigEndian>(self.num_tracks)?;
        writer.write_u16::<BigEndian>(self.division)?;
        Ok(())
    }
}
