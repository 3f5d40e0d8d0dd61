//! Binary format validators for test infrastructure.
//!
//! A small standalone Standard MIDI File walker, written against the file
//! layout rather than the backend's encoder, so structural bugs in the
//! writer cannot hide behind a shared helper.

use std::fmt;

/// Error type for format validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatError {
    /// Description of what went wrong.
    pub message: String,
    /// Byte offset where the error occurred.
    pub offset: usize,
}

impl FormatError {
    fn at(offset: usize, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SMF error at offset {}: {}", self.offset, self.message)
    }
}

impl std::error::Error for FormatError {}

/// Information extracted from a single-track Standard MIDI File.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SmfInfo {
    /// Header format field.
    pub format: u16,
    /// Header track count.
    pub num_tracks: u16,
    /// Ticks per quarter note.
    pub division: u16,
    /// Tempo meta value in microseconds per quarter, if present.
    pub tempo: Option<u32>,
    /// Note-on events with non-zero velocity.
    pub note_ons: usize,
    /// Note-on events with zero velocity.
    pub note_offs: usize,
    /// Channels used by note events.
    pub channels: Vec<u8>,
    /// Absolute tick of the last event.
    pub last_tick: u32,
    /// Whether the track ended with an end-of-track meta event.
    pub has_end_of_track: bool,
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], FormatError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| FormatError::at(self.pos, format!("need {} more bytes", n)))?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn u8(&mut self) -> Result<u8, FormatError> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16, FormatError> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> Result<u32, FormatError> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn vlq(&mut self) -> Result<u32, FormatError> {
        let start = self.pos;
        let mut value = 0u32;
        for _ in 0..4 {
            let byte = self.u8()?;
            value = (value << 7) | (byte & 0x7F) as u32;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(FormatError::at(start, "variable-length quantity longer than 4 bytes"))
    }
}

/// Validate a format-0 Standard MIDI File and summarize its contents.
///
/// Only the event kinds a single-track note file needs are accepted:
/// channel note-on (`0x9n`) and meta events. Running status is rejected.
pub fn validate_smf(data: &[u8]) -> Result<SmfInfo, FormatError> {
    let mut cur = Cursor { data, pos: 0 };
    let mut info = SmfInfo::default();

    if cur.take(4)? != b"MThd" {
        return Err(FormatError::at(0, "missing MThd chunk"));
    }
    let header_len = cur.u32()?;
    if header_len != 6 {
        return Err(FormatError::at(4, format!("MThd length {} (expected 6)", header_len)));
    }
    info.format = cur.u16()?;
    info.num_tracks = cur.u16()?;
    info.division = cur.u16()?;
    if info.division & 0x8000 != 0 {
        return Err(FormatError::at(12, "SMPTE division not expected"));
    }

    let track_start = cur.pos;
    if cur.take(4)? != b"MTrk" {
        return Err(FormatError::at(track_start, "missing MTrk chunk"));
    }
    let track_len = cur.u32()? as usize;
    let body_start = cur.pos;
    if body_start + track_len != data.len() {
        return Err(FormatError::at(
            track_start + 4,
            format!(
                "MTrk length {} does not match remaining {} bytes",
                track_len,
                data.len() - body_start
            ),
        ));
    }

    let mut tick = 0u32;
    while cur.pos < data.len() {
        if info.has_end_of_track {
            return Err(FormatError::at(cur.pos, "event after end of track"));
        }
        tick = tick
            .checked_add(cur.vlq()?)
            .ok_or_else(|| FormatError::at(cur.pos, "tick overflow"))?;
        let status_pos = cur.pos;
        let status = cur.u8()?;
        match status {
            0xFF => {
                let kind = cur.u8()?;
                let len = cur.vlq()? as usize;
                let payload = cur.take(len)?;
                match kind {
                    0x51 if len == 3 => {
                        info.tempo = Some(u32::from_be_bytes([0, payload[0], payload[1], payload[2]]));
                    }
                    0x51 => return Err(FormatError::at(status_pos, "tempo payload not 3 bytes")),
                    0x2F if len == 0 => info.has_end_of_track = true,
                    0x2F => return Err(FormatError::at(status_pos, "end of track has payload")),
                    _ => {}
                }
            }
            0x90..=0x9F => {
                let key = cur.u8()?;
                let velocity = cur.u8()?;
                if key > 127 || velocity > 127 {
                    return Err(FormatError::at(status_pos, "data byte above 127"));
                }
                let channel = status & 0x0F;
                if !info.channels.contains(&channel) {
                    info.channels.push(channel);
                }
                if velocity == 0 {
                    info.note_offs += 1;
                } else {
                    info.note_ons += 1;
                }
            }
            other => {
                return Err(FormatError::at(
                    status_pos,
                    format!("unexpected status byte 0x{:02X}", other),
                ))
            }
        }
        info.last_tick = tick;
    }

    if !info.has_end_of_track {
        return Err(FormatError::at(data.len(), "track has no end-of-track event"));
    }
    Ok(info)
}
