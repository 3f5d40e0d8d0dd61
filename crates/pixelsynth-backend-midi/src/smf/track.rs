//! SMF track chunk.

use byteorder::{BigEndian, WriteBytesExt};
use pixelsynth_spec::{MAX_MIDI_VALUE, MAX_TEMPO_MICROS};
use std::io::{self, Write};

use super::event::{EventKind, MidiEvent};
use super::header::{
    MAX_CHANNEL, META_END_OF_TRACK, META_PREFIX, META_TEMPO, MTRK, STATUS_NOTE_ON,
};
use super::vlq::{write_vlq, MAX_VLQ_VALUE};
use crate::generate::GenerateError;

/// A single track: a tempo event, the note events, and end of track.
///
/// Construction checks every byte that will be written, so a track that
/// exists can always be serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmfTrack {
    micros_per_quarter: u32,
    channel: u8,
    events: Vec<MidiEvent>,
}

impl SmfTrack {
    /// Creates a track.
    ///
    /// `events` must be sorted by tick. Fails if the tempo does not fit in
    /// 24 bits, the channel is above 15, a tick is beyond the 28-bit delta
    /// range, a pitch is above 127, or a note-on velocity is outside 1-127.
    pub fn new(
        micros_per_quarter: u32,
        channel: u8,
        events: Vec<MidiEvent>,
    ) -> Result<Self, GenerateError> {
        if micros_per_quarter == 0 || micros_per_quarter > MAX_TEMPO_MICROS {
            return Err(GenerateError::Encoding(format!(
                "tempo of {} microseconds per quarter does not fit in 24 bits",
                micros_per_quarter
            )));
        }
        if channel > MAX_CHANNEL {
            return Err(GenerateError::Encoding(format!(
                "channel {} is above {}",
                channel, MAX_CHANNEL
            )));
        }

        let mut previous = 0;
        for event in &events {
            if event.ticks < previous {
                return Err(GenerateError::Encoding(format!(
                    "event at tick {} follows tick {}",
                    event.ticks, previous
                )));
            }
            previous = event.ticks;
            // sorted from 0, so every delta is at most the absolute tick
            if event.ticks > MAX_VLQ_VALUE {
                return Err(GenerateError::Encoding(format!(
                    "tick {} is beyond the delta-time limit of {}",
                    event.ticks, MAX_VLQ_VALUE
                )));
            }

            if event.pitch > MAX_MIDI_VALUE {
                return Err(GenerateError::PitchOutOfRange {
                    pitch: event.pitch as i32,
                    tick: event.ticks,
                });
            }
            let velocity_ok = match event.kind {
                EventKind::NoteOn => (1..=MAX_MIDI_VALUE).contains(&event.velocity),
                EventKind::NoteOff => event.velocity == 0,
            };
            if !velocity_ok {
                return Err(GenerateError::VelocityOutOfRange {
                    velocity: event.velocity as i32,
                    tick: event.ticks,
                });
            }
        }

        Ok(Self {
            micros_per_quarter,
            channel,
            events,
        })
    }

    /// Note events in this track.
    pub fn events(&self) -> &[MidiEvent] {
        &self.events
    }

    /// Write the chunk body (everything after the length field).
    pub fn write_body<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        // tempo at tick 0
        write_vlq(writer, 0)?;
        writer.write_u8(META_PREFIX)?;
        writer.write_u8(META_TEMPO)?;
        write_vlq(writer, 3)?;
        writer.write_u24::<BigEndian>(self.micros_per_quarter)?;

        let status = STATUS_NOTE_ON | self.channel;
        let mut last_tick = 0;
        for event in &self.events {
            write_vlq(writer, event.ticks - last_tick)?;
            writer.write_u8(status)?;
            writer.write_u8(event.pitch)?;
            writer.write_u8(event.velocity)?;
            last_tick = event.ticks;
        }

        write_vlq(writer, 0)?;
        writer.write_u8(META_PREFIX)?;
        writer.write_u8(META_END_OF_TRACK)?;
        write_vlq(writer, 0)?;
        Ok(())
    }

    /// Write the whole `MTrk` chunk.
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let mut body = Vec::new();
        self.write_body(&mut body)?;

        let length = u32::try_from(body.len()).map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidData, "track chunk exceeds 4 GiB")
        })?;
        writer.write_all(MTRK)?;
        writer.write_u32::<BigEndian>(length)?;
        writer.write_all(&body)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn chunk(track: &SmfTrack) -> Vec<u8> {
        let mut buf = Vec::new();
        track.write(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_empty_track_has_tempo_and_end() {
        let track = SmfTrack::new(500_000, 0, Vec::new()).unwrap();
        assert_eq!(
            chunk(&track),
            vec![
                b'M', b'T', b'r', b'k', //
                0x00, 0x00, 0x00, 0x0B, // length
                0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, // tempo 500000
                0x00, 0xFF, 0x2F, 0x00, // end of track
            ]
        );
    }

    #[test]
    fn test_note_events_use_note_on_status() {
        let events = vec![MidiEvent::note_on(0, 60, 100), MidiEvent::note_off(300, 60)];
        let track = SmfTrack::new(500_000, 3, events).unwrap();
        let mut body = Vec::new();
        track.write_body(&mut body).unwrap();
        assert_eq!(
            &body[7..body.len() - 4],
            &[
                0x00, 0x93, 60, 100, // on at 0
                0x82, 0x2C, 0x93, 60, 0x00, // off after 300 ticks
            ]
        );
    }

    #[test]
    fn test_deltas_are_relative() {
        let events = vec![
            MidiEvent::note_on(10, 60, 90),
            MidiEvent::note_on(10, 64, 90),
            MidiEvent::note_off(20, 60),
            MidiEvent::note_off(20, 64),
        ];
        let track = SmfTrack::new(500_000, 0, events).unwrap();
        let mut body = Vec::new();
        track.write_body(&mut body).unwrap();
        let deltas: Vec<u8> = body[7..body.len() - 4].chunks(4).map(|c| c[0]).collect();
        assert_eq!(deltas, vec![10, 0, 10, 0]);
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let err = SmfTrack::new(500_000, 0, vec![MidiEvent::note_on(0, 128, 100)]).unwrap_err();
        assert!(matches!(err, GenerateError::PitchOutOfRange { pitch: 128, tick: 0 }));

        let err = SmfTrack::new(500_000, 0, vec![MidiEvent::note_on(5, 60, 0)]).unwrap_err();
        assert!(matches!(err, GenerateError::VelocityOutOfRange { velocity: 0, tick: 5 }));

        let err = SmfTrack::new(500_000, 0, vec![MidiEvent::note_on(5, 60, 200)]).unwrap_err();
        assert!(matches!(err, GenerateError::VelocityOutOfRange { velocity: 200, .. }));
    }

    #[test]
    fn test_rejects_bad_tempo_and_channel() {
        assert!(SmfTrack::new(0, 0, Vec::new()).is_err());
        assert!(SmfTrack::new(MAX_TEMPO_MICROS + 1, 0, Vec::new()).is_err());
        assert!(SmfTrack::new(MAX_TEMPO_MICROS, 0, Vec::new()).is_ok());
        assert!(SmfTrack::new(500_000, 16, Vec::new()).is_err());
    }

    #[test]
    fn test_rejects_unsorted_events() {
        let events = vec![MidiEvent::note_on(20, 60, 90), MidiEvent::note_off(10, 60)];
        assert!(matches!(
            SmfTrack::new(500_000, 0, events),
            Err(GenerateError::Encoding(_))
        ));
    }

    #[test]
    fn test_rejects_ticks_beyond_vlq_range() {
        let events = vec![MidiEvent::note_on(0x2000_0000, 60, 100)];
        assert!(matches!(
            SmfTrack::new(500_000, 0, events),
            Err(GenerateError::Encoding(_))
        ));

        let events = vec![
            MidiEvent::note_on(MAX_VLQ_VALUE, 60, 100),
            MidiEvent::note_off(MAX_VLQ_VALUE, 60),
        ];
        let track = SmfTrack::new(500_000, 0, events).unwrap();
        let mut body = Vec::new();
        track.write_body(&mut body).unwrap();
    }
}
