//! Linear note events.

use crate::mapper::Note;

/// Kind of channel event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Key press.
    NoteOn,
    /// Key release, written as a note-on with velocity 0.
    NoteOff,
}

/// A note event at an absolute tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MidiEvent {
    /// Absolute time in ticks.
    pub ticks: u32,
    /// On or off.
    pub kind: EventKind,
    /// MIDI key.
    pub pitch: u8,
    /// Velocity; always 0 for [`EventKind::NoteOff`].
    pub velocity: u8,
}

impl MidiEvent {
    /// Note-on at `ticks`.
    pub fn note_on(ticks: u32, pitch: u8, velocity: u8) -> Self {
        Self {
            ticks,
            kind: EventKind::NoteOn,
            pitch,
            velocity,
        }
    }

    /// Note-off at `ticks`.
    pub fn note_off(ticks: u32, pitch: u8) -> Self {
        Self {
            ticks,
            kind: EventKind::NoteOff,
            pitch,
            velocity: 0,
        }
    }
}

/// Expands notes into on/off events sorted by tick.
///
/// The sort is stable, so events sharing a tick keep the order in which the
/// notes produced them: the on event of a note always precedes its off event,
/// and at a column boundary the earlier column's offs come before any ons
/// emitted later in note order.
pub fn build_event_stream(notes: &[Note]) -> Vec<MidiEvent> {
    let mut events = Vec::with_capacity(notes.len() * 2);
    for note in notes {
        events.push(MidiEvent::note_on(note.start_time, note.pitch, note.velocity));
        events.push(MidiEvent::note_off(note.end_time(), note.pitch));
    }
    events.sort_by_key(|event| event.ticks);
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn note(pitch: u8, start_time: u32, duration: u32) -> Note {
        Note {
            pitch,
            velocity: 100,
            start_time,
            duration,
        }
    }

    #[test]
    fn test_two_events_per_note() {
        let events = build_event_stream(&[note(60, 0, 120)]);
        assert_eq!(
            events,
            vec![MidiEvent::note_on(0, 60, 100), MidiEvent::note_off(120, 60)]
        );
    }

    #[test]
    fn test_events_sorted_by_tick() {
        let events = build_event_stream(&[note(72, 240, 120), note(60, 0, 120)]);
        let ticks: Vec<u32> = events.iter().map(|e| e.ticks).collect();
        assert_eq!(ticks, vec![0, 120, 240, 360]);
    }

    #[test]
    fn test_ties_keep_encounter_order() {
        // column 0 at pitches 80 then 70, column 1 at pitch 60
        let notes = [note(80, 0, 60), note(70, 0, 60), note(60, 60, 60)];
        let events = build_event_stream(&notes);
        let summary: Vec<(u32, EventKind, u8)> =
            events.iter().map(|e| (e.ticks, e.kind, e.pitch)).collect();
        assert_eq!(
            summary,
            vec![
                (0, EventKind::NoteOn, 80),
                (0, EventKind::NoteOn, 70),
                (60, EventKind::NoteOff, 80),
                (60, EventKind::NoteOff, 70),
                (60, EventKind::NoteOn, 60),
                (120, EventKind::NoteOff, 60),
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(build_event_stream(&[]).is_empty());
    }
}
