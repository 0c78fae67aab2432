// Event model types
// Tick-stamped musical events as handed over by a container decoder

use serde::{Deserialize, Serialize};

/// Payload of a single timed event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Key pressed. A velocity of 0 is read as a release (running-status convention)
    NoteOn { pitch: u8, velocity: u8 },

    /// Key released
    NoteOff { pitch: u8 },

    /// Instrument change (General MIDI program number)
    ProgramChange { program: u8 },

    /// Tempo in microseconds per quarter note
    Tempo { microseconds_per_quarter: u32 },

    /// Meter. The denominator is stored as a power of two (2 = quarter note)
    TimeSignature { numerator: u8, denominator_power: u8 },

    /// Signed circle-of-fifths offset: -7 (seven flats) ..= 7 (seven sharps)
    KeySignature { key_code: i8 },

    /// Sequence/track name text
    TrackName(String),

    /// Instrument name text
    InstrumentName(String),
}

/// A musical event at an absolute tick position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Absolute position in ticks from the start of the track
    pub tick: u64,

    /// What happened at this tick
    pub kind: EventKind,
}

impl Event {
    pub fn new(tick: u64, kind: EventKind) -> Self {
        Event { tick, kind }
    }

    pub fn note_on(tick: u64, pitch: u8, velocity: u8) -> Self {
        Event::new(tick, EventKind::NoteOn { pitch, velocity })
    }

    pub fn note_off(tick: u64, pitch: u8) -> Self {
        Event::new(tick, EventKind::NoteOff { pitch })
    }

    pub fn program_change(tick: u64, program: u8) -> Self {
        Event::new(tick, EventKind::ProgramChange { program })
    }

    pub fn tempo(tick: u64, microseconds_per_quarter: u32) -> Self {
        Event::new(tick, EventKind::Tempo { microseconds_per_quarter })
    }

    pub fn time_signature(tick: u64, numerator: u8, denominator_power: u8) -> Self {
        Event::new(
            tick,
            EventKind::TimeSignature {
                numerator,
                denominator_power,
            },
        )
    }

    pub fn key_signature(tick: u64, key_code: i8) -> Self {
        Event::new(tick, EventKind::KeySignature { key_code })
    }

    pub fn track_name(tick: u64, text: impl Into<String>) -> Self {
        Event::new(tick, EventKind::TrackName(text.into()))
    }

    pub fn instrument_name(tick: u64, text: impl Into<String>) -> Self {
        Event::new(tick, EventKind::InstrumentName(text.into()))
    }

    /// Pitch released by this event, if it is a NoteOff or a zero-velocity NoteOn
    pub fn released_pitch(&self) -> Option<u8> {
        match self.kind {
            EventKind::NoteOff { pitch } => Some(pitch),
            EventKind::NoteOn { pitch, velocity: 0 } => Some(pitch),
            _ => None,
        }
    }
}

/// Multi-track input: one event list per track, plus the timing resolution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSequence {
    /// Ticks per quarter note (PPQ)
    pub resolution: u32,

    /// Events per track, each in input order
    pub tracks: Vec<Vec<Event>>,
}

impl SourceSequence {
    /// Create an empty sequence with the given resolution
    pub fn new(resolution: u32) -> Self {
        SourceSequence {
            resolution,
            tracks: Vec::new(),
        }
    }

    /// Append a track (builder style)
    pub fn with_track(mut self, events: Vec<Event>) -> Self {
        self.tracks.push(events);
        self
    }

    /// Total number of events across all tracks
    pub fn event_count(&self) -> usize {
        self.tracks.iter().map(Vec::len).sum()
    }
}
