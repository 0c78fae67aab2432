// Note intervals
// A closed note (onset paired with its release) with its quantized duration

use serde::{Deserialize, Serialize};

use crate::groove::quantize::{DurationClass, DurationSymbol};

/// A note reconstructed from a matched onset/release pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    /// MIDI pitch (0-127)
    pub pitch: u8,

    /// Onset position in ticks
    pub start_tick: u64,

    /// Length in ticks (release tick - onset tick)
    pub duration: u64,

    /// Onset velocity (1-127)
    pub velocity: u8,

    /// Quantized duration, fixed when the note is closed
    pub duration_symbol: DurationSymbol,

    /// Whether the quantized duration is a dotted value
    pub has_dot: bool,

    /// Set by the tuplet pass
    pub is_tuplet: bool,
}

impl NoteEvent {
    pub fn new(pitch: u8, start_tick: u64, duration: u64, velocity: u8, class: DurationClass) -> Self {
        NoteEvent {
            pitch,
            start_tick,
            duration,
            velocity,
            duration_symbol: class.symbol,
            has_dot: class.dotted,
            is_tuplet: false,
        }
    }

    /// First tick after the note
    pub fn end_tick(&self) -> u64 {
        self.start_tick + self.duration
    }
}
