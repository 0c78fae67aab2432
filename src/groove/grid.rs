// Musical Grid - Time signature, key signature, and tick-based measure math
// Provides the measure structure shared by phrasing, rhythm detection and formatting

use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest accepted denominator power (2^7 = 128th note)
const MAX_DENOMINATOR_POWER: u8 = 7;

/// Musical time signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSignature {
    /// Beats per measure (e.g. 3 in 3/4)
    pub numerator: u8,

    /// Note value that gets one beat (e.g. 4 in 3/4)
    pub denominator: u32,
}

impl TimeSignature {
    /// 4/4 time - the default when the stream carries no signature
    pub const COMMON: TimeSignature = TimeSignature {
        numerator: 4,
        denominator: 4,
    };

    /// Build from the encoded form (denominator as a power of two)
    /// Returns None for a zero numerator or an out-of-range power
    pub fn from_power(numerator: u8, denominator_power: u8) -> Option<Self> {
        if numerator == 0 || denominator_power > MAX_DENOMINATOR_POWER {
            return None;
        }

        Some(TimeSignature {
            numerator,
            denominator: 1u32 << denominator_power,
        })
    }

    /// Get number of beats per measure
    pub fn beats_per_measure(&self) -> u32 {
        self.numerator as u32
    }

    /// Measure length in ticks. One beat is counted as one quarter note.
    pub fn measure_ticks(&self, resolution: u32) -> u64 {
        self.beats_per_measure() as u64 * resolution as u64
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        TimeSignature::COMMON
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Major key names on the circle of fifths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeySignature {
    CFlat,
    GFlat,
    DFlat,
    AFlat,
    EFlat,
    BFlat,
    F,
    C,
    G,
    D,
    A,
    E,
    B,
    FSharp,
    CSharp,
}

/// Key table ordered by circle-of-fifths offset, -7 (seven flats) first
const KEY_TABLE: [KeySignature; 15] = [
    KeySignature::CFlat,
    KeySignature::GFlat,
    KeySignature::DFlat,
    KeySignature::AFlat,
    KeySignature::EFlat,
    KeySignature::BFlat,
    KeySignature::F,
    KeySignature::C,
    KeySignature::G,
    KeySignature::D,
    KeySignature::A,
    KeySignature::E,
    KeySignature::B,
    KeySignature::FSharp,
    KeySignature::CSharp,
];

impl KeySignature {
    /// Look up a key from its signed sharps/flats count
    /// Returns None outside -7..=7
    pub fn from_key_code(key_code: i8) -> Option<Self> {
        if !(-7..=7).contains(&key_code) {
            return None;
        }

        let index = (key_code as i32 + 7).rem_euclid(KEY_TABLE.len() as i32) as usize;
        Some(KEY_TABLE[index])
    }

    /// Display name (e.g. "F#", "Bb")
    pub fn name(&self) -> &'static str {
        match self {
            KeySignature::CFlat => "Cb",
            KeySignature::GFlat => "Gb",
            KeySignature::DFlat => "Db",
            KeySignature::AFlat => "Ab",
            KeySignature::EFlat => "Eb",
            KeySignature::BFlat => "Bb",
            KeySignature::F => "F",
            KeySignature::C => "C",
            KeySignature::G => "G",
            KeySignature::D => "D",
            KeySignature::A => "A",
            KeySignature::E => "E",
            KeySignature::B => "B",
            KeySignature::FSharp => "F#",
            KeySignature::CSharp => "C#",
        }
    }
}

impl Default for KeySignature {
    fn default() -> Self {
        KeySignature::C
    }
}

impl fmt::Display for KeySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tick-based measure grid for one piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasureGrid {
    resolution: u32,
    measure_ticks: u64,
}

impl MeasureGrid {
    /// Create a grid from the resolution (PPQ) and meter
    pub fn new(resolution: u32, time_signature: TimeSignature) -> Self {
        MeasureGrid {
            resolution: resolution.max(1),
            measure_ticks: time_signature.measure_ticks(resolution).max(1),
        }
    }

    /// Ticks per quarter note
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Measure length in ticks
    pub fn measure_ticks(&self) -> u64 {
        self.measure_ticks
    }

    /// Measure index (0-based) containing a tick
    pub fn measure_index(&self, tick: u64) -> u64 {
        tick / self.measure_ticks
    }

    /// First tick of a measure (0-based index)
    pub fn measure_start(&self, index: u64) -> u64 {
        index * self.measure_ticks
    }

    /// First tick after a measure (0-based index)
    pub fn measure_end(&self, index: u64) -> u64 {
        (index + 1) * self.measure_ticks
    }

    /// Whether a tick lands exactly on a beat
    pub fn is_on_beat(&self, tick: u64) -> bool {
        tick % self.resolution as u64 == 0
    }
}
