// Pitch Notation - MIDI note numbers to and from scientific pitch names
// C4 = 60, sharps spelling on output, sharps or flats accepted on input

use serde::{Deserialize, Serialize};

const SHARP_NAMES: [&str; 12] = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];

/// How pitches are written in measure lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PitchNotation {
    /// Raw MIDI numbers (60)
    Midi,

    /// Scientific pitch names (C4)
    Named,
}

impl Default for PitchNotation {
    fn default() -> Self {
        PitchNotation::Midi
    }
}

/// Scientific pitch name for a MIDI note number (60 -> "C4")
pub fn note_name(pitch: u8) -> String {
    let octave = (pitch / 12) as i32 - 1;
    format!("{}{}", SHARP_NAMES[(pitch % 12) as usize], octave)
}

/// Parse a scientific pitch name back to a MIDI note number
///
/// Accepts an upper or lower case letter, an optional `#` or `b`, and an
/// octave from -1 to 9. Returns None for anything outside 0..=127.
pub fn parse_note_name(name: &str) -> Option<u8> {
    let mut chars = name.trim().chars();
    let letter = chars.next()?.to_ascii_uppercase();
    let base: i32 = match letter {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };

    let rest = chars.as_str();
    let (offset, octave_text) = if let Some(stripped) = rest.strip_prefix('#') {
        (1, stripped)
    } else if let Some(stripped) = rest.strip_prefix('b') {
        (-1, stripped)
    } else {
        (0, rest)
    };

    let octave: i32 = octave_text.parse().ok()?;
    if !(-1..=9).contains(&octave) {
        return None;
    }

    let midi = (octave + 1) * 12 + base + offset;
    u8::try_from(midi).ok().filter(|m| *m <= 127)
}

/// Render a pitch in the chosen notation
pub fn format_pitch(pitch: u8, notation: PitchNotation) -> String {
    match notation {
        PitchNotation::Midi => pitch.to_string(),
        PitchNotation::Named => note_name(pitch),
    }
}
