// Rhythm Feel - Classifies a track by how many onsets land on the beat
// Coarse heuristic: on-beat ratio above 40% reads as march, below 20% as swing

use serde::{Deserialize, Serialize};
use std::fmt;

use super::grid::MeasureGrid;
use crate::score::note::NoteEvent;

const MARCH_THRESHOLD: f64 = 0.4;
const SWING_THRESHOLD: f64 = 0.2;

/// Rhythm classification of a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RhythmType {
    /// Most onsets on the beat
    March,

    /// Few onsets on the beat
    Swing,

    /// Anything in between
    Standard,
}

impl RhythmType {
    pub fn label(&self) -> &'static str {
        match self {
            RhythmType::March => "march",
            RhythmType::Swing => "swing",
            RhythmType::Standard => "standard",
        }
    }
}

impl Default for RhythmType {
    fn default() -> Self {
        RhythmType::Standard
    }
}

impl fmt::Display for RhythmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify from the share of notes starting exactly on a beat
pub fn classify_rhythm(events: &[NoteEvent], grid: &MeasureGrid) -> RhythmType {
    let total = events.len() as f64;
    let on_beat = events
        .iter()
        .filter(|e| grid.is_on_beat(e.start_tick))
        .count() as f64;

    if on_beat > total * MARCH_THRESHOLD {
        RhythmType::March
    } else if on_beat < total * SWING_THRESHOLD {
        RhythmType::Swing
    } else {
        RhythmType::Standard
    }
}
