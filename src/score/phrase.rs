// Phrase Structure - Cadence-based phrase detection per track
// Marks measures whose closing two notes step down onto a C pitch class

use serde::{Deserialize, Serialize};

use super::note::NoteEvent;
use crate::groove::grid::MeasureGrid;

/// Marker appended to the summary for every cadence
const CADENCE_MARKER: &str = "A";

/// Summary used when no cadence is found
pub const NO_CADENCE_SUMMARY: &str = "Main theme";

/// A run of measures closed by a cadence (or by the end of the track)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phrase {
    /// First measure (1-based)
    pub start_measure: u64,

    /// Last measure (1-based, inclusive)
    pub end_measure: u64,
}

impl Phrase {
    pub fn new(start_measure: u64, end_measure: u64) -> Self {
        Phrase {
            start_measure,
            end_measure,
        }
    }

    /// Get the length of this phrase in measures
    pub fn length_measures(&self) -> u64 {
        self.end_measure + 1 - self.start_measure
    }

    /// Check if a measure number falls within this phrase
    pub fn contains_measure(&self, measure: u64) -> bool {
        measure >= self.start_measure && measure <= self.end_measure
    }
}

/// Result of the phrase pass for one track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseStructure {
    /// One marker per cadence, or the fallback text
    pub summary: String,

    /// Measures (1-based) ending in a cadence
    pub cadence_measures: Vec<u64>,

    /// Phrase spans covering every measure up to the last onset
    pub phrases: Vec<Phrase>,
}

impl PhraseStructure {
    pub fn cadence_count(&self) -> usize {
        self.cadence_measures.len()
    }
}

impl Default for PhraseStructure {
    fn default() -> Self {
        PhraseStructure {
            summary: NO_CADENCE_SUMMARY.to_string(),
            cadence_measures: Vec::new(),
            phrases: Vec::new(),
        }
    }
}

/// Detect cadences measure by measure over a start-ordered note list
///
/// For each measure the closing note is the last note starting before the
/// measure's end, wherever it starts. A cadence needs a preceding note with a
/// higher pitch and a closing pitch class of C. A silent measure re-reads the
/// closing pair of the measure before it.
pub fn detect_phrases(events: &[NoteEvent], grid: &MeasureGrid) -> PhraseStructure {
    let Some(last) = events.last() else {
        return PhraseStructure::default();
    };

    let measure_count = grid.measure_index(last.start_tick) + 1;
    let mut cadence_measures = Vec::new();

    for index in 0..measure_count {
        let end = grid.measure_end(index);
        let closing = events.partition_point(|e| e.start_tick < end);
        if closing < 2 {
            continue;
        }

        let last_note = &events[closing - 1];
        let previous = &events[closing - 2];
        if previous.pitch > last_note.pitch && last_note.pitch % 12 == 0 {
            cadence_measures.push(index + 1);
        }
    }

    let summary = if cadence_measures.is_empty() {
        NO_CADENCE_SUMMARY.to_string()
    } else {
        CADENCE_MARKER.repeat(cadence_measures.len())
    };

    let phrases = build_phrases(&cadence_measures, measure_count);

    PhraseStructure {
        summary,
        cadence_measures,
        phrases,
    }
}

/// Split measures 1..=measure_count at each cadence
fn build_phrases(cadence_measures: &[u64], measure_count: u64) -> Vec<Phrase> {
    let mut phrases = Vec::new();
    let mut start = 1;

    for &cadence in cadence_measures {
        phrases.push(Phrase::new(start, cadence));
        start = cadence + 1;
    }

    if start <= measure_count {
        phrases.push(Phrase::new(start, measure_count));
    }

    phrases
}
