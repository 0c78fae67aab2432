// Track Reconstruction - Pairs onsets with releases into closed notes
// One left-to-right pass per track with a fixed 128-slot active-note table

use serde::{Deserialize, Serialize};

use super::chords;
use super::instruments::InstrumentTable;
use super::note::NoteEvent;
use super::phrase::PhraseStructure;
use crate::events::{Event, EventKind};
use crate::groove::quantize::classify_duration;
use crate::groove::rhythm::RhythmType;

/// Instrument name when no program change precedes the first note
pub const DEFAULT_INSTRUMENT: &str = "Unknown";

const PITCH_SLOTS: usize = 128;

/// Per-track result, filled by reconstruction then annotated in place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackData {
    pub instrument_name: String,

    /// Closed notes ordered by start tick, ties in strike order
    pub events: Vec<NoteEvent>,

    /// Highest minus lowest pitch (0 for an empty track)
    pub pitch_range: u8,

    /// Notes per tick up to the last onset
    pub note_density: f64,

    pub phrase_structure: PhraseStructure,
    pub rhythm_type: RhythmType,
}

impl TrackData {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of onset groups with two or more notes
    pub fn chord_count(&self) -> usize {
        chords::count_chords(&self.events)
    }

    /// Number of notes flagged by the tuplet pass
    pub fn tuplet_count(&self) -> usize {
        self.events.iter().filter(|e| e.is_tuplet).count()
    }
}

impl Default for TrackData {
    fn default() -> Self {
        TrackData {
            instrument_name: DEFAULT_INSTRUMENT.to_string(),
            events: Vec::new(),
            pitch_range: 0,
            note_density: 0.0,
            phrase_structure: PhraseStructure::default(),
            rhythm_type: RhythmType::default(),
        }
    }
}

/// An onset waiting for its release
#[derive(Debug, Clone, Copy)]
struct PendingOnset {
    tick: u64,
    velocity: u8,

    /// Position in the track's onset order, used to break start-tick ties
    sequence: usize,
}

/// Build the note list and aggregates for one track
///
/// - a new onset on a pitch that is still sounding replaces the old one
/// - releases without a pending onset are ignored
/// - onsets never released before the end of the track are dropped
/// - only program changes before the first onset name the instrument
pub fn reconstruct_track(
    events: &[Event],
    resolution: u32,
    duration_tolerance: f64,
    instrument_table: InstrumentTable,
) -> TrackData {
    let mut active: [Option<PendingOnset>; PITCH_SLOTS] = [None; PITCH_SLOTS];
    let mut closed: Vec<(usize, NoteEvent)> = Vec::new();
    let mut program: Option<u8> = None;
    let mut onset_count = 0usize;

    for event in events {
        if let Some(pitch) = event.released_pitch() {
            let Some(slot) = active.get_mut(pitch as usize) else {
                log::warn!("Ignoring release of out-of-range pitch {} at tick {}", pitch, event.tick);
                continue;
            };

            if let Some(onset) = slot.take() {
                let duration = event.tick.saturating_sub(onset.tick);
                let class = classify_duration(duration, resolution, duration_tolerance);
                closed.push((
                    onset.sequence,
                    NoteEvent::new(pitch, onset.tick, duration, onset.velocity, class),
                ));
            }
            continue;
        }

        match event.kind {
            EventKind::NoteOn { pitch, velocity } => {
                let Some(slot) = active.get_mut(pitch as usize) else {
                    log::warn!("Ignoring onset of out-of-range pitch {} at tick {}", pitch, event.tick);
                    continue;
                };

                if let Some(previous) = slot {
                    log::warn!(
                        "Onset of pitch {} at tick {} replaced by new onset at tick {}",
                        pitch,
                        previous.tick,
                        event.tick
                    );
                }

                *slot = Some(PendingOnset {
                    tick: event.tick,
                    velocity,
                    sequence: onset_count,
                });
                onset_count += 1;
            }
            EventKind::ProgramChange { program: value } => {
                if onset_count == 0 {
                    program = Some(value);
                } else {
                    log::debug!("Ignoring program change to {} after first note (tick {})", value, event.tick);
                }
            }
            _ => {}
        }
    }

    let unterminated = active.iter().filter(|slot| slot.is_some()).count();
    if unterminated > 0 {
        log::warn!("Dropping {} onsets without a release", unterminated);
    }

    closed.sort_by(|(seq_a, a), (seq_b, b)| a.start_tick.cmp(&b.start_tick).then(seq_a.cmp(seq_b)));
    let notes: Vec<NoteEvent> = closed.into_iter().map(|(_, note)| note).collect();

    let instrument_name = match program {
        Some(value) => instrument_table.name(value).to_string(),
        None => DEFAULT_INSTRUMENT.to_string(),
    };

    TrackData {
        instrument_name,
        pitch_range: pitch_range(&notes),
        note_density: note_density(&notes),
        events: notes,
        ..TrackData::default()
    }
}

fn pitch_range(notes: &[NoteEvent]) -> u8 {
    let highest = notes.iter().map(|n| n.pitch).max();
    let lowest = notes.iter().map(|n| n.pitch).min();
    match (highest, lowest) {
        (Some(high), Some(low)) => high - low,
        _ => 0,
    }
}

fn note_density(notes: &[NoteEvent]) -> f64 {
    let last_start = notes.last().map(|n| n.start_tick).unwrap_or(0);
    notes.len() as f64 / last_start.max(1) as f64
}
