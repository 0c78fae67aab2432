// Global Metadata - Title, composer, tempo map, meter and key for a whole sequence
// Single forward scan over every track; malformed events are skipped, never fatal

use serde::{Deserialize, Serialize};

use crate::events::{Event, EventKind};
use crate::groove::grid::{KeySignature, MeasureGrid, TimeSignature};
use crate::groove::tempo::{self, TempoChange, DEFAULT_BPM};

/// Title used when the stream names none
pub const DEFAULT_TITLE: &str = "Untitled";

/// Composer used when the stream names none
pub const DEFAULT_COMPOSER: &str = "Unknown";

/// Piece-wide information, built once per input and read by every track pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalMusicInfo {
    pub title: String,
    pub composer: String,

    /// Ticks per quarter note
    pub resolution: u32,

    /// Tempo at tick 0 in BPM
    pub bpm: f64,

    /// Last time signature seen in the scan
    pub time_signature: TimeSignature,

    /// Last key signature seen in the scan
    pub key_signature: KeySignature,

    /// Tempo changes ordered by beat position
    pub tempo_changes: Vec<TempoChange>,
}

impl GlobalMusicInfo {
    /// Defaults for a stream without any metadata events
    pub fn new(resolution: u32) -> Self {
        GlobalMusicInfo {
            title: DEFAULT_TITLE.to_string(),
            composer: DEFAULT_COMPOSER.to_string(),
            resolution,
            bpm: DEFAULT_BPM,
            time_signature: TimeSignature::COMMON,
            key_signature: KeySignature::C,
            tempo_changes: Vec::new(),
        }
    }

    pub fn beats_per_measure(&self) -> u32 {
        self.time_signature.beats_per_measure()
    }

    /// Measure grid for this piece's resolution and meter
    pub fn measure_grid(&self) -> MeasureGrid {
        MeasureGrid::new(self.resolution, self.time_signature)
    }
}

/// Scan all tracks once and collect the global metadata
///
/// Policies for repeated events: the last title, composer, time signature and
/// key signature seen win. Every valid tempo event is recorded; a tempo event
/// at tick 0 also sets the initial tempo. Track name text fills the title and
/// instrument name text fills the composer; empty values fall back to defaults.
pub fn extract_global_info(tracks: &[Vec<Event>], resolution: u32) -> GlobalMusicInfo {
    let mut info = GlobalMusicInfo::new(resolution);
    let mut title = String::new();
    let mut composer = String::new();

    for (track_idx, track) in tracks.iter().enumerate() {
        for event in track {
            match &event.kind {
                EventKind::TrackName(text) => {
                    title = text.clone();
                }
                EventKind::InstrumentName(text) => {
                    composer = text.clone();
                }
                EventKind::Tempo {
                    microseconds_per_quarter,
                } => match TempoChange::from_event(event.tick, resolution, *microseconds_per_quarter) {
                    Some(change) => {
                        if event.tick == 0 {
                            info.bpm = change.bpm;
                        }
                        info.tempo_changes.push(change);
                    }
                    None => {
                        log::warn!(
                            "Skipping tempo event with zero value (track {}, tick {})",
                            track_idx + 1,
                            event.tick
                        );
                    }
                },
                EventKind::TimeSignature {
                    numerator,
                    denominator_power,
                } => match TimeSignature::from_power(*numerator, *denominator_power) {
                    Some(signature) => info.time_signature = signature,
                    None => {
                        log::warn!(
                            "Skipping invalid time signature {}/2^{} (track {}, tick {})",
                            numerator,
                            denominator_power,
                            track_idx + 1,
                            event.tick
                        );
                    }
                },
                EventKind::KeySignature { key_code } => match KeySignature::from_key_code(*key_code) {
                    Some(key) => info.key_signature = key,
                    None => {
                        log::warn!(
                            "Skipping out-of-range key signature {} (track {}, tick {})",
                            key_code,
                            track_idx + 1,
                            event.tick
                        );
                    }
                },
                _ => {}
            }
        }
    }

    if !title.is_empty() {
        info.title = title;
    }
    if !composer.is_empty() {
        info.composer = composer;
    }

    tempo::sort_tempo_map(&mut info.tempo_changes);
    info
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_metadata() {
        let tracks = vec![vec![Event::note_on(0, 60, 80), Event::note_off(480, 60)]];
        let info = extract_global_info(&tracks, 480);

        assert_eq!(info.title, "Untitled");
        assert_eq!(info.composer, "Unknown");
        assert_eq!(info.bpm, 120.0);
        assert_eq!(info.time_signature, TimeSignature::COMMON);
        assert_eq!(info.key_signature, KeySignature::C);
        assert_eq!(info.resolution, 480);
        assert!(info.tempo_changes.is_empty());
    }

    #[test]
    fn test_extracts_all_fields() {
        let tracks = vec![
            vec![
                Event::track_name(0, "Nocturne"),
                Event::instrument_name(0, "F. Chopin"),
                Event::tempo(0, 750_000),
                Event::time_signature(0, 3, 2),
                Event::key_signature(0, -3),
            ],
            vec![Event::tempo(1920, 500_000)],
        ];
        let info = extract_global_info(&tracks, 480);

        assert_eq!(info.title, "Nocturne");
        assert_eq!(info.composer, "F. Chopin");
        assert!((info.bpm - 80.0).abs() < 1e-9);
        assert_eq!(info.time_signature.to_string(), "3/4");
        assert_eq!(info.key_signature, KeySignature::EFlat);
        assert_eq!(info.beats_per_measure(), 3);
        assert_eq!(info.measure_grid().measure_ticks(), 1440);

        assert_eq!(info.tempo_changes.len(), 2);
        assert_eq!(info.tempo_changes[0].position, 0.0);
        assert_eq!(info.tempo_changes[1].position, 4.0);
        assert!((info.tempo_changes[1].bpm - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_last_value_wins() {
        let tracks = vec![
            vec![Event::track_name(0, "First"), Event::time_signature(0, 3, 2)],
            vec![Event::track_name(0, "Second"), Event::time_signature(960, 6, 3)],
        ];
        let info = extract_global_info(&tracks, 480);

        assert_eq!(info.title, "Second");
        assert_eq!(info.time_signature.to_string(), "6/8");
    }

    #[test]
    fn test_empty_last_title_falls_back_to_default() {
        let tracks = vec![vec![Event::track_name(0, "Theme"), Event::track_name(0, "")]];
        let info = extract_global_info(&tracks, 480);
        assert_eq!(info.title, "Untitled");
    }

    #[test]
    fn test_name_text_kept_as_written() {
        let tracks = vec![vec![
            Event::track_name(0, " Nocturne "),
            Event::instrument_name(0, "  "),
        ]];
        let info = extract_global_info(&tracks, 480);

        assert_eq!(info.title, " Nocturne ");
        assert_eq!(info.composer, "  ");
    }

    #[test]
    fn test_later_tempo_does_not_change_initial() {
        let tracks = vec![vec![Event::tempo(480, 400_000)]];
        let info = extract_global_info(&tracks, 480);

        assert_eq!(info.bpm, 120.0);
        assert_eq!(info.tempo_changes.len(), 1);
        assert_eq!(info.tempo_changes[0].position, 1.0);
        assert!((info.tempo_changes[0].bpm - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_tempo_map_sorted_across_tracks() {
        let tracks = vec![
            vec![Event::tempo(3840, 600_000)],
            vec![Event::tempo(960, 500_000)],
        ];
        let info = extract_global_info(&tracks, 480);

        let positions: Vec<f64> = info.tempo_changes.iter().map(|c| c.position).collect();
        assert_eq!(positions, vec![2.0, 8.0]);
    }

    #[test]
    fn test_malformed_events_are_skipped() {
        let tracks = vec![vec![
            Event::time_signature(0, 3, 2),
            Event::key_signature(0, 2),
            Event::tempo(0, 0),
            Event::time_signature(0, 0, 2),
            Event::time_signature(0, 4, 30),
            Event::key_signature(0, 12),
            Event::track_name(0, "Still Parsed"),
        ]];
        let info = extract_global_info(&tracks, 480);

        assert_eq!(info.time_signature.to_string(), "3/4");
        assert_eq!(info.key_signature, KeySignature::D);
        assert_eq!(info.bpm, 120.0);
        assert!(info.tempo_changes.is_empty());
        assert_eq!(info.title, "Still Parsed");
    }
}
