// Score Transform - Runs every pass from raw events to the rendered score
// Metadata once, then per track: reconstruct, tuplets, phrases, rhythm, layout

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::config::{ConfigError, ScoreConfig};
use crate::events::{decode_smf, SmfError, SourceSequence};
use crate::groove::grid::MeasureGrid;
use crate::groove::rhythm::classify_rhythm;
use crate::groove::tuplet::detect_tuplets;
use crate::score::format;
use crate::score::metadata::{extract_global_info, GlobalMusicInfo};
use crate::score::phrase::detect_phrases;
use crate::score::track::{reconstruct_track, TrackData};

/// Errors that stop a transform before any track is processed
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("Invalid resolution: {0} ticks per quarter note")]
    InvalidResolution(u32),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to decode MIDI file: {0}")]
    Decode(#[from] SmfError),
}

/// One input track with its annotated notes and rendered measure lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackScore {
    /// 1-based position in the input
    pub number: usize,

    pub data: TrackData,

    /// Measure lines, empty when the track has no notes
    pub lines: Vec<String>,
}

/// Complete transform output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub info: GlobalMusicInfo,

    /// Rendered header block
    pub header: Vec<String>,

    /// Every input track in order, including empty ones
    pub tracks: Vec<TrackScore>,
}

impl Score {
    /// Number of input tracks, empty ones included
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Tracks that appear in the rendered text
    pub fn emitted_tracks(&self) -> impl Iterator<Item = &TrackScore> {
        self.tracks.iter().filter(|t| !t.data.is_empty())
    }

    /// Full text score
    pub fn render(&self) -> String {
        let mut lines: Vec<String> = self.header.clone();
        for track in self.emitted_tracks() {
            lines.extend(format::format_track_block(track.number, &track.data, &track.lines));
        }

        let mut text = lines.join("\n");
        text.push('\n');
        text
    }

    /// Pretty JSON form of the whole score
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Transform a decoded event sequence into a score
///
/// Fails only on a zero resolution or an invalid configuration. Problems in
/// individual events are logged and skipped.
pub fn transform(source: &SourceSequence, config: &ScoreConfig) -> Result<Score, TransformError> {
    config.validate()?;
    if source.resolution == 0 {
        return Err(TransformError::InvalidResolution(source.resolution));
    }

    let resolution = source.resolution;
    let info = extract_global_info(&source.tracks, resolution);
    let grid = info.measure_grid();
    let options = config.format_options();

    let tracks: Vec<TrackScore> = source
        .tracks
        .iter()
        .enumerate()
        .map(|(idx, events)| {
            let mut data = reconstruct_track(
                events,
                resolution,
                config.duration_tolerance,
                config.instrument_table,
            );
            annotate_track(&mut data, &grid, config);
            log_track(idx + 1, &data);

            let lines = format::format_measures(&data.events, &grid, &options);
            TrackScore {
                number: idx + 1,
                data,
                lines,
            }
        })
        .collect();

    let header = format::format_header(&info, &options);

    let score = Score {
        info,
        header,
        tracks,
    };

    log::info!(
        "Transformed {} tracks at {} PPQ ({} with notes)",
        score.track_count(),
        resolution,
        score.emitted_tracks().count()
    );

    Ok(score)
}

/// Decode SMF bytes and transform them in one step
pub fn transform_smf(data: &[u8], config: &ScoreConfig) -> Result<Score, TransformError> {
    let source = decode_smf(data)?;
    transform(&source, config)
}

/// Run the structural passes over a reconstructed track, in order
pub fn annotate_track(track: &mut TrackData, grid: &MeasureGrid, config: &ScoreConfig) {
    if track.is_empty() {
        return;
    }

    detect_tuplets(&mut track.events, grid.resolution(), config.tuplet_tolerance);
    track.phrase_structure = detect_phrases(&track.events, grid);
    track.rhythm_type = classify_rhythm(&track.events, grid);
}

fn log_track(number: usize, track: &TrackData) {
    if track.is_empty() {
        log::debug!("Track {}: no notes, skipped in output", number);
        return;
    }

    log::debug!(
        "Track {} ({}): {} notes, {} chords, {} tuplet notes, {} cadences, {} rhythm",
        number,
        track.instrument_name,
        track.events.len(),
        track.chord_count(),
        track.tuplet_count(),
        track.phrase_structure.cadence_count(),
        track.rhythm_type
    );
}

/// Render with default options, for callers that only need the text
pub fn render_default(source: &SourceSequence) -> Result<String, TransformError> {
    Ok(transform(source, &ScoreConfig::default())?.render())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Event;
    use crate::groove::rhythm::RhythmType;
    use crate::score::pitch::PitchNotation;

    fn sequence(tracks: Vec<Vec<Event>>) -> SourceSequence {
        tracks
            .into_iter()
            .fold(SourceSequence::new(480), |seq, track| seq.with_track(track))
    }

    fn quiet_config() -> ScoreConfig {
        ScoreConfig {
            include_legend: false,
            ..ScoreConfig::default()
        }
    }

    #[test]
    fn test_single_quarter_note_full_text() {
        let source = sequence(vec![vec![Event::note_on(0, 60, 64), Event::note_off(480, 60)]]);

        let score = transform(&source, &quiet_config()).unwrap();

        let expected = "\
// ==================== Score ====================
// Title: Untitled
// Composer: Unknown
// Tempo: 120 BPM
// Time signature: 4/4
// Key: C
// Resolution: 1/480 tick
// ===============================================

// Tempo changes:

=== Track 1: Unknown ===
// Phrases: Main theme
// Rhythm: march
|1| 60_q

";
        assert_eq!(score.render(), expected);
        assert_eq!(score.tracks[0].data.rhythm_type, RhythmType::March);
    }

    #[test]
    fn test_metadata_defaults() {
        let score = transform(&SourceSequence::new(480), &ScoreConfig::default()).unwrap();

        assert_eq!(score.info.title, "Untitled");
        assert_eq!(score.info.composer, "Unknown");
        assert_eq!(score.info.bpm, 120.0);
        assert_eq!(score.info.time_signature.to_string(), "4/4");
        assert_eq!(score.info.key_signature.name(), "C");
        assert_eq!(score.track_count(), 0);
        assert!(score.render().contains("// Marks: . = dotted"));
    }

    #[test]
    fn test_chord_rendered_once() {
        let source = sequence(vec![vec![
            Event::note_on(0, 60, 80),
            Event::note_on(0, 64, 80),
            Event::note_off(480, 60),
            Event::note_off(480, 64),
        ]]);

        let score = transform(&source, &ScoreConfig::default()).unwrap();
        let track = &score.tracks[0];

        assert_eq!(track.data.chord_count(), 1);
        assert_eq!(track.lines, vec!["|1| [60_q,64_q]"]);
    }

    #[test]
    fn test_onsets_only_track_is_counted_not_emitted() {
        let source = sequence(vec![
            vec![Event::track_name(0, "Sketch"), Event::tempo(0, 500_000)],
            vec![Event::note_on(0, 60, 80), Event::note_on(480, 62, 80)],
            vec![Event::note_on(0, 67, 80), Event::note_off(960, 67)],
        ]);

        let score = transform(&source, &ScoreConfig::default()).unwrap();

        assert_eq!(score.track_count(), 3);
        assert!(score.tracks[1].data.is_empty());
        assert!(score.tracks[1].lines.is_empty());

        let emitted: Vec<usize> = score.emitted_tracks().map(|t| t.number).collect();
        assert_eq!(emitted, vec![3]);

        let text = score.render();
        assert!(text.contains("// Title: Sketch"));
        assert!(text.contains("//   - beat 0.00: 120 BPM"));
        assert!(text.contains("=== Track 3: Unknown ==="));
        assert!(!text.contains("=== Track 1"));
        assert!(!text.contains("=== Track 2"));
        assert!(text.contains("|1| 67_h"));
    }

    #[test]
    fn test_tuplets_and_dynamics_in_output() {
        let source = sequence(vec![vec![
            Event::program_change(0, 40),
            Event::note_on(0, 60, 80),
            Event::note_off(80, 60),
            Event::note_on(80, 62, 120),
            Event::note_off(160, 62),
            Event::note_on(160, 64, 30),
            Event::note_off(480, 64),
        ]]);

        let score = transform(&source, &ScoreConfig::default()).unwrap();
        let track = &score.tracks[0];

        assert_eq!(track.data.instrument_name, "Bassoon");
        assert_eq!(track.data.tuplet_count(), 3);
        assert_eq!(track.lines, vec!["|1| 60t_(0.17) 62tf_(0.17) 64tp_e."]);
    }

    #[test]
    fn test_measures_follow_time_signature() {
        let source = sequence(vec![vec![
            Event::time_signature(0, 3, 2),
            Event::note_on(0, 64, 80),
            Event::note_off(480, 64),
            Event::note_on(1440, 62, 80),
            Event::note_off(1920, 62),
            Event::note_on(1920, 60, 80),
            Event::note_off(2880, 60),
        ]]);

        let score = transform(&source, &ScoreConfig::default()).unwrap();
        let track = &score.tracks[0];

        assert_eq!(track.lines, vec!["|1| 64_q", "|2| 62_q 60_h"]);
        assert_eq!(track.data.phrase_structure.summary, "A");
        assert_eq!(track.data.phrase_structure.cadence_measures, vec![2]);
    }

    #[test]
    fn test_named_pitch_config() {
        let source = sequence(vec![vec![Event::note_on(0, 69, 80), Event::note_off(960, 69)]]);
        let config = ScoreConfig {
            pitch_notation: PitchNotation::Named,
            ..ScoreConfig::default()
        };

        let score = transform(&source, &config).unwrap();

        assert_eq!(score.tracks[0].lines, vec!["|1| A4_h"]);
    }

    #[test]
    fn test_transform_is_idempotent() {
        let source = sequence(vec![
            vec![Event::track_name(0, "Round"), Event::tempo(960, 600_000)],
            vec![
                Event::note_on(0, 72, 110),
                Event::note_on(0, 60, 40),
                Event::note_off(960, 72),
                Event::note_off(960, 60),
                Event::note_on(960, 67, 80),
                Event::note_off(1300, 67),
                Event::note_on(2000, 65, 80),
                Event::note_off(2400, 65),
            ],
        ]);
        let config = ScoreConfig::default();

        let first = transform(&source, &config).unwrap();
        let second = transform(&source, &config).unwrap();

        assert_eq!(first.render(), second.render());
        assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
        assert_eq!(first, second);
    }

    #[test]
    fn test_json_output_round_trips() {
        let source = sequence(vec![vec![Event::note_on(0, 60, 80), Event::note_off(600, 60)]]);
        let score = transform(&source, &ScoreConfig::default()).unwrap();

        let json = score.to_json().unwrap();
        let parsed: Score = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.render(), score.render());
        assert!(json.contains("\"irregular\": 1.25"));
    }

    #[test]
    fn test_zero_resolution_rejected() {
        let err = transform(&SourceSequence::new(0), &ScoreConfig::default()).unwrap_err();
        assert!(matches!(err, TransformError::InvalidResolution(0)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ScoreConfig {
            duration_tolerance: 2.0,
            ..ScoreConfig::default()
        };
        let err = transform(&SourceSequence::new(480), &config).unwrap_err();
        assert!(matches!(err, TransformError::Config(_)));
    }

    #[test]
    fn test_transform_smf_bytes() {
        use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};

        let note = |delta: u32, key: u8, vel: u8| TrackEvent {
            delta: delta.into(),
            kind: TrackEventKind::Midi {
                channel: 0.into(),
                message: MidiMessage::NoteOn {
                    key: key.into(),
                    vel: vel.into(),
                },
            },
        };
        let end = TrackEvent {
            delta: 0.into(),
            kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
        };

        let smf = Smf {
            header: Header {
                format: Format::SingleTrack,
                timing: Timing::Metrical(96.into()),
            },
            tracks: vec![vec![note(0, 60, 90), note(96, 60, 0), end]],
        };
        let mut bytes = Vec::new();
        smf.write(&mut bytes).unwrap();

        let score = transform_smf(&bytes, &ScoreConfig::default()).unwrap();

        assert_eq!(score.info.resolution, 96);
        assert_eq!(score.tracks[0].lines, vec!["|1| 60_q"]);
        assert_eq!(render_default(&decode_smf(&bytes).unwrap()).unwrap(), score.render());
    }

    #[test]
    fn test_transform_smf_rejects_garbage() {
        let err = transform_smf(b"not a midi file", &ScoreConfig::default()).unwrap_err();
        assert!(matches!(err, TransformError::Decode(_)));
    }
}
