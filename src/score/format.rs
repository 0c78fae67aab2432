// Score Formatting - Text layout for the header block and measure lines
// Notes render as <pitch><t?><f|p?>_<duration><.?>, chords as [note,note]

use super::chords::group_by_onset;
use super::metadata::GlobalMusicInfo;
use super::note::NoteEvent;
use super::pitch::{format_pitch, PitchNotation};
use super::track::TrackData;
use crate::groove::grid::MeasureGrid;
use crate::groove::quantize::format_decimal;

const HEADER_RULE: &str = "// ==================== Score ====================";
const FOOTER_RULE: &str = "// ===============================================";

/// Options controlling note tokens
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormatOptions {
    pub pitch_notation: PitchNotation,

    /// Velocities strictly above this get the `f` mark
    pub forte_velocity: u8,

    /// Velocities strictly below this get the `p` mark
    pub piano_velocity: u8,

    /// Emit the notation legend in the header
    pub include_legend: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            pitch_notation: PitchNotation::Midi,
            forte_velocity: 100,
            piano_velocity: 50,
            include_legend: true,
        }
    }
}

/// Dynamic mark for a velocity, if any
pub fn dynamic_mark(velocity: u8, options: &FormatOptions) -> Option<char> {
    if velocity > options.forte_velocity {
        Some('f')
    } else if velocity < options.piano_velocity {
        Some('p')
    } else {
        None
    }
}

/// Render one note token
pub fn format_note(note: &NoteEvent, options: &FormatOptions) -> String {
    let mut token = format_pitch(note.pitch, options.pitch_notation);

    if note.is_tuplet {
        token.push('t');
    }
    if let Some(mark) = dynamic_mark(note.velocity, options) {
        token.push(mark);
    }

    token.push_str(&format!("_{}", note.duration_symbol));

    if note.has_dot {
        token.push('.');
    }
    token
}

/// Render a track's notes as measure lines
///
/// Each line starts with its 1-based measure label (`|3|`). Measures without
/// onsets get no line. Chords are rendered once, bracketed, in strike order.
pub fn format_measures(events: &[NoteEvent], grid: &MeasureGrid, options: &FormatOptions) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current: Option<(u64, Vec<String>)> = None;

    for group in group_by_onset(events) {
        let measure = grid.measure_index(group.start_tick);

        let token = if group.is_chord() {
            let members: Vec<String> = group
                .members(events)
                .iter()
                .map(|note| format_note(note, options))
                .collect();
            format!("[{}]", members.join(","))
        } else {
            format_note(&events[group.range.start], options)
        };

        if let Some((index, tokens)) = current.as_mut() {
            if *index == measure {
                tokens.push(token);
                continue;
            }
        }

        if let Some((index, tokens)) = current.take() {
            lines.push(measure_line(index, &tokens));
        }
        current = Some((measure, vec![token]));
    }

    if let Some((index, tokens)) = current {
        lines.push(measure_line(index, &tokens));
    }

    lines
}

fn measure_line(index: u64, tokens: &[String]) -> String {
    format!("|{}| {}", index + 1, tokens.join(" "))
}

/// Header block: metadata, optional legend, then the tempo change list
pub fn format_header(info: &GlobalMusicInfo, options: &FormatOptions) -> Vec<String> {
    let mut lines = vec![
        HEADER_RULE.to_string(),
        format!("// Title: {}", info.title),
        format!("// Composer: {}", info.composer),
        format!("// Tempo: {} BPM", format_decimal(info.bpm)),
        format!("// Time signature: {}", info.time_signature),
        format!("// Key: {}", info.key_signature),
        format!("// Resolution: 1/{} tick", info.resolution),
    ];

    if options.include_legend {
        lines.push("// Notation: <pitch>_<duration> (e.g. 60_q = middle C quarter note)".to_string());
        lines.push("// Chords: [note1_duration,note2_duration]".to_string());
        lines.push("// Durations: w h q e s t x, (ratio) = irregular in quarter notes".to_string());
        lines.push(format!(
            "// Marks: . = dotted, t = tuplet, f = velocity above {}, p = velocity below {}",
            options.forte_velocity, options.piano_velocity
        ));
    }

    lines.push(FOOTER_RULE.to_string());
    lines.push(String::new());

    lines.push("// Tempo changes:".to_string());
    for change in &info.tempo_changes {
        lines.push(format!(
            "//   - beat {:.2}: {} BPM",
            change.position,
            format_decimal(change.bpm)
        ));
    }
    lines.push(String::new());

    lines
}

/// Full block for one non-empty track: title, phrase and rhythm lines,
/// measure lines, then a blank separator
pub fn format_track_block(number: usize, track: &TrackData, measure_lines: &[String]) -> Vec<String> {
    let mut lines = Vec::with_capacity(measure_lines.len() + 4);
    lines.push(format!("=== Track {}: {} ===", number, track.instrument_name));
    lines.push(format!("// Phrases: {}", track.phrase_structure.summary));
    lines.push(format!("// Rhythm: {}", track.rhythm_type));
    lines.extend(measure_lines.iter().cloned());
    lines.push(String::new());
    lines
}
