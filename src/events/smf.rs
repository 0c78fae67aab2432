// SMF Import - Decode Standard MIDI Files into tick-stamped events using midly
// Produces the multi-track SourceSequence consumed by the score pipeline

use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};
use thiserror::Error;

use super::types::{Event, EventKind, SourceSequence};

/// Errors that can occur while decoding a MIDI file
#[derive(Debug, Error)]
pub enum SmfError {
    #[error("Failed to parse MIDI: {0}")]
    ParseError(#[from] midly::Error),

    #[error("Unsupported timing: SMPTE timecode ({fps} fps, {subframes} ticks per frame)")]
    UnsupportedTiming { fps: u8, subframes: u8 },

    #[error("Invalid resolution: {0} ticks per quarter note")]
    InvalidResolution(u16),
}

/// Decode SMF bytes into per-track event lists with absolute ticks
///
/// Only metrical (PPQ) timing is supported. Events that the score pipeline
/// does not consume (controllers, sysex, lyrics, ...) are dropped here.
pub fn decode_smf(data: &[u8]) -> Result<SourceSequence, SmfError> {
    let smf = Smf::parse(data)?;

    let resolution = match smf.header.timing {
        Timing::Metrical(ticks) => ticks.as_int(),
        Timing::Timecode(fps, subframes) => {
            return Err(SmfError::UnsupportedTiming {
                fps: fps.as_int(),
                subframes,
            });
        }
    };

    if resolution == 0 {
        return Err(SmfError::InvalidResolution(resolution));
    }

    let tracks: Vec<Vec<Event>> = smf.tracks.iter().map(|track| convert_track(track)).collect();

    log::debug!(
        "Decoded SMF: {} tracks, {} PPQ, {} events",
        tracks.len(),
        resolution,
        tracks.iter().map(Vec::len).sum::<usize>()
    );

    Ok(SourceSequence {
        resolution: resolution as u32,
        tracks,
    })
}

/// Convert one track, accumulating delta times into absolute ticks
fn convert_track(track: &[TrackEvent<'_>]) -> Vec<Event> {
    let mut tick: u64 = 0;
    let mut events = Vec::new();

    for event in track {
        tick += event.delta.as_int() as u64;

        if let Some(kind) = convert_kind(&event.kind) {
            events.push(Event::new(tick, kind));
        }
    }

    events
}

fn convert_kind(kind: &TrackEventKind<'_>) -> Option<EventKind> {
    match kind {
        TrackEventKind::Midi { message, .. } => match message {
            MidiMessage::NoteOn { key, vel } => Some(EventKind::NoteOn {
                pitch: key.as_int(),
                velocity: vel.as_int(),
            }),
            MidiMessage::NoteOff { key, .. } => Some(EventKind::NoteOff {
                pitch: key.as_int(),
            }),
            MidiMessage::ProgramChange { program } => Some(EventKind::ProgramChange {
                program: program.as_int(),
            }),
            _ => None,
        },
        TrackEventKind::Meta(meta) => match meta {
            MetaMessage::Tempo(tempo) => Some(EventKind::Tempo {
                microseconds_per_quarter: tempo.as_int(),
            }),
            MetaMessage::TimeSignature(numerator, denominator_power, _, _) => {
                Some(EventKind::TimeSignature {
                    numerator: *numerator,
                    denominator_power: *denominator_power,
                })
            }
            MetaMessage::KeySignature(key_code, _minor) => Some(EventKind::KeySignature {
                key_code: *key_code,
            }),
            MetaMessage::TrackName(text) => Some(EventKind::TrackName(
                String::from_utf8_lossy(text).into_owned(),
            )),
            MetaMessage::InstrumentName(text) => Some(EventKind::InstrumentName(
                String::from_utf8_lossy(text).into_owned(),
            )),
            _ => None,
        },
        _ => None,
    }
}
