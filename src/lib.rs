// Scorewright - MIDI event stream to quantized text score
// Module declarations

pub mod events;
pub mod groove;
pub mod pipeline;
pub mod score;

pub use events::{decode_smf, Event, EventKind, SmfError, SourceSequence};
pub use pipeline::{transform, transform_smf, ConfigError, Score, ScoreConfig, TrackScore, TransformError};
pub use score::{GlobalMusicInfo, NoteEvent, TrackData};
