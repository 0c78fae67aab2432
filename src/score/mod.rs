// Score Builder - Note reconstruction, structural analysis and text layout
// Turns per-track event lists into annotated notes and measure lines

pub mod chords;
pub mod format;
pub mod instruments;
pub mod metadata;
pub mod note;
pub mod phrase;
pub mod pitch;
pub mod track;

pub use chords::{group_by_onset, OnsetGroup};
pub use format::FormatOptions;
pub use instruments::InstrumentTable;
pub use metadata::{extract_global_info, GlobalMusicInfo};
pub use note::NoteEvent;
pub use phrase::{detect_phrases, Phrase, PhraseStructure};
pub use pitch::{note_name, parse_note_name, PitchNotation};
pub use track::{reconstruct_track, TrackData};
