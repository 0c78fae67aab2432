// Groove Engine - Meter, tempo map, duration quantization, tuplets and rhythm feel
// Tick-domain timing analysis shared by the score passes

pub mod grid;
pub mod quantize;
pub mod rhythm;
pub mod tempo;
pub mod tuplet;

pub use grid::{KeySignature, MeasureGrid, TimeSignature};
pub use quantize::{classify_duration, DurationClass, DurationSymbol, DEFAULT_DURATION_TOLERANCE};
pub use rhythm::{classify_rhythm, RhythmType};
pub use tempo::{TempoChange, DEFAULT_BPM};
pub use tuplet::{detect_tuplets, DEFAULT_TUPLET_TOLERANCE};
