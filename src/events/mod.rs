// Event model module
// Tick-stamped input events and the SMF adapter that produces them

pub mod smf;
pub mod types;

pub use smf::{decode_smf, SmfError};
pub use types::{Event, EventKind, SourceSequence};
