// Pipeline execution module
// Configuration and the end-to-end event-to-score transform

pub mod config;
pub mod transform;

pub use config::{ConfigError, ScoreConfig};
pub use transform::{annotate_track, render_default, transform, transform_smf, Score, TrackScore, TransformError};
