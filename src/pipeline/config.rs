// Transform Configuration - Tolerances, dynamics thresholds and output options
// Loadable from JSON; missing fields take their defaults

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::groove::quantize::DEFAULT_DURATION_TOLERANCE;
use crate::groove::tuplet::DEFAULT_TUPLET_TOLERANCE;
use crate::score::format::FormatOptions;
use crate::score::instruments::InstrumentTable;
use crate::score::pitch::PitchNotation;

/// Errors that can occur while loading or validating a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid {name}: {value} (expected a value in [0, 1))")]
    InvalidTolerance { name: &'static str, value: f64 },

    #[error("Forte threshold {forte} must be above piano threshold {piano}")]
    InvalidDynamics { forte: u8, piano: u8 },

    #[error("Config parse error: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Settings for one score transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    /// Multiplicative band around each canonical duration
    pub duration_tolerance: f64,

    /// Tuplet window tolerance as a fraction of an eighth note
    pub tuplet_tolerance: f64,

    /// Velocities strictly above this render as forte
    pub forte_velocity: u8,

    /// Velocities strictly below this render as piano
    pub piano_velocity: u8,

    pub pitch_notation: PitchNotation,
    pub instrument_table: InstrumentTable,

    /// Emit the notation legend in the header
    pub include_legend: bool,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        ScoreConfig {
            duration_tolerance: DEFAULT_DURATION_TOLERANCE,
            tuplet_tolerance: DEFAULT_TUPLET_TOLERANCE,
            forte_velocity: 100,
            piano_velocity: 50,
            pitch_notation: PitchNotation::default(),
            instrument_table: InstrumentTable::default(),
            include_legend: true,
        }
    }
}

impl ScoreConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ScoreConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_tolerance("duration_tolerance", self.duration_tolerance)?;
        check_tolerance("tuplet_tolerance", self.tuplet_tolerance)?;

        if self.forte_velocity <= self.piano_velocity {
            return Err(ConfigError::InvalidDynamics {
                forte: self.forte_velocity,
                piano: self.piano_velocity,
            });
        }

        Ok(())
    }

    /// Formatting subset of the configuration
    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            pitch_notation: self.pitch_notation,
            forte_velocity: self.forte_velocity,
            piano_velocity: self.piano_velocity,
            include_legend: self.include_legend,
        }
    }
}

fn check_tolerance(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidTolerance { name, value })
    }
}
