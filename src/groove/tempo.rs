// Tempo Map - Tempo change points derived from tempo events
// Converts microseconds-per-quarter values to BPM positioned in beats

use serde::{Deserialize, Serialize};

/// Tempo used when the stream has no tempo event at tick 0
pub const DEFAULT_BPM: f64 = 120.0;

const MICROSECONDS_PER_MINUTE: f64 = 60_000_000.0;

/// A tempo change at a beat position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TempoChange {
    /// Position in beats (quarter notes) from the start
    pub position: f64,

    /// Tempo in beats per minute
    pub bpm: f64,
}

impl TempoChange {
    /// Build a change from a raw tempo event
    /// Returns None for a zero tempo value or zero resolution
    pub fn from_event(tick: u64, resolution: u32, microseconds_per_quarter: u32) -> Option<Self> {
        if resolution == 0 {
            return None;
        }

        let bpm = bpm_from_microseconds(microseconds_per_quarter)?;
        Some(TempoChange {
            position: tick as f64 / resolution as f64,
            bpm,
        })
    }
}

/// Convert microseconds per quarter note to BPM
pub fn bpm_from_microseconds(microseconds_per_quarter: u32) -> Option<f64> {
    if microseconds_per_quarter == 0 {
        return None;
    }

    Some(MICROSECONDS_PER_MINUTE / microseconds_per_quarter as f64)
}

/// Sort tempo changes by beat position, keeping input order for equal positions
pub fn sort_tempo_map(changes: &mut [TempoChange]) {
    changes.sort_by(|a, b| a.position.total_cmp(&b.position));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bpm_conversion() {
        assert_eq!(bpm_from_microseconds(500_000), Some(120.0));
        assert_eq!(bpm_from_microseconds(1_000_000), Some(60.0));
        assert!((bpm_from_microseconds(428_571).unwrap() - 140.0).abs() < 0.01);
        assert_eq!(bpm_from_microseconds(0), None);
    }

    #[test]
    fn test_change_position_in_beats() {
        let change = TempoChange::from_event(960, 480, 600_000).unwrap();
        assert_eq!(change.position, 2.0);
        assert!((change.bpm - 100.0).abs() < 1e-9);

        let change = TempoChange::from_event(240, 480, 500_000).unwrap();
        assert_eq!(change.position, 0.5);

        assert!(TempoChange::from_event(0, 480, 0).is_none());
    }

    #[test]
    fn test_sort_is_stable() {
        let mut changes = vec![
            TempoChange { position: 4.0, bpm: 90.0 },
            TempoChange { position: 0.0, bpm: 120.0 },
            TempoChange { position: 4.0, bpm: 100.0 },
        ];

        sort_tempo_map(&mut changes);

        assert_eq!(changes[0].bpm, 120.0);
        assert_eq!(changes[1].bpm, 90.0);
        assert_eq!(changes[2].bpm, 100.0);
    }
}
