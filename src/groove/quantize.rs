// Duration Quantization - Maps raw tick durations to canonical note values
// Tolerance-band matching against an ordered table, with dotted values

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default multiplicative tolerance around each canonical value (±15%)
pub const DEFAULT_DURATION_TOLERANCE: f64 = 0.15;

/// Canonical duration symbol
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationSymbol {
    Whole,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
    ThirtySecond,
    SixtyFourth,

    /// No canonical value matched. Carries the quarter-note ratio rounded
    /// to two decimals.
    Irregular(f64),
}

impl DurationSymbol {
    pub fn is_irregular(&self) -> bool {
        matches!(self, DurationSymbol::Irregular(_))
    }
}

impl fmt::Display for DurationSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DurationSymbol::Whole => f.write_str("w"),
            DurationSymbol::Half => f.write_str("h"),
            DurationSymbol::Quarter => f.write_str("q"),
            DurationSymbol::Eighth => f.write_str("e"),
            DurationSymbol::Sixteenth => f.write_str("s"),
            DurationSymbol::ThirtySecond => f.write_str("t"),
            DurationSymbol::SixtyFourth => f.write_str("x"),
            DurationSymbol::Irregular(ratio) => write!(f, "({})", format_decimal(*ratio)),
        }
    }
}

/// Result of classifying one duration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationClass {
    pub symbol: DurationSymbol,
    pub dotted: bool,
}

/// Canonical ratios (quarter note = 1.0) in match order. The first band that
/// contains the ratio wins, so overlaps resolve to the longer value.
const DURATION_TABLE: [(f64, DurationSymbol, bool); 11] = [
    (4.0, DurationSymbol::Whole, false),
    (3.0, DurationSymbol::Half, true),
    (2.0, DurationSymbol::Half, false),
    (1.5, DurationSymbol::Quarter, true),
    (1.0, DurationSymbol::Quarter, false),
    (0.75, DurationSymbol::Eighth, true),
    (0.5, DurationSymbol::Eighth, false),
    (0.375, DurationSymbol::Sixteenth, true),
    (0.25, DurationSymbol::Sixteenth, false),
    (0.125, DurationSymbol::ThirtySecond, false),
    (0.0625, DurationSymbol::SixtyFourth, false),
];

/// Classify a duration in ticks against the canonical table
pub fn classify_duration(duration_ticks: u64, resolution: u32, tolerance: f64) -> DurationClass {
    let ratio = duration_ticks as f64 / resolution.max(1) as f64;
    classify_ratio(ratio, tolerance)
}

/// Classify a quarter-note ratio against the canonical table
pub fn classify_ratio(ratio: f64, tolerance: f64) -> DurationClass {
    for &(target, symbol, dotted) in DURATION_TABLE.iter() {
        if is_within(ratio, target, tolerance) {
            return DurationClass { symbol, dotted };
        }
    }

    DurationClass {
        symbol: DurationSymbol::Irregular(round_two_decimals(ratio)),
        dotted: false,
    }
}

/// Inclusive multiplicative band check
fn is_within(value: f64, target: f64, tolerance: f64) -> bool {
    let min = target * (1.0 - tolerance);
    let max = target * (1.0 + tolerance);
    value >= min && value <= max
}

fn round_two_decimals(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Format with at most two decimals and no trailing zeros ("1.5", "0.33", "2")
pub fn format_decimal(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
