// Tuplet Detection - Sliding three-note window over onset spacing
// Heuristic only: flags near-evenly spaced short groups, false positives are expected

use crate::score::note::NoteEvent;

/// Default tolerance as a fraction of an eighth note
pub const DEFAULT_TUPLET_TOLERANCE: f64 = 0.3;

/// Mark tuplet groups in a start-ordered note list
///
/// For each window e1, e2, e3 the group qualifies when:
/// - the span e1.start .. e3.end is within tolerance of a quarter note (two eighths)
/// - both onset gaps are within tolerance of a third of an eighth
///
/// Matched notes get `is_tuplet = true` and the window moves past e3.
/// Comparisons are strict. Returns the number of groups found.
pub fn detect_tuplets(events: &mut [NoteEvent], resolution: u32, tolerance: f64) -> usize {
    let eighth = resolution as f64 / 2.0;
    let window_tolerance = eighth * tolerance;
    let target_span = 2.0 * eighth;
    let target_gap = eighth / 3.0;

    let mut groups = 0;
    let mut i = 0;

    while i + 2 < events.len() {
        let e1 = &events[i];
        let e2 = &events[i + 1];
        let e3 = &events[i + 2];

        let span = e3.end_tick() as f64 - e1.start_tick as f64;
        let gap1 = e2.start_tick as f64 - e1.start_tick as f64;
        let gap2 = e3.start_tick as f64 - e2.start_tick as f64;

        let matched = (span - target_span).abs() < window_tolerance
            && (gap1 - target_gap).abs() < window_tolerance
            && (gap2 - target_gap).abs() < window_tolerance;

        if matched {
            for event in &mut events[i..i + 3] {
                event.is_tuplet = true;
            }
            groups += 1;
            i += 3;
        } else {
            i += 1;
        }
    }

    groups
}
