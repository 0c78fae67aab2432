// Chord Grouping - Partitions a start-ordered note list into same-onset groups
// Groups are index ranges into the track's note list, so member order is strike order

use std::ops::Range;

use super::note::NoteEvent;

/// Notes sharing one onset tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnsetGroup {
    pub start_tick: u64,

    /// Indices into the note list
    pub range: Range<usize>,
}

impl OnsetGroup {
    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// Two or more simultaneous notes
    pub fn is_chord(&self) -> bool {
        self.len() >= 2
    }

    pub fn members<'a>(&self, events: &'a [NoteEvent]) -> &'a [NoteEvent] {
        &events[self.range.clone()]
    }
}

/// Group consecutive notes with identical start ticks
///
/// Expects `events` sorted by start tick. Every note lands in exactly one group.
pub fn group_by_onset(events: &[NoteEvent]) -> Vec<OnsetGroup> {
    let mut groups = Vec::new();
    let mut start = 0;

    while start < events.len() {
        let tick = events[start].start_tick;
        let mut end = start + 1;
        while end < events.len() && events[end].start_tick == tick {
            end += 1;
        }

        groups.push(OnsetGroup {
            start_tick: tick,
            range: start..end,
        });
        start = end;
    }

    groups
}

/// Number of groups with two or more members
pub fn count_chords(events: &[NoteEvent]) -> usize {
    group_by_onset(events).iter().filter(|g| g.is_chord()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::groove::quantize::{classify_duration, DEFAULT_DURATION_TOLERANCE};

    fn note(pitch: u8, start_tick: u64) -> NoteEvent {
        let class = classify_duration(480, 480, DEFAULT_DURATION_TOLERANCE);
        NoteEvent::new(pitch, start_tick, 480, 80, class)
    }

    #[test]
    fn test_groups_simultaneous_onsets() {
        let events = vec![note(64, 0), note(60, 0), note(67, 480), note(72, 960), note(76, 960)];

        let groups = group_by_onset(&events);

        assert_eq!(groups.len(), 3);
        assert!(groups[0].is_chord());
        assert!(!groups[1].is_chord());
        assert!(groups[2].is_chord());
        assert_eq!(groups[2].start_tick, 960);

        // Strike order kept, not pitch order
        let pitches: Vec<u8> = groups[0].members(&events).iter().map(|n| n.pitch).collect();
        assert_eq!(pitches, vec![64, 60]);
    }

    #[test]
    fn test_every_note_in_one_group() {
        let events = vec![note(60, 0), note(62, 240), note(64, 240), note(65, 240)];
        let groups = group_by_onset(&events);

        let total: usize = groups.iter().map(|g| g.len()).sum();
        assert_eq!(total, events.len());
        assert_eq!(groups[1].range, 1..4);
        assert_eq!(count_chords(&events), 1);
    }

    #[test]
    fn test_empty_list() {
        assert!(group_by_onset(&[]).is_empty());
        assert_eq!(count_chords(&[]), 0);
    }
}
