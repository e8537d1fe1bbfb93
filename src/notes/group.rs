// Note grouping
// Clusters notes that start on the same tick into chord groups

use serde::{Deserialize, Serialize};

use crate::events::{DurationClass, Note, Tick};

/// Notes sharing one start tick, notated together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteGroup {
    start_tick: Tick,
    notes: Vec<Note>,
    duration: Option<DurationClass>,
}

impl NoteGroup {
    /// Start a group seeded with its first note
    pub fn new(note: Note) -> Self {
        NoteGroup {
            start_tick: note.start_tick,
            notes: vec![note],
            duration: None,
        }
    }

    fn push(&mut self, note: Note) {
        debug_assert_eq!(note.start_tick, self.start_tick);
        self.notes.push(note);
    }

    pub fn start_tick(&self) -> Tick {
        self.start_tick
    }

    /// Members in arrival order. Never empty.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn is_chord(&self) -> bool {
        self.notes.len() > 1
    }

    /// Length of the longest member
    pub fn max_length(&self) -> Tick {
        self.notes
            .iter()
            .map(Note::length_ticks)
            .max()
            .unwrap_or(0)
    }

    pub fn duration(&self) -> Option<DurationClass> {
        self.duration
    }

    /// Assign the duration class. Only the first assignment sticks.
    pub(crate) fn assign_duration(&mut self, class: DurationClass) {
        if self.duration.is_none() {
            self.duration = Some(class);
        }
    }
}

/// Partition notes into groups by start tick
///
/// Expects notes in non-decreasing start-tick order. A note whose start tick
/// differs from the active group's always opens a new group, so unsorted
/// input yields several groups for the same tick rather than an error.
pub fn group_notes(notes: &[Note]) -> Vec<NoteGroup> {
    let mut groups: Vec<NoteGroup> = Vec::new();
    let mut current: Option<Tick> = None;

    for note in notes {
        if current == Some(note.start_tick) {
            if let Some(group) = groups.last_mut() {
                group.push(*note);
                continue;
            }
        }
        current = Some(note.start_tick);
        groups.push(NoteGroup::new(*note));
    }

    log::debug!("Grouped {} notes into {} groups", notes.len(), groups.len());

    groups
}

/// Stable sort by start tick, keeping arrival order for equal ticks
pub fn sort_by_start(notes: &mut [Note]) {
    notes.sort_by_key(|n| n.start_tick);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(pitch: u8, start: Tick, end: Tick) -> Note {
        Note::closed(pitch, 100, start, end)
    }

    #[test]
    fn test_separate_starts_make_separate_groups() {
        let notes = vec![note(36, 0, 4), note(38, 4, 8)];
        let groups = group_notes(&notes);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].start_tick(), 0);
        assert_eq!(groups[1].start_tick(), 4);
        assert!(!groups[0].is_chord());
    }

    #[test]
    fn test_shared_start_makes_chord() {
        let notes = vec![note(36, 0, 2), note(42, 0, 2), note(38, 2, 4)];
        let groups = group_notes(&notes);

        assert_eq!(groups.len(), 2);
        assert!(groups[0].is_chord());
        let pitches: Vec<u8> = groups[0].notes().iter().map(|n| n.pitch).collect();
        assert_eq!(pitches, vec![36, 42]);
    }

    #[test]
    fn test_concatenation_reproduces_input() {
        let notes = vec![
            note(42, 0, 1),
            note(36, 0, 2),
            note(42, 1, 2),
            note(38, 2, 4),
            note(42, 2, 3),
        ];
        let groups = group_notes(&notes);

        let flattened: Vec<Note> = groups
            .iter()
            .flat_map(|g| g.notes().iter().copied())
            .collect();
        assert_eq!(flattened, notes);
    }

    #[test]
    fn test_tick_zero_starts_first_group() {
        let groups = group_notes(&[note(36, 0, 4)]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].start_tick(), 0);
    }

    #[test]
    fn test_unsorted_input_splits_ticks() {
        let notes = vec![note(36, 0, 4), note(38, 4, 6), note(42, 0, 8)];
        let groups = group_notes(&notes);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[2].start_tick(), 0);
    }

    #[test]
    fn test_sort_by_start_is_stable() {
        let mut notes = vec![note(38, 4, 6), note(36, 0, 4), note(42, 0, 8)];
        sort_by_start(&mut notes);

        let pitches: Vec<u8> = notes.iter().map(|n| n.pitch).collect();
        assert_eq!(pitches, vec![36, 42, 38]);
        assert_eq!(group_notes(&notes).len(), 2);
    }

    #[test]
    fn test_max_length() {
        let groups = group_notes(&[note(36, 0, 2), note(42, 0, 4)]);
        assert_eq!(groups[0].max_length(), 4);
    }

    #[test]
    fn test_duration_assigned_once() {
        let mut group = NoteGroup::new(note(36, 0, 4));
        group.assign_duration(DurationClass::Quarter);
        group.assign_duration(DurationClass::Eighth);
        assert_eq!(group.duration(), Some(DurationClass::Quarter));
    }

    #[test]
    fn test_empty_input() {
        assert!(group_notes(&[]).is_empty());
    }
}
