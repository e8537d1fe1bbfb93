// Duration quantization
// Assigns each note group a duration class from the tick grid

use crate::events::diagnostics::report;
use crate::events::{Diagnostic, DurationClass, Tick};
use crate::notes::NoteGroup;
use super::duration::DurationVocabulary;

/// Assign duration classes to groups in place
///
/// The longest member decides the duration of the whole group. The class is
/// found from `resolution / max_length`, which must divide exactly and land on
/// a class the vocabulary supports. Groups that fail either check keep no
/// duration and produce an `UnquantizableGroup` diagnostic.
pub fn quantize_groups(
    groups: &mut [NoteGroup],
    resolution: u16,
    vocabulary: &DurationVocabulary,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for group in groups.iter_mut() {
        let max_length = group.max_length();

        match classify(resolution, max_length, vocabulary) {
            Some(class) => group.assign_duration(class),
            None => report(
                &mut diagnostics,
                Diagnostic::UnquantizableGroup {
                    start_tick: group.start_tick(),
                    max_length,
                    resolution,
                },
            ),
        }
    }

    diagnostics
}

fn classify(
    resolution: u16,
    max_length: Tick,
    vocabulary: &DurationVocabulary,
) -> Option<DurationClass> {
    let resolution = resolution as Tick;
    if max_length == 0 || resolution % max_length != 0 {
        return None;
    }
    vocabulary.class_for_ratio(resolution / max_length)
}
