// Notation rendering
// Serializes quantized note groups into LilyPond drummode text

use thiserror::Error;

use crate::events::diagnostics::report;
use crate::events::{Diagnostic, DurationClass, Pitch, Tick};
use crate::groove::DurationVocabulary;
use crate::notes::NoteGroup;
use super::vocabulary::PitchVocabulary;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("No notation symbol for pitch {pitch} (group at tick {start_tick})")]
    UnknownPitch { pitch: Pitch, start_tick: Tick },

    #[error("No notation token for duration {0:?}")]
    UnknownDuration(DurationClass),
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Rendered note body plus the groups that were left out
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedBody {
    pub body: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Render groups into the note body
///
/// Every pitch in every group must be in the vocabulary, including groups that
/// end up skipped, so one unknown pitch fails the whole render. Groups without
/// a duration class are skipped with a `SkippedGroup` diagnostic. Each rendered
/// group is followed by a single space.
pub fn render_body(
    groups: &[NoteGroup],
    pitches: &PitchVocabulary,
    durations: &DurationVocabulary,
) -> RenderResult<RenderedBody> {
    let mut rendered = RenderedBody::default();

    for group in groups {
        let symbols = resolve_symbols(group, pitches)?;

        let class = match group.duration() {
            Some(class) => class,
            None => {
                report(
                    &mut rendered.diagnostics,
                    Diagnostic::SkippedGroup {
                        start_tick: group.start_tick(),
                    },
                );
                continue;
            }
        };
        let token = durations
            .token(class)
            .ok_or(RenderError::UnknownDuration(class))?;

        let joined = symbols.join(" ");
        if group.is_chord() {
            rendered.body.push('<');
            rendered.body.push_str(&joined);
            rendered.body.push('>');
        } else {
            rendered.body.push_str(&joined);
        }
        rendered.body.push_str(token);
        rendered.body.push(' ');
    }

    Ok(rendered)
}

fn resolve_symbols<'v>(
    group: &NoteGroup,
    pitches: &'v PitchVocabulary,
) -> RenderResult<Vec<&'v str>> {
    group
        .notes()
        .iter()
        .map(|note| {
            pitches.symbol(note.pitch).ok_or(RenderError::UnknownPitch {
                pitch: note.pitch,
                start_tick: group.start_tick(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Note;
    use crate::groove::quantize_groups;
    use crate::notes::group_notes;

    fn quantized(notes: &[Note], resolution: u16) -> Vec<NoteGroup> {
        let mut groups = group_notes(notes);
        quantize_groups(&mut groups, resolution, &DurationVocabulary::default());
        groups
    }

    #[test]
    fn test_single_notes() {
        let groups = quantized(
            &[Note::closed(36, 100, 0, 4), Note::closed(38, 100, 4, 8)],
            4,
        );
        let rendered = render_body(
            &groups,
            &PitchVocabulary::basic_kit(),
            &DurationVocabulary::default(),
        )
        .unwrap();

        assert_eq!(rendered.body, "bd4 sn4 ");
        assert!(rendered.diagnostics.is_empty());
    }

    #[test]
    fn test_chord_is_bracketed() {
        let groups = quantized(
            &[Note::closed(36, 100, 0, 2), Note::closed(42, 100, 0, 2)],
            4,
        );
        let rendered = render_body(
            &groups,
            &PitchVocabulary::basic_kit(),
            &DurationVocabulary::default(),
        )
        .unwrap();

        assert_eq!(rendered.body, "<bd hh>8 ");
    }

    #[test]
    fn test_unknown_pitch_fails() {
        let groups = quantized(
            &[Note::closed(36, 100, 0, 4), Note::closed(60, 100, 4, 8)],
            4,
        );
        let err = render_body(
            &groups,
            &PitchVocabulary::basic_kit(),
            &DurationVocabulary::default(),
        )
        .unwrap_err();

        assert_eq!(
            err,
            RenderError::UnknownPitch {
                pitch: 60,
                start_tick: 4
            }
        );
    }

    #[test]
    fn test_unknown_pitch_in_skipped_group_still_fails() {
        // Length 3 cannot be quantized at resolution 4
        let groups = quantized(&[Note::closed(60, 100, 0, 3)], 4);
        let result = render_body(
            &groups,
            &PitchVocabulary::basic_kit(),
            &DurationVocabulary::default(),
        );
        assert!(matches!(result, Err(RenderError::UnknownPitch { pitch: 60, .. })));
    }

    #[test]
    fn test_unquantized_group_skipped() {
        let groups = quantized(
            &[Note::closed(36, 100, 0, 3), Note::closed(38, 100, 3, 4)],
            4,
        );
        let rendered = render_body(
            &groups,
            &PitchVocabulary::basic_kit(),
            &DurationVocabulary::default(),
        )
        .unwrap();

        assert_eq!(rendered.body, "sn16 ");
        assert_eq!(
            rendered.diagnostics,
            vec![Diagnostic::SkippedGroup { start_tick: 0 }]
        );
    }

    #[test]
    fn test_render_is_deterministic() {
        let groups = quantized(
            &[
                Note::closed(36, 100, 0, 2),
                Note::closed(42, 100, 0, 2),
                Note::closed(38, 100, 2, 3),
                Note::closed(42, 100, 3, 4),
            ],
            4,
        );
        let pitches = PitchVocabulary::general_midi();
        let durations = DurationVocabulary::default();

        let first = render_body(&groups, &pitches, &durations).unwrap();
        let second = render_body(&groups, &pitches, &durations).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.body, "<bd hh>8 sn16 hh16 ");
    }

    #[test]
    fn test_empty_groups_render_empty_body() {
        let rendered = render_body(
            &[],
            &PitchVocabulary::basic_kit(),
            &DurationVocabulary::default(),
        )
        .unwrap();
        assert_eq!(rendered.body, "");
    }
}
