// Note reconstruction
// Pairs note-on and note-off events into closed notes with absolute timing

use std::collections::{HashMap, VecDeque};
use thiserror::Error;

use crate::events::diagnostics::report;
use crate::events::{Diagnostic, Note, Pitch, Tick, TimedEvent};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StreamError {
    #[error("Negative tick delta {delta} at event {index}")]
    NegativeDelta { index: usize, delta: i64 },

    #[error("Tick counter overflowed at event {index}")]
    TickOverflow { index: usize },
}

pub type StreamResult<T> = Result<T, StreamError>;

/// Output of the reconstruction pass
#[derive(Debug, Clone, Default)]
pub struct Reconstruction {
    /// Closed notes in note-off arrival order
    pub notes: Vec<Note>,

    /// Unmatched offs, unterminated opens and zero-length notes
    pub diagnostics: Vec<Diagnostic>,
}

/// A note-on still waiting for its note-off
#[derive(Debug, Clone, Copy)]
struct OpenNote {
    velocity: u8,
    start_tick: Tick,
    /// Position in the stream, used to report leftovers in arrival order
    seq: usize,
}

/// Rebuild closed notes from an ordered event stream
///
/// The running tick starts at 0 and each event's delta is applied before the
/// event itself. A note-off closes the earliest open note of the same pitch;
/// a note-off with nothing to close is dropped. A note-off on the same tick
/// as its note-on still closes that note, but the zero-length note is dropped
/// so every returned note has `end_tick > start_tick`. Notes still open at the
/// end of the stream are discarded. All three cases are reported as diagnostics.
pub fn reconstruct_notes(events: &[TimedEvent]) -> StreamResult<Reconstruction> {
    let mut tick: Tick = 0;
    let mut open: HashMap<Pitch, VecDeque<OpenNote>> = HashMap::new();
    let mut result = Reconstruction::default();

    for (index, event) in events.iter().enumerate() {
        tick = advance(tick, event.delta(), index)?;

        match *event {
            TimedEvent::NoteOn {
                pitch, velocity, ..
            } => {
                open.entry(pitch).or_default().push_back(OpenNote {
                    velocity,
                    start_tick: tick,
                    seq: index,
                });
            }
            TimedEvent::NoteOff { pitch, .. } => {
                match open.get_mut(&pitch).and_then(|queue| queue.pop_front()) {
                    Some(on) if on.start_tick == tick => report(
                        &mut result.diagnostics,
                        Diagnostic::ZeroLengthNote { pitch, tick },
                    ),
                    Some(on) => {
                        result
                            .notes
                            .push(Note::closed(pitch, on.velocity, on.start_tick, tick));
                    }
                    None => report(
                        &mut result.diagnostics,
                        Diagnostic::UnmatchedNoteOff { pitch, tick },
                    ),
                }
            }
        }
    }

    // Leftover opens, reported in the order they were opened
    let mut leftovers: Vec<(Pitch, OpenNote)> = open
        .into_iter()
        .flat_map(|(pitch, queue)| queue.into_iter().map(move |on| (pitch, on)))
        .collect();
    leftovers.sort_by_key(|(_, on)| on.seq);

    for (pitch, on) in leftovers {
        report(
            &mut result.diagnostics,
            Diagnostic::UnterminatedNote {
                pitch,
                start_tick: on.start_tick,
            },
        );
    }

    log::debug!(
        "Reconstructed {} notes from {} events",
        result.notes.len(),
        events.len()
    );

    Ok(result)
}

fn advance(tick: Tick, delta: i64, index: usize) -> StreamResult<Tick> {
    if delta < 0 {
        return Err(StreamError::NegativeDelta { index, delta });
    }
    tick.checked_add(delta as u64)
        .ok_or(StreamError::TickOverflow { index })
}
