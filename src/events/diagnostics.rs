// Conversion diagnostics
// Non-fatal findings collected while a stream moves through the pipeline

use serde::{Deserialize, Serialize};
use std::fmt;

use super::types::{Pitch, Tick};

/// A recoverable problem found during conversion
///
/// Diagnostics never stop a run. They are returned next to the result so the
/// caller can decide whether any of them should be treated as fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Diagnostic {
    /// A note-off arrived with no open note of the same pitch
    UnmatchedNoteOff { pitch: Pitch, tick: Tick },

    /// A note-on was still open when the stream ended
    UnterminatedNote { pitch: Pitch, start_tick: Tick },

    /// A note-off closed its note on the same tick it opened
    ZeroLengthNote { pitch: Pitch, tick: Tick },

    /// The group's longest note does not divide the resolution into a known duration
    UnquantizableGroup {
        start_tick: Tick,
        max_length: Tick,
        resolution: u16,
    },

    /// A group without a duration class was left out of the notation
    SkippedGroup { start_tick: Tick },
}

impl Diagnostic {
    /// Stage that produced this diagnostic
    pub fn stage(&self) -> &'static str {
        match self {
            Diagnostic::UnmatchedNoteOff { .. }
            | Diagnostic::UnterminatedNote { .. }
            | Diagnostic::ZeroLengthNote { .. } => "reconstruct",
            Diagnostic::UnquantizableGroup { .. } => "quantize",
            Diagnostic::SkippedGroup { .. } => "render",
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnmatchedNoteOff { pitch, tick } => {
                write!(f, "note-off for pitch {} at tick {} has no open note", pitch, tick)
            }
            Diagnostic::UnterminatedNote { pitch, start_tick } => write!(
                f,
                "note for pitch {} opened at tick {} was never closed",
                pitch, start_tick
            ),
            Diagnostic::ZeroLengthNote { pitch, tick } => write!(
                f,
                "note for pitch {} opened and closed at tick {} has no length",
                pitch, tick
            ),
            Diagnostic::UnquantizableGroup {
                start_tick,
                max_length,
                resolution,
            } => write!(
                f,
                "group at tick {} has length {} which does not fit resolution {}",
                start_tick, max_length, resolution
            ),
            Diagnostic::SkippedGroup { start_tick } => {
                write!(f, "group at tick {} has no duration and was skipped", start_tick)
            }
        }
    }
}

/// Record a diagnostic and log it
pub(crate) fn report(diagnostics: &mut Vec<Diagnostic>, diagnostic: Diagnostic) {
    log::warn!("[{}] {}", diagnostic.stage(), diagnostic);
    diagnostics.push(diagnostic);
}
