// Event model
// Timed on/off events, closed notes, and conversion diagnostics

pub mod diagnostics;
pub mod types;

pub use diagnostics::Diagnostic;
pub use types::{DurationClass, EventStream, Note, Pitch, Tick, TimedEvent};
