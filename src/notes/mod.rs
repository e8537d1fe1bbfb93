// Note assembly
// Rebuilds notes from on/off events and groups them into chords

pub mod group;
pub mod reconstruct;

pub use group::{group_notes, sort_by_start, NoteGroup};
pub use reconstruct::{reconstruct_notes, Reconstruction, StreamError, StreamResult};
