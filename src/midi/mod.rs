// MIDI input
// Standard MIDI File adapter feeding the note pipeline

pub mod ingest;

pub use ingest::{load_events, load_events_from_path, IngestError, IngestOptions, IngestResult};
