// MIDI ingestion
// Reads a Standard MIDI File and extracts one track's note on/off stream

use midly::{MidiMessage, Smf, Timing, TrackEventKind};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::events::{EventStream, TimedEvent};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to read MIDI file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse MIDI data: {0}")]
    Parse(#[from] midly::Error),

    #[error("Track {index} requested but the file has {count} tracks")]
    TrackOutOfRange { index: usize, count: usize },

    #[error("Unsupported timing: only metrical (ticks per quarter note) files are supported")]
    UnsupportedTiming,

    #[error("Resolution must be greater than zero")]
    ZeroResolution,
}

pub type IngestResult<T> = Result<T, IngestError>;

/// Which part of the file to read
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestOptions {
    /// Track index (0 = first track)
    pub track: usize,

    /// Only keep events on this channel (0-15); all channels when unset
    pub channel: Option<u8>,
}

/// Load the note stream from Standard MIDI File bytes
///
/// Deltas of events that are not note on/off are carried into the next note
/// event so absolute positions stay intact. A note-on with velocity 0 is read
/// as a note-off.
pub fn load_events(data: &[u8], options: &IngestOptions) -> IngestResult<EventStream> {
    let smf = Smf::parse(data)?;

    let resolution = match smf.header.timing {
        Timing::Metrical(ticks) => ticks.as_int(),
        Timing::Timecode(..) => return Err(IngestError::UnsupportedTiming),
    };
    if resolution == 0 {
        return Err(IngestError::ZeroResolution);
    }

    let track = smf
        .tracks
        .get(options.track)
        .ok_or(IngestError::TrackOutOfRange {
            index: options.track,
            count: smf.tracks.len(),
        })?;

    let mut events = Vec::new();
    let mut pending: i64 = 0;

    for event in track {
        pending += event.delta.as_int() as i64;

        let timed = match event.kind {
            TrackEventKind::Midi { channel, message } => {
                if options.channel.is_some_and(|c| c != channel.as_int()) {
                    None
                } else {
                    to_timed_event(message, pending)
                }
            }
            _ => None,
        };

        if let Some(timed) = timed {
            events.push(timed);
            pending = 0;
        }
    }

    log::info!(
        "Loaded {} note events from track {} (resolution {} ticks per quarter)",
        events.len(),
        options.track,
        resolution
    );

    Ok(EventStream::new(resolution, events))
}

/// Load the note stream from a MIDI file on disk
pub fn load_events_from_path(path: &Path, options: &IngestOptions) -> IngestResult<EventStream> {
    let data = std::fs::read(path)?;
    load_events(&data, options)
}

fn to_timed_event(message: MidiMessage, delta: i64) -> Option<TimedEvent> {
    match message {
        MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => {
            Some(TimedEvent::on(key.as_int(), vel.as_int(), delta))
        }
        MidiMessage::NoteOn { key, .. } | MidiMessage::NoteOff { key, .. } => {
            Some(TimedEvent::off(key.as_int(), delta))
        }
        _ => None,
    }
}
