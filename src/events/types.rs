// Timed event and note types
// Raw on/off events from the adapter and the closed notes rebuilt from them

use serde::{Deserialize, Serialize};

/// MIDI pitch identifier (0-127)
pub type Pitch = u8;

/// Absolute position on the tick clock
pub type Tick = u64;

/// A single on/off event with its tick delta since the previous event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum TimedEvent {
    NoteOn {
        pitch: Pitch,
        velocity: u8,
        delta: i64,
    },
    NoteOff {
        pitch: Pitch,
        delta: i64,
    },
}

impl TimedEvent {
    /// Note-on with the given delta
    pub fn on(pitch: Pitch, velocity: u8, delta: i64) -> Self {
        TimedEvent::NoteOn {
            pitch,
            velocity,
            delta,
        }
    }

    /// Note-off with the given delta
    pub fn off(pitch: Pitch, delta: i64) -> Self {
        TimedEvent::NoteOff { pitch, delta }
    }

    /// Ticks elapsed since the previous event in the stream
    pub fn delta(&self) -> i64 {
        match self {
            TimedEvent::NoteOn { delta, .. } | TimedEvent::NoteOff { delta, .. } => *delta,
        }
    }
}

/// Ordered event stream for one voice, as supplied by the adapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventStream {
    /// Ticks per quarter note
    pub resolution: u16,

    /// Events in stream order
    pub events: Vec<TimedEvent>,
}

impl EventStream {
    pub fn new(resolution: u16, events: Vec<TimedEvent>) -> Self {
        EventStream { resolution, events }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Quantized rhythmic value of a note group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationClass {
    /// Quarter note (one per beat)
    Quarter,

    /// Eighth note (2 per beat)
    Eighth,

    /// Sixteenth note (4 per beat)
    Sixteenth,

    /// Thirty-second note (8 per beat)
    ThirtySecond,
}

impl DurationClass {
    /// Ratio of resolution to note length for this class
    pub fn ticks_ratio(&self) -> u64 {
        match self {
            DurationClass::Quarter => 1,
            DurationClass::Eighth => 2,
            DurationClass::Sixteenth => 4,
            DurationClass::ThirtySecond => 8,
        }
    }
}

/// A closed note with absolute timing
///
/// Only the reconstructor creates notes, and only once a matching note-off
/// arrives on a later tick, so `end_tick > start_tick` holds for every note it
/// emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub pitch: Pitch,
    pub velocity: u8,
    pub start_tick: Tick,
    pub end_tick: Tick,
}

impl Note {
    pub(crate) fn closed(pitch: Pitch, velocity: u8, start_tick: Tick, end_tick: Tick) -> Self {
        debug_assert!(end_tick >= start_tick);
        Note {
            pitch,
            velocity,
            start_tick,
            end_tick,
        }
    }

    /// Length in ticks
    pub fn length_ticks(&self) -> Tick {
        self.end_tick - self.start_tick
    }
}
