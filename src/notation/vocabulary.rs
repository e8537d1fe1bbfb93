// Pitch vocabulary
// Maps MIDI percussion pitches to LilyPond drummode symbols

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::events::Pitch;

/// General MIDI percussion note numbers
pub const MIDI_ACOUSTIC_BASS_DRUM: Pitch = 35;
pub const MIDI_KICK: Pitch = 36;       // C1
pub const MIDI_SIDE_STICK: Pitch = 37;
pub const MIDI_SNARE: Pitch = 38;      // D1
pub const MIDI_CLAP: Pitch = 39;       // D#1
pub const MIDI_ELECTRIC_SNARE: Pitch = 40;
pub const MIDI_LOW_FLOOR_TOM: Pitch = 41;
pub const MIDI_CLOSED_HIHAT: Pitch = 42; // F#1
pub const MIDI_HIGH_FLOOR_TOM: Pitch = 43;
pub const MIDI_PEDAL_HIHAT: Pitch = 44;
pub const MIDI_LOW_TOM: Pitch = 45;
pub const MIDI_OPEN_HIHAT: Pitch = 46;  // A#1
pub const MIDI_LOW_MID_TOM: Pitch = 47;
pub const MIDI_HIGH_MID_TOM: Pitch = 48;
pub const MIDI_CRASH: Pitch = 49;
pub const MIDI_HIGH_TOM: Pitch = 50;
pub const MIDI_RIDE: Pitch = 51;
pub const MIDI_CHINA: Pitch = 52;
pub const MIDI_RIDE_BELL: Pitch = 53;
pub const MIDI_TAMBOURINE: Pitch = 54;
pub const MIDI_SPLASH: Pitch = 55;
pub const MIDI_COWBELL: Pitch = 56;
pub const MIDI_CRASH_2: Pitch = 57;
pub const MIDI_RIDE_2: Pitch = 59;

/// Pitch to notation symbol mapping for one conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PitchVocabulary {
    symbols: BTreeMap<Pitch, String>,
}

impl Default for PitchVocabulary {
    fn default() -> Self {
        PitchVocabulary::general_midi()
    }
}

impl PitchVocabulary {
    pub fn new<S: Into<String>>(symbols: impl IntoIterator<Item = (Pitch, S)>) -> Self {
        PitchVocabulary {
            symbols: symbols
                .into_iter()
                .map(|(pitch, symbol)| (pitch, symbol.into()))
                .collect(),
        }
    }

    /// Kick, snare and closed hi-hat only
    pub fn basic_kit() -> Self {
        PitchVocabulary::new([
            (MIDI_KICK, "bd"),
            (MIDI_SNARE, "sn"),
            (MIDI_CLOSED_HIHAT, "hh"),
        ])
    }

    /// General MIDI percussion map with LilyPond drum names
    pub fn general_midi() -> Self {
        PitchVocabulary::new([
            (MIDI_ACOUSTIC_BASS_DRUM, "bda"),
            (MIDI_KICK, "bd"),
            (MIDI_SIDE_STICK, "ss"),
            (MIDI_SNARE, "sn"),
            (MIDI_CLAP, "hc"),
            (MIDI_ELECTRIC_SNARE, "sne"),
            (MIDI_LOW_FLOOR_TOM, "tomfl"),
            (MIDI_CLOSED_HIHAT, "hh"),
            (MIDI_HIGH_FLOOR_TOM, "tomfh"),
            (MIDI_PEDAL_HIHAT, "hhp"),
            (MIDI_LOW_TOM, "toml"),
            (MIDI_OPEN_HIHAT, "hho"),
            (MIDI_LOW_MID_TOM, "tomml"),
            (MIDI_HIGH_MID_TOM, "tommh"),
            (MIDI_CRASH, "cymc"),
            (MIDI_HIGH_TOM, "tomh"),
            (MIDI_RIDE, "cymr"),
            (MIDI_CHINA, "cymch"),
            (MIDI_RIDE_BELL, "rb"),
            (MIDI_TAMBOURINE, "tamb"),
            (MIDI_SPLASH, "cyms"),
            (MIDI_COWBELL, "cb"),
            (MIDI_CRASH_2, "cymcb"),
            (MIDI_RIDE_2, "cymrb"),
        ])
    }

    pub fn symbol(&self, pitch: Pitch) -> Option<&str> {
        self.symbols.get(&pitch).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pitch, &str)> {
        self.symbols.iter().map(|(p, s)| (*p, s.as_str()))
    }
}
