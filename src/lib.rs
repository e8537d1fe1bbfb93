// Drumscribe - Percussion MIDI to LilyPond drum score converter
// Module declarations

pub mod config;
pub mod events;
pub mod groove;
pub mod midi;
pub mod notation;
pub mod notes;
pub mod pipeline;
pub mod typeset;

pub use config::{load_config, ConfigError, ConversionConfig};
pub use events::{Diagnostic, DurationClass, EventStream, Note, TimedEvent};
pub use pipeline::{convert, convert_file, Conversion, ConvertError, ConvertFileError, ConvertRequest};
