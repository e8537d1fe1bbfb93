// Pipeline execution and monitoring module
// Orchestrates the MIDI-to-notation conversion and records its trace

pub mod convert;
pub mod trace;

pub use convert::{
    convert, convert_file, default_title, Conversion, ConvertError, ConvertFileError,
    ConvertOutcome, ConvertRequest,
};
pub use trace::{read_trace_file, ConversionTrace, Stage, TraceEntry, TraceError};
