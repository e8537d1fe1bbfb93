// Groove - duration quantization
// Fits note groups onto the resolution's tick grid

pub mod duration;
pub mod quantize;

pub use duration::{DurationEntry, DurationVocabulary};
pub use quantize::quantize_groups;
