// Notation - LilyPond drummode output
// Pitch vocabulary, note body rendering, and the document template

pub mod render;
pub mod template;
pub mod vocabulary;

pub use render::{render_body, RenderError, RenderResult, RenderedBody};
pub use template::{DocumentTemplate, TimeSignature, DEFAULT_LILYPOND_VERSION};
pub use vocabulary::PitchVocabulary;
