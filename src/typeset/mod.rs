// Typesetting output
// Persists notation documents and hands them to LilyPond

pub mod lilypond;
pub mod storage;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write notation document: {0}")]
    Write(#[source] std::io::Error),

    #[error("Invalid output title: {0:?}")]
    InvalidTitle(String),

    #[error("Failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} failed with exit code {code:?}")]
    TypesetterFailed { program: String, code: Option<i32> },
}

pub type OutputResult<T> = Result<T, OutputError>;

pub use lilypond::LilypondInvoker;
pub use storage::{calculate_sha256, write_document, OutputArtifact};
