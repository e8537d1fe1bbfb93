// LilyPond invocation
// Runs the external typesetter on a stored notation document

use std::path::PathBuf;
use std::process::Command;

use super::storage::OutputArtifact;
use super::{OutputError, OutputResult};

/// Runs `lilypond` to turn a `.ly` document into a score
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LilypondInvoker {
    /// Executable name or path; must be on PATH when not absolute
    pub program: String,

    /// Output format flag value (pdf, png, svg)
    pub format: String,
}

impl Default for LilypondInvoker {
    fn default() -> Self {
        LilypondInvoker {
            program: "lilypond".to_string(),
            format: "pdf".to_string(),
        }
    }
}

impl LilypondInvoker {
    pub fn new(format: impl Into<String>) -> Self {
        LilypondInvoker {
            format: format.into(),
            ..Default::default()
        }
    }

    /// Build the command line for an artifact
    pub fn command(&self, artifact: &OutputArtifact) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg(format!("-f{}", self.format))
            .arg("-o")
            .arg(artifact.output_stem())
            .arg(&artifact.path);
        command
    }

    /// Typeset the document, returning the expected score path
    pub fn render(&self, artifact: &OutputArtifact) -> OutputResult<PathBuf> {
        let mut command = self.command(artifact);
        log::info!("Executing: {:?}", command);

        let status = command.status().map_err(|e| OutputError::Launch {
            program: self.program.clone(),
            source: e,
        })?;

        if !status.success() {
            log::error!("{} exited with {}", self.program, status);
            return Err(OutputError::TypesetterFailed {
                program: self.program.clone(),
                code: status.code(),
            });
        }

        Ok(artifact
            .dir
            .join(format!("{}.{}", artifact.title, self.format)))
    }
}
