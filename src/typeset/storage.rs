// Document storage
// Writes finished notation documents to disk and hashes them

use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{OutputError, OutputResult};

/// A notation document persisted on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifact {
    /// Directory holding the document and the rendered score
    pub dir: PathBuf,

    /// Title, used as the file stem
    pub title: String,

    /// Path of the `.ly` file
    pub path: PathBuf,

    /// SHA256 of the document text
    pub sha256: String,
}

impl OutputArtifact {
    /// Output path stem handed to the typesetter (no extension)
    pub fn output_stem(&self) -> PathBuf {
        self.dir.join(&self.title)
    }
}

/// Write `<dir>/<title>.ly`
///
/// The document goes to a temporary sibling first and is renamed into place,
/// so a failed write never leaves a partial `.ly` behind.
pub fn write_document(dir: &Path, title: &str, document: &str) -> OutputResult<OutputArtifact> {
    validate_title(title)?;
    fs::create_dir_all(dir).map_err(OutputError::Write)?;

    let path = dir.join(format!("{}.ly", title));
    let tmp_path = dir.join(format!(".{}.ly.tmp", title));

    let written = fs::File::create(&tmp_path)
        .and_then(|mut file| {
            file.write_all(document.as_bytes())?;
            file.sync_all()
        })
        .and_then(|_| fs::rename(&tmp_path, &path));

    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(OutputError::Write(e));
    }

    let sha256 = calculate_sha256(document.as_bytes());
    log::info!("Wrote {} ({})", path.display(), &sha256[..12]);

    Ok(OutputArtifact {
        dir: dir.to_path_buf(),
        title: title.to_string(),
        path,
        sha256,
    })
}

/// Calculate SHA256 hash of data
pub fn calculate_sha256(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

fn validate_title(title: &str) -> OutputResult<()> {
    let bad = title.trim().is_empty()
        || title.contains(['/', '\\'])
        || title == "."
        || title == "..";
    if bad {
        return Err(OutputError::InvalidTitle(title.to_string()));
    }
    Ok(())
}
