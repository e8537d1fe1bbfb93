// Conversion trace
// Append-only JSONL record of what each pipeline stage produced

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during trace operations
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Pipeline stage a trace entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Ingest,
    Reconstruct,
    Group,
    Quantize,
    Render,
    Typeset,
}

/// A single line of the trace file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEntry {
    /// RFC 3339 timestamp of when this entry was recorded
    pub timestamp: String,

    pub stage: Stage,

    /// Human-readable summary of the stage's outcome
    pub message: String,

    /// Counts and other structured details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl TraceEntry {
    pub fn new(stage: Stage, message: impl Into<String>, data: Option<serde_json::Value>) -> Self {
        TraceEntry {
            timestamp: Utc::now().to_rfc3339(),
            stage,
            message: message.into(),
            data,
        }
    }

    /// Serialize to JSON line (with newline)
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_string(self)?;
        Ok(format!("{}\n", json))
    }
}

/// In-memory trace for one conversion
#[derive(Debug, Clone, Default)]
pub struct ConversionTrace {
    entries: Vec<TraceEntry>,
}

impl ConversionTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, stage: Stage, message: impl Into<String>) {
        self.entries.push(TraceEntry::new(stage, message, None));
    }

    pub fn record_with_data(
        &mut self,
        stage: Stage,
        message: impl Into<String>,
        data: serde_json::Value,
    ) {
        self.entries.push(TraceEntry::new(stage, message, Some(data)));
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    /// Take over another trace's entries, keeping their order
    pub fn extend(&mut self, other: ConversionTrace) {
        self.entries.extend(other.entries);
    }

    /// Append all entries to a JSONL file, creating it if needed
    pub fn append_to(&self, path: &Path) -> Result<(), TraceError> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;

        for entry in &self.entries {
            let json_line = entry.to_json_line()?;
            file.write_all(json_line.as_bytes())?;
        }

        file.flush()?;
        Ok(())
    }
}

/// Read trace entries from a JSONL file
pub fn read_trace_file(path: &Path) -> Result<Vec<TraceEntry>, TraceError> {
    let contents = std::fs::read_to_string(path)?;
    let mut entries = Vec::new();

    for line in contents.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let entry: TraceEntry = serde_json::from_str(line)?;
        entries.push(entry);
    }

    Ok(entries)
}
