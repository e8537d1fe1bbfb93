// Conversion configuration
// Immutable per-run settings: vocabularies, template, and input selection

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use crate::groove::DurationVocabulary;
use crate::midi::IngestOptions;
use crate::notation::{DocumentTemplate, PitchVocabulary, TimeSignature, DEFAULT_LILYPOND_VERSION};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Everything one conversion needs besides the event stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// MIDI pitch to drummode symbol
    pub pitches: PitchVocabulary,

    /// Supported durations and their tokens
    pub durations: DurationVocabulary,

    /// LilyPond version marker written into the document
    pub lilypond_version: String,

    /// Fixed time signature printed on the staff
    pub time_signature: TimeSignature,

    /// Track and channel to read from the MIDI file
    pub input: IngestOptions,

    /// Stable-sort notes by start tick before grouping
    pub sort_by_start: bool,

    /// Output format passed to lilypond (pdf, png, svg)
    pub output_format: String,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        ConversionConfig {
            pitches: PitchVocabulary::default(),
            durations: DurationVocabulary::default(),
            lilypond_version: DEFAULT_LILYPOND_VERSION.to_string(),
            time_signature: TimeSignature::default(),
            input: IngestOptions::default(),
            sort_by_start: false,
            output_format: "pdf".to_string(),
        }
    }
}

impl ConversionConfig {
    /// Document template built from this config
    pub fn template(&self) -> DocumentTemplate {
        DocumentTemplate {
            version: self.lilypond_version.clone(),
            time_signature: self.time_signature,
        }
    }

    /// Reject settings that would produce malformed notation
    pub fn validate(&self) -> ConfigResult<()> {
        if self.pitches.is_empty() {
            return Err(ConfigError::Invalid("pitch vocabulary is empty".into()));
        }
        if let Some((pitch, _)) = self.pitches.iter().find(|(_, s)| s.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "empty symbol for pitch {}",
                pitch
            )));
        }

        if self.durations.entries().is_empty() {
            return Err(ConfigError::Invalid("duration vocabulary is empty".into()));
        }
        let mut seen = HashSet::new();
        for entry in self.durations.entries() {
            if !seen.insert(entry.class) {
                return Err(ConfigError::Invalid(format!(
                    "duration {:?} listed twice",
                    entry.class
                )));
            }
            if entry.token.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "empty token for duration {:?}",
                    entry.class
                )));
            }
        }

        if !self.time_signature.is_valid() {
            return Err(ConfigError::Invalid(format!(
                "invalid time signature {}",
                self.time_signature
            )));
        }
        if self.lilypond_version.trim().is_empty() {
            return Err(ConfigError::Invalid("lilypond version is empty".into()));
        }
        if self.input.channel.is_some_and(|c| c > 15) {
            return Err(ConfigError::Invalid("channel must be 0-15".into()));
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: ConversionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

/// Load a config file, falling back to defaults when `path` is `None`
pub fn load_config(path: Option<&Path>) -> ConfigResult<ConversionConfig> {
    match path {
        Some(path) => {
            let contents = std::fs::read_to_string(path)?;
            let config = ConversionConfig::from_json(&contents)?;
            log::info!("Loaded config from {}", path.display());
            Ok(config)
        }
        None => Ok(ConversionConfig::default()),
    }
}
