// Conversion pipeline
// Event stream -> notes -> groups -> durations -> LilyPond document

use serde_json::json;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::{ConfigError, ConversionConfig};
use crate::events::{Diagnostic, EventStream, Note};
use crate::groove::quantize_groups;
use crate::midi::{self, IngestError};
use crate::notation::{render_body, RenderError};
use crate::notes::{group_notes, reconstruct_notes, sort_by_start, NoteGroup, StreamError};
use crate::typeset::{self, LilypondInvoker, OutputArtifact, OutputError};
use super::trace::{ConversionTrace, Stage, TraceError};

/// Errors that abort a conversion before any output exists
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Malformed event stream: {0}")]
    Stream(#[from] StreamError),

    #[error("Render failed: {0}")]
    Render(#[from] RenderError),
}

/// Errors from a file-to-score run
#[derive(Debug, Error)]
pub enum ConvertFileError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error("Failed to write trace: {0}")]
    Trace(#[from] TraceError),
}

/// Result of converting one event stream
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Complete LilyPond document
    pub document: String,

    /// Rendered note body inside the document
    pub body: String,

    /// Closed notes in reconstruction order
    pub notes: Vec<Note>,

    /// Groups with their assigned durations
    pub groups: Vec<NoteGroup>,

    /// Every non-fatal finding, in pipeline order
    pub diagnostics: Vec<Diagnostic>,

    pub trace: ConversionTrace,
}

/// Run the core pipeline on one event stream
///
/// Pure with respect to everything but logging: no files are touched, and the
/// only inputs are the stream and the config, so independent conversions can
/// run side by side.
pub fn convert(stream: &EventStream, config: &ConversionConfig) -> Result<Conversion, ConvertError> {
    let mut trace = ConversionTrace::new();
    let mut diagnostics = Vec::new();

    let reconstruction = reconstruct_notes(&stream.events)?;
    trace.record_with_data(
        Stage::Reconstruct,
        format!("Reconstructed {} notes", reconstruction.notes.len()),
        json!({
            "events": stream.events.len(),
            "notes": reconstruction.notes.len(),
            "diagnostics": reconstruction.diagnostics.len(),
        }),
    );
    diagnostics.extend(reconstruction.diagnostics);
    let mut notes = reconstruction.notes;

    if config.sort_by_start {
        sort_by_start(&mut notes);
    }
    let mut groups = group_notes(&notes);
    trace.record_with_data(
        Stage::Group,
        format!("Grouped into {} groups", groups.len()),
        json!({
            "groups": groups.len(),
            "chords": groups.iter().filter(|g| g.is_chord()).count(),
            "sorted": config.sort_by_start,
        }),
    );

    let quantize_diagnostics = quantize_groups(&mut groups, stream.resolution, &config.durations);
    trace.record_with_data(
        Stage::Quantize,
        format!("Quantized at resolution {}", stream.resolution),
        json!({
            "resolution": stream.resolution,
            "unquantizable": quantize_diagnostics.len(),
        }),
    );
    diagnostics.extend(quantize_diagnostics);

    let rendered = render_body(&groups, &config.pitches, &config.durations)?;
    trace.record_with_data(
        Stage::Render,
        "Rendered notation body",
        json!({
            "skipped": rendered.diagnostics.len(),
            "body_len": rendered.body.len(),
        }),
    );
    diagnostics.extend(rendered.diagnostics);

    let document = config.template().wrap(&rendered.body);

    log::info!(
        "Converted {} notes into {} groups ({} diagnostics)",
        notes.len(),
        groups.len(),
        diagnostics.len()
    );

    Ok(Conversion {
        document,
        body: rendered.body,
        notes,
        groups,
        diagnostics,
        trace,
    })
}

/// One file-to-score job
#[derive(Debug, Clone)]
pub struct ConvertRequest {
    pub input: PathBuf,

    /// Output file stem
    pub title: String,

    pub out_dir: PathBuf,

    /// Run lilypond after writing the document
    pub typeset: bool,

    /// Append a JSONL trace here
    pub trace_path: Option<PathBuf>,
}

impl ConvertRequest {
    /// Request with the title taken from the input file stem
    pub fn for_input(input: impl Into<PathBuf>) -> Self {
        let input = input.into();
        let title = default_title(&input);
        ConvertRequest {
            input,
            title,
            out_dir: PathBuf::from("."),
            typeset: true,
            trace_path: None,
        }
    }
}

/// What a finished file conversion produced
#[derive(Debug, Clone)]
pub struct ConvertOutcome {
    pub artifact: OutputArtifact,

    /// Rendered score, when typesetting ran
    pub score: Option<PathBuf>,

    pub diagnostics: Vec<Diagnostic>,
}

/// Load a MIDI file, convert it, write the document, and optionally typeset it
///
/// Nothing is written unless the whole conversion succeeds. When typesetting
/// fails the `.ly` document is already on disk. The trace is appended on every
/// path, with a final entry naming the failed stage when the run stops early.
pub fn convert_file(
    request: &ConvertRequest,
    config: &ConversionConfig,
) -> Result<ConvertOutcome, ConvertFileError> {
    let mut trace = ConversionTrace::new();

    let outcome = run_file(request, config, &mut trace);
    if let Err(e) = &outcome {
        trace.record(failed_stage(e), format!("Conversion failed: {}", e));
    }

    if let Err(e) = write_trace(&trace, request.trace_path.as_deref()) {
        if outcome.is_ok() {
            return Err(e.into());
        }
        log::error!("Failed to write trace: {}", e);
    }

    outcome
}

fn run_file(
    request: &ConvertRequest,
    config: &ConversionConfig,
    trace: &mut ConversionTrace,
) -> Result<ConvertOutcome, ConvertFileError> {
    let stream = midi::load_events_from_path(&request.input, &config.input)?;
    if stream.is_empty() {
        log::warn!(
            "No note events on track {} of {}",
            config.input.track,
            request.input.display()
        );
    }
    trace.record_with_data(
        Stage::Ingest,
        format!("Loaded {}", request.input.display()),
        json!({
            "resolution": stream.resolution,
            "events": stream.events.len(),
            "track": config.input.track,
        }),
    );

    let conversion = convert(&stream, config)?;
    trace.extend(conversion.trace);

    let artifact = typeset::write_document(&request.out_dir, &request.title, &conversion.document)?;
    trace.record_with_data(
        Stage::Typeset,
        format!("Wrote {}", artifact.path.display()),
        json!({
            "document": artifact.path.display().to_string(),
            "sha256": artifact.sha256,
        }),
    );

    let score = if request.typeset {
        let invoker = LilypondInvoker::new(config.output_format.clone());
        let score = invoker.render(&artifact)?;
        trace.record(Stage::Typeset, format!("Typeset {}", score.display()));
        Some(score)
    } else {
        None
    };

    Ok(ConvertOutcome {
        artifact,
        score,
        diagnostics: conversion.diagnostics,
    })
}

/// Stage to blame in the trace for an aborted run
fn failed_stage(error: &ConvertFileError) -> Stage {
    match error {
        ConvertFileError::Convert(ConvertError::Stream(_)) => Stage::Reconstruct,
        ConvertFileError::Convert(ConvertError::Render(_)) => Stage::Render,
        ConvertFileError::Output(_) => Stage::Typeset,
        ConvertFileError::Config(_) | ConvertFileError::Ingest(_) | ConvertFileError::Trace(_) => {
            Stage::Ingest
        }
    }
}

fn write_trace(trace: &ConversionTrace, path: Option<&Path>) -> Result<(), TraceError> {
    match path {
        Some(path) => trace.append_to(path),
        None => Ok(()),
    }
}

/// File stem of the input, or "score" when there is none
pub fn default_title(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "score".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{DurationClass, TimedEvent};
    use crate::notation::PitchVocabulary;
    use crate::pipeline::trace::read_trace_file;
    use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};
    use tempfile::TempDir;

    const BD: u8 = 36;
    const SN: u8 = 38;
    const HH: u8 = 42;

    fn basic_config() -> ConversionConfig {
        ConversionConfig {
            pitches: PitchVocabulary::basic_kit(),
            ..Default::default()
        }
    }

    #[test]
    fn test_two_quarter_notes() {
        let stream = EventStream::new(
            4,
            vec![
                TimedEvent::on(BD, 100, 0),
                TimedEvent::off(BD, 4),
                TimedEvent::on(SN, 100, 0),
                TimedEvent::off(SN, 4),
            ],
        );

        let conversion = convert(&stream, &basic_config()).unwrap();

        assert_eq!(conversion.body, "bd4 sn4 ");
        assert_eq!(
            conversion.document,
            basic_config().template().wrap("bd4 sn4 ")
        );
        assert!(conversion.document.contains("bd4 sn4 "));
        assert!(conversion.diagnostics.is_empty());
    }

    #[test]
    fn test_eighth_note_chord() {
        let stream = EventStream::new(
            4,
            vec![
                TimedEvent::on(BD, 100, 0),
                TimedEvent::on(HH, 100, 0),
                TimedEvent::off(BD, 2),
                TimedEvent::off(HH, 0),
            ],
        );

        let conversion = convert(&stream, &basic_config()).unwrap();

        assert_eq!(conversion.body, "<bd hh>8 ");
        assert_eq!(conversion.groups.len(), 1);
        assert_eq!(conversion.groups[0].duration(), Some(DurationClass::Eighth));
    }

    #[test]
    fn test_unknown_pitch_fails() {
        let stream = EventStream::new(4, vec![TimedEvent::on(60, 100, 0), TimedEvent::off(60, 4)]);

        let err = convert(&stream, &basic_config()).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Render(RenderError::UnknownPitch { pitch: 60, .. })
        ));
    }

    #[test]
    fn test_negative_delta_fails() {
        let stream = EventStream::new(4, vec![TimedEvent::on(BD, 100, 2), TimedEvent::off(BD, -3)]);
        let err = convert(&stream, &basic_config()).unwrap_err();
        assert!(matches!(err, ConvertError::Stream(_)));
    }

    #[test]
    fn test_diagnostics_collected_across_stages() {
        let stream = EventStream::new(
            8,
            vec![
                TimedEvent::off(SN, 0),
                TimedEvent::on(BD, 100, 0),
                TimedEvent::off(BD, 3),
                TimedEvent::on(SN, 100, 0),
                TimedEvent::off(SN, 2),
                TimedEvent::on(HH, 100, 0),
            ],
        );

        let conversion = convert(&stream, &basic_config()).unwrap();

        assert_eq!(conversion.body, "sn16 ");
        assert_eq!(
            conversion.diagnostics,
            vec![
                Diagnostic::UnmatchedNoteOff { pitch: SN, tick: 0 },
                Diagnostic::UnterminatedNote {
                    pitch: HH,
                    start_tick: 5
                },
                Diagnostic::UnquantizableGroup {
                    start_tick: 0,
                    max_length: 3,
                    resolution: 8
                },
                Diagnostic::SkippedGroup { start_tick: 0 },
            ]
        );
    }

    #[test]
    fn test_sort_by_start_merges_interleaved_chord() {
        // hh opens with bd but closes after sn has started and finished
        let events = vec![
            TimedEvent::on(BD, 100, 0),
            TimedEvent::on(HH, 100, 0),
            TimedEvent::off(BD, 2),
            TimedEvent::on(SN, 100, 0),
            TimedEvent::off(SN, 2),
            TimedEvent::off(HH, 0),
        ];
        let stream = EventStream::new(4, events);

        let unsorted = convert(&stream, &basic_config()).unwrap();
        assert_eq!(unsorted.groups.len(), 3);

        let config = ConversionConfig {
            sort_by_start: true,
            ..basic_config()
        };
        let sorted = convert(&stream, &config).unwrap();
        assert_eq!(sorted.groups.len(), 2);
        assert_eq!(sorted.body, "<bd hh>4 sn8 ");
    }

    #[test]
    fn test_trace_has_core_stages() {
        let stream = EventStream::new(4, vec![TimedEvent::on(BD, 100, 0), TimedEvent::off(BD, 4)]);
        let conversion = convert(&stream, &basic_config()).unwrap();

        let stages: Vec<Stage> = conversion.trace.entries().iter().map(|e| e.stage).collect();
        assert_eq!(
            stages,
            vec![Stage::Reconstruct, Stage::Group, Stage::Quantize, Stage::Render]
        );
    }

    #[test]
    fn test_default_title() {
        assert_eq!(default_title(Path::new("midi-files/onebar.mid")), "onebar");
        assert_eq!(default_title(Path::new("")), "score");
    }

    fn write_midi(dir: &Path, name: &str, key: u8) -> PathBuf {
        let ev = |delta: u32, message| TrackEvent {
            delta: delta.into(),
            kind: TrackEventKind::Midi {
                channel: 9.into(),
                message,
            },
        };
        let track = vec![
            ev(0, MidiMessage::NoteOn { key: key.into(), vel: 100.into() }),
            ev(4, MidiMessage::NoteOff { key: key.into(), vel: 0.into() }),
            TrackEvent {
                delta: 0.into(),
                kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
            },
        ];
        let smf = Smf {
            header: Header {
                format: Format::SingleTrack,
                timing: Timing::Metrical(4.into()),
            },
            tracks: vec![track],
        };
        let path = dir.join(name);
        smf.save(&path).unwrap();
        path
    }

    #[test]
    fn test_convert_file_without_typesetting() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_midi(temp_dir.path(), "onebar.mid", BD);
        let trace_path = temp_dir.path().join("trace.jsonl");

        let request = ConvertRequest {
            out_dir: temp_dir.path().join("out"),
            typeset: false,
            trace_path: Some(trace_path.clone()),
            ..ConvertRequest::for_input(&input)
        };

        let outcome = convert_file(&request, &basic_config()).unwrap();

        assert!(outcome.score.is_none());
        assert_eq!(outcome.artifact.path, temp_dir.path().join("out").join("onebar.ly"));
        let document = std::fs::read_to_string(&outcome.artifact.path).unwrap();
        assert!(document.contains("bd4 "));

        let entries = read_trace_file(&trace_path).unwrap();
        assert_eq!(entries[0].stage, Stage::Ingest);
        assert_eq!(entries.len(), 6);

        let written = &entries[5];
        assert_eq!(written.stage, Stage::Typeset);
        let data = written.data.as_ref().unwrap();
        assert_eq!(data["sha256"], outcome.artifact.sha256.as_str());
        assert_eq!(
            outcome.artifact.sha256,
            crate::typeset::calculate_sha256(document.as_bytes())
        );
    }

    #[test]
    fn test_convert_file_unknown_pitch_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_midi(temp_dir.path(), "bad.mid", 60);
        let out_dir = temp_dir.path().join("out");

        let request = ConvertRequest {
            out_dir: out_dir.clone(),
            typeset: false,
            ..ConvertRequest::for_input(&input)
        };

        let err = convert_file(&request, &basic_config()).unwrap_err();

        assert!(matches!(
            err,
            ConvertFileError::Convert(ConvertError::Render(RenderError::UnknownPitch { .. }))
        ));
        assert!(!out_dir.join("bad.ly").exists());
    }

    #[test]
    fn test_failed_conversion_still_writes_trace() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_midi(temp_dir.path(), "bad.mid", 60);
        let trace_path = temp_dir.path().join("trace.jsonl");

        let request = ConvertRequest {
            out_dir: temp_dir.path().join("out"),
            typeset: false,
            trace_path: Some(trace_path.clone()),
            ..ConvertRequest::for_input(&input)
        };

        let err = convert_file(&request, &basic_config()).unwrap_err();
        assert!(matches!(err, ConvertFileError::Convert(ConvertError::Render(_))));

        let entries = read_trace_file(&trace_path).unwrap();
        let stages: Vec<Stage> = entries.iter().map(|e| e.stage).collect();
        assert_eq!(stages, vec![Stage::Ingest, Stage::Render]);
        assert!(entries[1].message.starts_with("Conversion failed"));
    }

    #[test]
    fn test_missing_input_trace_names_ingest() {
        let temp_dir = TempDir::new().unwrap();
        let trace_path = temp_dir.path().join("trace.jsonl");
        let request = ConvertRequest {
            typeset: false,
            out_dir: temp_dir.path().to_path_buf(),
            trace_path: Some(trace_path.clone()),
            ..ConvertRequest::for_input(temp_dir.path().join("missing.mid"))
        };

        assert!(convert_file(&request, &basic_config()).is_err());

        let entries = read_trace_file(&trace_path).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].stage, Stage::Ingest);
    }

    #[test]
    fn test_convert_file_missing_input() {
        let temp_dir = TempDir::new().unwrap();
        let request = ConvertRequest {
            typeset: false,
            out_dir: temp_dir.path().to_path_buf(),
            ..ConvertRequest::for_input(temp_dir.path().join("missing.mid"))
        };

        let err = convert_file(&request, &basic_config()).unwrap_err();
        assert!(matches!(err, ConvertFileError::Ingest(IngestError::Io(_))));
    }
}
