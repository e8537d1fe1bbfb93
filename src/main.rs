//! drumscribe - turn a percussion MIDI file into a LilyPond drum score
//!
//! Usage: drumscribe <input.mid> [title] [options]

use std::env;
use std::path::PathBuf;
use std::process;

use drumscribe::config::load_config;
use drumscribe::pipeline::{convert_file, ConvertRequest};

const USAGE: &str = "Usage: drumscribe <input.mid> [title] [options]

Convert a single-voice percussion MIDI file into a LilyPond drum score.

Arguments:
  input.mid          Path to the MIDI file
  title              Output file stem (optional, defaults to the input file name)

Options:
  --config <file>    JSON conversion config (vocabularies, version, track)
  --out-dir <dir>    Directory for the .ly file and score (default: .)
  --trace <file>     Append a JSONL conversion trace to <file>
  --no-typeset       Only write the .ly file, do not run lilypond
  --verbose          Debug logging

Examples:
  drumscribe onebar.mid
  drumscribe groove.mid \"Groove in A\" --out-dir scores --no-typeset
";

struct Args {
    input: PathBuf,
    title: Option<String>,
    config: Option<PathBuf>,
    out_dir: PathBuf,
    trace: Option<PathBuf>,
    typeset: bool,
    verbose: bool,
}

#[derive(Debug)]
enum ArgsError {
    /// `--help` was given
    Help,
    Invalid(String),
}

impl From<String> for ArgsError {
    fn from(message: String) -> Self {
        ArgsError::Invalid(message)
    }
}

fn parse_args(args: &[String]) -> Result<Args, ArgsError> {
    let mut positional = Vec::new();
    let mut config = None;
    let mut out_dir = PathBuf::from(".");
    let mut trace = None;
    let mut typeset = true;
    let mut verbose = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => config = Some(PathBuf::from(value_for(&mut iter, arg)?)),
            "--out-dir" => out_dir = PathBuf::from(value_for(&mut iter, arg)?),
            "--trace" => trace = Some(PathBuf::from(value_for(&mut iter, arg)?)),
            "--no-typeset" => typeset = false,
            "--verbose" | "-v" => verbose = true,
            "--help" | "-h" => return Err(ArgsError::Help),
            flag if flag.starts_with("--") => {
                return Err(format!("Unknown option: {}", flag).into())
            }
            _ => positional.push(arg.clone()),
        }
    }

    let mut positional = positional.into_iter();
    let input = positional
        .next()
        .map(PathBuf::from)
        .ok_or_else(|| "Missing input file".to_string())?;
    let title = positional.next();
    if let Some(extra) = positional.next() {
        return Err(format!("Unexpected argument: {}", extra).into());
    }

    Ok(Args {
        input,
        title,
        config,
        out_dir,
        trace,
        typeset,
        verbose,
    })
}

fn value_for<'a>(iter: &mut impl Iterator<Item = &'a String>, flag: &str) -> Result<&'a String, String> {
    iter.next().ok_or_else(|| format!("{} needs a value", flag))
}

fn init_logging(verbose: bool) -> Result<(), log::SetLoggerError> {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()
}

fn main() {
    let raw: Vec<String> = env::args().skip(1).collect();

    let args = match parse_args(&raw) {
        Ok(args) => args,
        Err(ArgsError::Help) => {
            println!("{}", USAGE);
            return;
        }
        Err(ArgsError::Invalid(message)) => {
            eprintln!("{}\n", message);
            eprintln!("{}", USAGE);
            process::exit(1);
        }
    };

    if let Err(e) = init_logging(args.verbose) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            process::exit(1);
        }
    };

    let mut request = ConvertRequest::for_input(args.input);
    if let Some(title) = args.title {
        request.title = title;
    }
    request.out_dir = args.out_dir;
    request.trace_path = args.trace;
    request.typeset = args.typeset;

    match convert_file(&request, &config) {
        Ok(outcome) => {
            if !outcome.diagnostics.is_empty() {
                log::warn!(
                    "{} diagnostics; some groups may be missing from the score",
                    outcome.diagnostics.len()
                );
            }
            match outcome.score {
                Some(score) => println!("{}", score.display()),
                None => println!("{}", outcome.artifact.path.display()),
            }
        }
        Err(e) => {
            log::error!("{}", e);
            process::exit(1);
        }
    }
}
