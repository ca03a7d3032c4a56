//! lexsum command-line interface.
//!
//! Reads a document from a file or stdin, screens it, and prints either the
//! structured JSON brief, the legacy prose brief, or a rejection envelope.
//!
//! Exit codes:
//! - 0: summary or rejection envelope printed after a successful run
//! - 1: input, network, or model failure
//! - 2: nothing usable to read (empty input, or a terminal with no pipe)
//! - 3: document turned away as non-legal

use std::io::{IsTerminal, Read};
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing_subscriber::prelude::*;

use lexsum_core::{Document, DocumentError, RejectionEnvelope};
use lexsum_runtime::{
    DetectorKind, Outcome, OutputShape, Pipeline, PipelineOptions, DEFAULT_MODEL,
};

/// Environment variable naming the default model.
const OPENAI_MODEL_ENV: &str = "OPENAI_MODEL";

const EXIT_RUNTIME_ERROR: u8 = 1;
const EXIT_USAGE: u8 = 2;
const EXIT_REJECTED: u8 = 3;

#[derive(Parser, Debug)]
#[command(
    name = "lexsum",
    version,
    about = "Summarise a legal document with an LLM"
)]
struct Cli {
    /// Path to a text file, or '-' to read from stdin
    #[arg(default_value = "-", value_name = "FILE")]
    input: String,

    /// Model name; falls back to OPENAI_MODEL, then gpt-4o-mini
    #[arg(long)]
    model: Option<String>,

    /// Token budget for the summary reply
    #[arg(long, default_value_t = 1200)]
    max_tokens: u32,

    /// Run without network access and emit the stub report
    #[arg(long)]
    offline: bool,

    /// Summarise even when screening says the text is not legal
    #[arg(long)]
    force: bool,

    /// Emit the legacy prose brief instead of the JSON report
    #[arg(long)]
    legacy: bool,

    /// Screening strategy
    #[arg(long, value_enum, default_value_t = DetectorArg::Heuristic)]
    detector: DetectorArg,

    /// Verbose logging to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DetectorArg {
    /// Weighted offline scorer
    Heuristic,
    /// Older keyword counter
    Keyword,
    /// Ask the model; needs network access
    Model,
}

impl From<DetectorArg> for DetectorKind {
    fn from(arg: DetectorArg) -> Self {
        match arg {
            DetectorArg::Heuristic => DetectorKind::Heuristic,
            DetectorArg::Keyword => DetectorKind::Keyword,
            DetectorArg::Model => DetectorKind::Model,
        }
    }
}

/// Input acquisition failures and the exit codes they map to.
#[derive(Debug)]
enum InputFailure {
    /// Unreadable file or path; exits 1
    Io(String),
    /// Interactive terminal with nothing piped; exits 2 with a usage hint
    NoInput,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(EXIT_RUNTIME_ERROR)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let raw = match read_input(&cli.input) {
        Ok(raw) => raw,
        Err(InputFailure::Io(message)) => {
            eprintln!("{message}");
            return Ok(ExitCode::from(EXIT_RUNTIME_ERROR));
        }
        Err(InputFailure::NoInput) => {
            eprintln!("No input provided. Pass a file path or pipe text.");
            eprintln!("  lexsum contract.txt");
            eprintln!("  cat contract.txt | lexsum -");
            return Ok(ExitCode::from(EXIT_USAGE));
        }
    };

    let doc = match Document::new(raw) {
        Ok(doc) => doc,
        Err(DocumentError::Empty) => {
            eprintln!("Error: Input is empty.");
            return Ok(ExitCode::from(EXIT_USAGE));
        }
    };

    let options = PipelineOptions {
        shape: if cli.legacy {
            OutputShape::Legacy
        } else {
            OutputShape::Structured
        },
        detector: cli.detector.into(),
        offline: cli.offline,
        force: cli.force,
        model: resolve_model(cli.model),
        max_tokens: cli.max_tokens,
    };
    tracing::debug!(
        model = %options.model,
        detector = ?options.detector,
        shape = ?options.shape,
        offline = options.offline,
        "starting run"
    );

    let pipeline =
        Pipeline::from_env(options).context("cannot start summarisation pipeline")?;

    match pipeline
        .run(&doc)
        .await
        .context("failed to generate summary")?
    {
        Outcome::Structured(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(ExitCode::SUCCESS)
        }
        Outcome::Unstructured(brief) => {
            println!("{brief}");
            Ok(ExitCode::SUCCESS)
        }
        Outcome::Rejected(verdict) => {
            let envelope = RejectionEnvelope::new(verdict);
            println!("{}", serde_json::to_string_pretty(&envelope)?);
            Ok(ExitCode::from(EXIT_REJECTED))
        }
    }
}

/// Read the document text from a path or stdin.
///
/// Byte content is decoded lossily: a stray invalid sequence in an otherwise
/// readable document should not kill the run.
fn read_input(path: &str) -> Result<String, InputFailure> {
    if path != "-" {
        let candidate = Path::new(path);
        if !candidate.exists() {
            return Err(InputFailure::Io(format!("File not found: {path}")));
        }
        if !candidate.is_file() {
            return Err(InputFailure::Io(format!("Path is not a file: {path}")));
        }
        let bytes = std::fs::read(candidate)
            .map_err(|e| InputFailure::Io(format!("Error reading input: {e}")))?;
        return Ok(String::from_utf8_lossy(&bytes).into_owned());
    }

    if std::io::stdin().is_terminal() {
        return Err(InputFailure::NoInput);
    }

    let mut bytes = Vec::new();
    std::io::stdin()
        .read_to_end(&mut bytes)
        .map_err(|e| InputFailure::Io(format!("Error reading input: {e}")))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Model name: flag first, then OPENAI_MODEL, then the built-in default.
fn resolve_model(flag: Option<String>) -> String {
    flag.or_else(|| std::env::var(OPENAI_MODEL_ENV).ok())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string())
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
