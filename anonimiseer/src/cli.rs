// anonimiseer/src/cli.rs
//! This file defines the command-line interface (CLI) for the anonimiseer
//! application, including all available commands and their arguments.
//!
//! License: MIT OR APACHE 2.0

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "anonimiseer",
    version = env!("CARGO_PKG_VERSION"),
    about = "Detecteer en anonimiseer persoonsgegevens in Nederlandse tekst en PDF-documenten",
    long_about = "Anonimiseer is a command-line utility for detecting and redacting personally identifiable information (PII) in Dutch-language text and PDF documents. Detected entities (names, locations, phone numbers, IBANs, e-mail addresses, organizations, addresses) are replaced with configurable redaction tokens.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Suppress all informational messages.
    #[arg(long, short = 'q', help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long, short = 'd', help = "Enable debug logging.")]
    pub debug: bool,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `anonimiseer` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detects PII entities in text and reports them without redacting.
    #[command(about = "Detects PII entities in text and reports them without redacting.")]
    Analyze(AnalyzeCommand),

    /// Redacts PII from text or from a PDF document.
    #[command(about = "Redacts PII from text, a PDF document or a directory of PDF documents.")]
    Anonymize(AnonymizeCommand),
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Arguments for the `analyze` command.
#[derive(Parser, Debug)]
pub struct AnalyzeCommand {
    /// Text to analyze (reads from --input-file when omitted).
    pub text: Option<String>,

    /// Read input from a file instead of the positional argument. A `.pdf`
    /// file is analyzed on its extracted text.
    #[arg(long, short = 'i', value_name = "FILE", help = "Read input from a specified file (text or PDF).")]
    pub input_file: Option<PathBuf>,

    /// Restrict detection to these entity types (comma-separated).
    #[arg(long, value_delimiter = ',', help = "Restrict detection to these entity types, e.g. PERSON,IBAN.")]
    pub entities: Vec<String>,

    /// Output format.
    #[arg(long, value_enum, default_value = "text", help = "Output format (text or json).")]
    pub format: OutputFormat,

    /// Path to a custom detection configuration file (YAML).
    #[arg(long = "config", value_name = "FILE", help = "Path to a custom detection configuration file (YAML).")]
    pub config: Option<PathBuf>,
}

/// Arguments for the `anonymize` command.
#[derive(Parser, Debug)]
pub struct AnonymizeCommand {
    /// Text to anonymize (reads from --input-file when omitted).
    pub text: Option<String>,

    /// Input file: plain text, a `.pdf` document, or a directory of `.pdf`
    /// documents.
    #[arg(long, short = 'i', value_name = "PATH", help = "Input file or directory (text, PDF, or a directory of PDFs).")]
    pub input_file: Option<PathBuf>,

    /// Output path. For a PDF input this is the output document; for a
    /// directory input this is the output directory. Defaults to a
    /// `verwerkt` directory next to the input.
    #[arg(long, short = 'o', value_name = "PATH", help = "Output file or directory.")]
    pub output: Option<PathBuf>,

    /// Restrict detection to these entity types (comma-separated).
    #[arg(long, value_delimiter = ',', help = "Restrict detection to these entity types, e.g. PERSON,IBAN.")]
    pub entities: Vec<String>,

    /// Output format.
    #[arg(long, value_enum, default_value = "text", help = "Output format (text or json).")]
    pub format: OutputFormat,

    /// Path to a custom detection configuration file (YAML).
    #[arg(long = "config", value_name = "FILE", help = "Path to a custom detection configuration file (YAML).")]
    pub config: Option<PathBuf>,
}
