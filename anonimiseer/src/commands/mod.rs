// anonimiseer/src/commands/mod.rs
//! Command implementations and shared input/output helpers.
//!
//! License: MIT OR APACHE 2.0

pub mod analyze;
pub mod anonymize;

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use anonimiseer_core::{DetectionConfig, PdfTextExtractor, TextAnonymizer, TextExtractor};

use crate::cli::{Cli, Commands};

/// Dispatches the parsed CLI to its command implementation.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Analyze(cmd) => analyze::run_analyze(cmd),
        Commands::Anonymize(cmd) => anonymize::run_anonymize(cmd),
    }
}

/// Loads the detection configuration: a user-supplied YAML file, or the
/// built-in Dutch defaults.
pub(crate) fn load_config(config: Option<&Path>) -> Result<DetectionConfig> {
    match config {
        Some(path) => DetectionConfig::load_from_file(path),
        None => DetectionConfig::load_default(),
    }
}

/// Builds the plain-text anonymizer for the given configuration.
pub(crate) fn build_anonymizer(config: Option<&Path>) -> Result<TextAnonymizer> {
    let config = load_config(config)?;
    let anonymizer = TextAnonymizer::from_config(config)?;
    Ok(anonymizer)
}

/// Resolves the input text for a command: the positional argument, or the
/// contents of `--input-file`. A `.pdf` file is read through the PDF text
/// extractor.
pub(crate) fn read_input_text(text: Option<String>, input_file: Option<&Path>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    let path = input_file
        .context("Provide either TEXT or --input-file")?;
    if is_pdf(path) {
        let pages = PdfTextExtractor.extract(path)?;
        Ok(pages.join("\n"))
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display()))
    }
}

/// Converts the `--entities` list into the optional requested-types set.
pub(crate) fn requested_types(entities: &[String]) -> Option<HashSet<String>> {
    if entities.is_empty() {
        None
    } else {
        Some(entities.iter().map(|e| e.to_uppercase()).collect())
    }
}

pub(crate) fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}
