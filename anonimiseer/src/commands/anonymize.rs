// anonimiseer/src/commands/anonymize.rs
//! The `anonymize` command: redact PII from text, a PDF document or a
//! directory of PDF documents.
//!
//! License: MIT OR APACHE 2.0

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::info;
use serde_json::json;

use anonimiseer_core::{
    timestamped_output_name, DocumentPipeline, ProcessingStats, ResolvedEntity, TextAnonymizer,
};

use crate::cli::{AnonymizeCommand, OutputFormat};
use crate::commands::{build_anonymizer, is_pdf, load_config, requested_types};

pub fn run_anonymize(cmd: AnonymizeCommand) -> Result<()> {
    let requested = requested_types(&cmd.entities);

    match &cmd.input_file {
        Some(path) if path.is_dir() => {
            anonymize_directory(&cmd, path.clone(), requested.as_ref())
        }
        Some(path) if is_pdf(path) => {
            let pipeline = build_pipeline(&cmd)?;
            let output = resolve_output(path, cmd.output.as_deref())?;
            let stats = pipeline.process_document(path, &output, requested.as_ref())?;
            print_stats(&stats, cmd.format);
            Ok(())
        }
        _ => {
            let text = crate::commands::read_input_text(cmd.text.clone(), cmd.input_file.as_deref())?;
            let anonymizer = build_anonymizer(cmd.config.as_deref())?;
            anonymize_text(&anonymizer, &text, requested.as_ref(), &cmd)
        }
    }
}

fn anonymize_text(
    anonymizer: &TextAnonymizer,
    text: &str,
    requested: Option<&HashSet<String>>,
    cmd: &AnonymizeCommand,
) -> Result<()> {
    let (anonymized, resolved) = anonymizer.anonymize(text, requested, None)?;

    if let Some(output) = &cmd.output {
        fs::write(output, &anonymized)
            .with_context(|| format!("Failed to write output file: {}", output.display()))?;
        info!("Wrote anonymized text to {}", output.display());
    }

    match cmd.format {
        OutputFormat::Json => {
            let output = json!({
                "original_text": text,
                "anonymized_text": anonymized,
                "entities_found": entities_json(&resolved),
            });
            println!("{}", serde_json::to_string_pretty(&output).expect("json serialize"));
        }
        OutputFormat::Text => {
            println!("\nOriginele tekst:");
            println!("{}", text);
            println!("\nGeanonimiseerde tekst:");
            println!("{}", anonymized);
            if !resolved.is_empty() {
                println!("\nGevonden en vervangen entiteiten:");
                println!("{}", "-".repeat(40));
                for entity in &resolved {
                    println!("Type: {}", entity.entity_type);
                    println!("Text: {}", entity.text);
                    println!("Score: {:.2}", entity.score);
                    println!("{}", "-".repeat(40));
                }
            }
        }
    }
    Ok(())
}

fn anonymize_directory(
    cmd: &AnonymizeCommand,
    dir: PathBuf,
    requested: Option<&HashSet<String>>,
) -> Result<()> {
    let pipeline = build_pipeline(cmd)?;
    let output_dir = match &cmd.output {
        Some(path) => path.clone(),
        None => dir.join("verwerkt"),
    };
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

    let mut processed = 0usize;
    let mut entries: Vec<PathBuf> = fs::read_dir(&dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_pdf(path))
        .collect();
    entries.sort();

    for input in entries {
        let output = output_dir.join(timestamped_output_name(&input));
        let stats = pipeline.process_document(&input, &output, requested)?;
        print_stats(&stats, cmd.format);
        processed += 1;
    }

    if processed == 0 {
        bail!("Geen PDF-bestanden gevonden in {}", dir.display());
    }
    info!("Processed {} document(s) from {}", processed, dir.display());
    Ok(())
}

fn build_pipeline(cmd: &AnonymizeCommand) -> Result<DocumentPipeline> {
    let config = load_config(cmd.config.as_deref())?;
    let anonymizer = TextAnonymizer::from_config(config)?;
    Ok(DocumentPipeline::new(anonymizer))
}

/// Output path for a single PDF: explicit `-o`, or a timestamped name in a
/// `verwerkt` directory next to the input.
fn resolve_output(input: &Path, output: Option<&Path>) -> Result<PathBuf> {
    match output {
        Some(path) => Ok(path.to_path_buf()),
        None => {
            let parent = input.parent().unwrap_or_else(|| Path::new("."));
            let verwerkt = parent.join("verwerkt");
            fs::create_dir_all(&verwerkt).with_context(|| {
                format!("Failed to create output directory: {}", verwerkt.display())
            })?;
            Ok(verwerkt.join(timestamped_output_name(input)))
        }
    }
}

fn print_stats(stats: &ProcessingStats, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(stats).expect("stats serialize"));
        }
        OutputFormat::Text => {
            println!("Verwerkt: {}", stats.input_file);
            println!("Uitvoer:  {}", stats.output_file);
            println!("Totaal gevonden entiteiten: {}", stats.total_entities);
            for (entity_type, mentions) in &stats.entities_by_type {
                println!("  {}: {}", entity_type, mentions.len());
            }
            if let Some(note) = &stats.note {
                println!("Opmerking: {}", note);
            }
        }
    }
}

fn entities_json(resolved: &[ResolvedEntity]) -> Vec<serde_json::Value> {
    resolved
        .iter()
        .map(|e| {
            json!({
                "entity_type": e.entity_type,
                "text": e.text,
                "start": e.start,
                "end": e.end,
                "score": e.score,
            })
        })
        .collect()
}
