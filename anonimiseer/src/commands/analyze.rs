// anonimiseer/src/commands/analyze.rs
//! The `analyze` command: detect PII entities and report them without
//! redacting.
//!
//! License: MIT OR APACHE 2.0

use anyhow::Result;
use log::info;
use serde_json::json;

use anonimiseer_core::ResolvedEntity;

use crate::cli::{AnalyzeCommand, OutputFormat};
use crate::commands::{build_anonymizer, read_input_text, requested_types};

pub fn run_analyze(cmd: AnalyzeCommand) -> Result<()> {
    let text = read_input_text(cmd.text, cmd.input_file.as_deref())?;
    let anonymizer = build_anonymizer(cmd.config.as_deref())?;
    let requested = requested_types(&cmd.entities);

    info!("Analyzing {} byte(s) of input", text.len());
    let resolved = anonymizer.analyze(&text, requested.as_ref())?;

    match cmd.format {
        OutputFormat::Json => print_json(&resolved),
        OutputFormat::Text => print_text(&resolved),
    }
    Ok(())
}

fn print_json(resolved: &[ResolvedEntity]) {
    let output = json!({
        "results": resolved.iter().map(|e| json!({
            "entity_type": e.entity_type,
            "text": e.text,
            "start": e.start,
            "end": e.end,
            "score": e.score,
        })).collect::<Vec<_>>(),
    });
    println!("{}", serde_json::to_string_pretty(&output).expect("stats serialize"));
}

fn print_text(resolved: &[ResolvedEntity]) {
    if resolved.is_empty() {
        println!("Geen entiteiten gevonden.");
        return;
    }
    println!("\nGevonden entiteiten:");
    println!("{}", "-".repeat(40));
    for entity in resolved {
        println!("Type: {}", entity.entity_type);
        println!("Text: {}", entity.text);
        println!("Positie: {}-{}", entity.start, entity.end);
        println!("Score: {:.2}", entity.score);
        println!("{}", "-".repeat(40));
    }
}
