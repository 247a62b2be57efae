// anonimiseer/tests/cli_integration_tests.rs
//! Integration tests for the `anonimiseer` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

use anonimiseer_core::render_pdf;

fn anonimiseer_cmd() -> Command {
    let mut cmd = Command::cargo_bin("anonimiseer").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

/// A custom predicate to check if a string is valid JSON.
fn is_json() -> impl Predicate<str> {
    predicate::function(|s: &str| serde_json::from_str::<Value>(s).is_ok())
}

#[test]
fn test_anonymize_text_replaces_iban() {
    anonimiseer_cmd()
        .arg("anonymize")
        .arg("IBAN: NL91ABNA0417164300")
        .assert()
        .success()
        .stdout(predicate::str::contains("[REKENINGNUMMER]"))
        .stdout(predicate::str::contains("Geanonimiseerde tekst"));
}

#[test]
fn test_analyze_json_output_is_valid() {
    let output = anonimiseer_cmd()
        .arg("analyze")
        .arg("IBAN: NL91ABNA0417164300")
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .stdout(is_json())
        .get_output()
        .stdout
        .clone();

    let parsed: Value = serde_json::from_slice(&output).unwrap();
    let results = parsed["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["entity_type"], "IBAN");
    assert_eq!(results[0]["text"], "NL91ABNA0417164300");
}

#[test]
fn test_analyze_reports_no_entities_on_clean_text() {
    anonimiseer_cmd()
        .arg("analyze")
        .arg("schone tekst zonder persoonsgegevens")
        .assert()
        .success()
        .stdout(predicate::str::contains("Geen entiteiten gevonden."));
}

#[test]
fn test_entities_filter_restricts_detection() {
    anonimiseer_cmd()
        .arg("analyze")
        .arg("IBAN: NL91ABNA0417164300")
        .arg("--entities")
        .arg("PERSON")
        .assert()
        .success()
        .stdout(predicate::str::contains("Geen entiteiten gevonden."));
}

#[test]
fn test_missing_input_is_an_error() {
    anonimiseer_cmd()
        .arg("analyze")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Fout:"));
}

#[test]
fn test_anonymize_pdf_writes_output_document() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("dossier.pdf");
    let output = dir.path().join("uit.pdf");
    render_pdf("IBAN: NL91ABNA0417164300", &input).unwrap();

    let stdout = anonimiseer_cmd()
        .arg("anonymize")
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    assert!(output.exists());
    let stats: Value = serde_json::from_slice(&stdout).unwrap();
    assert_eq!(stats["total_entities"], 1);
    assert!(stats["entities_by_type"]["IBAN"].is_array());
}

#[test]
fn test_anonymize_missing_pdf_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    anonimiseer_cmd()
        .arg("anonymize")
        .arg("-i")
        .arg(dir.path().join("bestaat-niet.pdf"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Fout:"));
}
