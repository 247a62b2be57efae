// anonimiseer-core/src/document/mod.rs
//! The document pipeline: extract linear text from a PDF, run detection,
//! resolution and redaction over it, and re-render the redacted text into a
//! new paginated PDF.
//!
//! Extraction and OCR are collaborator traits so the pipeline stays testable
//! and the OCR dependency stays outside this crate. Reconstruction is a
//! fresh line-oriented render of the transformed text, not a
//! layout-preserving edit of the original document.
//!
//! License: MIT OR APACHE 2.0

pub mod pdf;

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use chrono::Utc;
use log::{info, warn};

use crate::anonymizer::TextAnonymizer;
use crate::entity::ProcessingStats;
use crate::errors::AnonError;
use crate::redactor::RedactionOperator;

pub use pdf::{render_pdf, PdfTextExtractor};

/// Separator between pages when concatenating extracted text.
pub const PAGE_SEPARATOR: &str = "\n";

/// Extracts linear text from a document, one string per page. Image-only
/// pages yield empty strings.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<Vec<String>, AnonError>;
}

/// Optional OCR collaborator, invoked only when primary extraction yields
/// no text. No implementation ships with this crate.
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, path: &Path) -> Result<String, AnonError>;
}

/// Deterministic output name for a processed document:
/// `{unix_timestamp}_{input_stem}_geanonimiseerd.pdf`.
pub fn timestamped_output_name(input: &Path) -> String {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("document");
    format!("{}_{}_geanonimiseerd.pdf", Utc::now().timestamp(), stem)
}

/// Runs the full extract → analyze → redact → re-render flow for one
/// document and reports per-entity-type statistics.
pub struct DocumentPipeline {
    anonymizer: TextAnonymizer,
    extractor: Box<dyn TextExtractor>,
    ocr: Option<Box<dyn OcrEngine>>,
    operators: Option<BTreeMap<String, RedactionOperator>>,
}

impl DocumentPipeline {
    pub fn new(anonymizer: TextAnonymizer) -> Self {
        Self {
            anonymizer,
            extractor: Box::new(PdfTextExtractor),
            ocr: None,
            operators: None,
        }
    }

    /// Builds a pipeline with the built-in Dutch configuration and the
    /// PDF text extractor.
    pub fn with_defaults() -> Result<Self, AnonError> {
        Ok(Self::new(TextAnonymizer::with_defaults()?))
    }

    /// Replaces the text-extraction collaborator.
    pub fn with_extractor(mut self, extractor: Box<dyn TextExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Configures an OCR collaborator for image-only documents.
    pub fn with_ocr(mut self, ocr: Box<dyn OcrEngine>) -> Self {
        self.ocr = Some(ocr);
        self
    }

    /// Overrides the redaction operator table.
    pub fn with_operators(mut self, operators: BTreeMap<String, RedactionOperator>) -> Self {
        self.operators = Some(operators);
        self
    }

    /// Processes one document: extracts its text, anonymizes it and writes
    /// the redacted render to `output`.
    ///
    /// A document without extractable text is not an error: the pipeline
    /// still writes an (empty) output document and returns zero-entity
    /// statistics with an explanatory note. Extraction and reconstruction
    /// I/O failures are fatal for the document.
    pub fn process_document(
        &self,
        input: &Path,
        output: &Path,
        requested_types: Option<&HashSet<String>>,
    ) -> Result<ProcessingStats, AnonError> {
        if !input.exists() {
            return Err(AnonError::NotFound(input.to_path_buf()));
        }

        info!("Processing document: {}", input.display());
        let pages = self.extractor.extract(input)?;
        let mut text = pages.join(PAGE_SEPARATOR);
        let mut note = None;

        if text.trim().is_empty() {
            match &self.ocr {
                Some(ocr) => match ocr.recognize(input) {
                    Ok(recognized) if !recognized.trim().is_empty() => {
                        info!("Primary extraction empty, OCR recovered {} bytes", recognized.len());
                        text = recognized;
                    }
                    Ok(_) => {
                        note = Some(
                            "Geen tekst gevonden in document; OCR leverde ook geen tekst op."
                                .to_string(),
                        );
                    }
                    Err(e) => {
                        warn!("OCR failed for {}: {}", input.display(), e);
                        note = Some("Geen tekst gevonden in document; OCR mislukt.".to_string());
                    }
                },
                None => {
                    note = Some(
                        "Geen tekst gevonden in document; OCR niet geconfigureerd.".to_string(),
                    );
                }
            }
        }

        let (redacted, resolved) = if text.trim().is_empty() {
            (text.clone(), Vec::new())
        } else {
            self.anonymizer.anonymize(&text, requested_types, self.operators.as_ref())?
        };

        render_pdf(&redacted, output)?;

        let mut stats = ProcessingStats::from_resolved(
            &resolved,
            input.display().to_string(),
            output.display().to_string(),
        );
        stats.note = note;
        info!(
            "Finished {}: {} entity span(s) redacted",
            input.display(),
            stats.total_entities
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamped_output_name_uses_stem() {
        let name = timestamped_output_name(Path::new("/tmp/dossier.pdf"));
        assert!(name.ends_with("_dossier_geanonimiseerd.pdf"));
    }

    #[test]
    fn test_missing_input_is_not_found() {
        let pipeline = DocumentPipeline::with_defaults().unwrap();
        let err = pipeline
            .process_document(
                Path::new("/nonexistent/input.pdf"),
                Path::new("/tmp/out.pdf"),
                None,
            )
            .unwrap_err();
        assert!(matches!(err, AnonError::NotFound(_)));
    }
}
