// anonimiseer-core/src/lib.rs
//! # Anonimiseer Core Library
//!
//! `anonimiseer-core` provides the platform-independent logic for detecting
//! personally identifiable information (PII) in Dutch text and producing a
//! redacted version of that text, both for plain strings and for PDF
//! documents.
//!
//! The library is designed to be pure and stateless between calls: each
//! resolve/redact/process invocation is independent, so concurrent callers
//! may use a shared instance from parallel threads without coordination.
//!
//! ## Modules
//!
//! * `config`: Detection patterns, the entity-type alias table and the
//!   false-positive set, loadable from YAML.
//! * `entity`: `DetectedEntity`, `ResolvedEntity` and per-run statistics.
//! * `detector`: The pluggable `Detector` trait and the registry that
//!   aggregates detector results, isolating per-detector failures.
//! * `detectors`: Built-in detector implementations (regex patterns).
//! * `resolver`: Merges detector output into a non-overlapping entity set
//!   (score-then-length priority, alias collapsing, exclusion rules).
//! * `redactor`: Maps entity types to redaction operators and rewrites the
//!   text in one left-to-right pass.
//! * `anonymizer`: One-shot analyze/anonymize convenience for plain text.
//! * `document`: PDF extraction, the OCR collaborator seam, and
//!   line-oriented reconstruction of the redacted text.
//!
//! ## Usage Example
//!
//! ```rust
//! use anonimiseer_core::TextAnonymizer;
//!
//! fn main() -> Result<(), anonimiseer_core::AnonError> {
//!     let anonymizer = TextAnonymizer::with_defaults()?;
//!     let (redacted, entities) =
//!         anonymizer.anonymize("IBAN: NL91ABNA0417164300", None, None)?;
//!     assert_eq!(redacted, "IBAN: [REKENINGNUMMER]");
//!     assert_eq!(entities.len(), 1);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`AnonError`], a structured enum separating
//! validation errors, missing redaction operators, missing documents, and
//! extraction/reconstruction failures.
//!
//! License: MIT OR APACHE 2.0

pub mod anonymizer;
pub mod config;
pub mod detector;
pub mod detectors;
pub mod document;
pub mod entity;
pub mod errors;
pub mod redactor;
pub mod resolver;

/// Re-exports the configuration types for detection patterns and the
/// resolver's static tables.
pub use config::{validate_patterns, DetectionConfig, PatternRule, MAX_PATTERN_LENGTH};

/// Re-exports the custom error type for clear error reporting.
pub use errors::AnonError;

/// Re-exports the entity span types and run statistics.
pub use entity::{DetectedEntity, EntityMention, ProcessingStats, ResolvedEntity};

/// Re-exports the detector seam.
pub use detector::{Detector, DetectorRegistry};
pub use detectors::PatternDetector;

/// Re-exports span resolution and its pluggable exclusion rules.
pub use resolver::{BankCodeAsLocation, DutchPersonShape, ExclusionRule, SpanResolver};

/// Re-exports the redaction engine and operator table.
pub use redactor::{default_operators, RedactionEngine, RedactionOperator, MIN_REDACTION_SCORE};

/// Re-exports the one-shot plain-text entry point.
pub use anonymizer::TextAnonymizer;

/// Re-exports the document pipeline and its collaborator seams.
pub use document::{
    render_pdf, timestamped_output_name, DocumentPipeline, OcrEngine, PdfTextExtractor,
    TextExtractor,
};
