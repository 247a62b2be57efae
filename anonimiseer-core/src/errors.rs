//! errors.rs - Custom error types for the anonimiseer-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that can be handled programmatically.
//!
//! License: MIT OR APACHE 2.0

use std::path::PathBuf;
use thiserror::Error;

/// This enum represents all possible error types in the `anonimiseer-core` library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions. This prevents them from
/// matching all variants exhaustively, thus avoiding breaking changes.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AnonError {
    /// Invalid input supplied by the caller (empty text, malformed operator
    /// table, overlapping spans passed to the redaction engine, ...).
    /// Never retried.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// A resolved entity type has no corresponding redaction operator.
    #[error("No redaction operator configured for entity type '{0}'")]
    MissingOperator(String),

    /// The input document does not exist. Raised before any processing begins.
    #[error("Document not found: {0}")]
    NotFound(PathBuf),

    /// The input document could not be read or parsed.
    #[error("Failed to extract text from '{path}': {reason}")]
    Extraction { path: PathBuf, reason: String },

    /// The output document could not be written.
    #[error("Failed to write output document '{path}': {reason}")]
    Reconstruction { path: PathBuf, reason: String },

    #[error("Failed to compile detection pattern '{0}': {1}")]
    PatternCompilation(String, regex::Error),

    #[error("Pattern '{0}': length ({1}) exceeds maximum allowed ({2})")]
    PatternLengthExceeded(String, usize, usize),

    #[error("An unexpected I/O error occurred: {0}")]
    Io(#[from] std::io::Error),

    #[error("A critical system error occurred: {0}")]
    AnyhowWrapper(#[from] anyhow::Error),

    #[error("A fatal error occurred: {0}")]
    Fatal(String),
}
