// anonimiseer-core/src/detectors/mod.rs
//! Concrete implementations of the `Detector` trait.
//!
//! Currently ships one built-in detector:
//! * `pattern`: regex-based detection of Dutch PII (phone numbers, IBANs,
//!   e-mail addresses, street addresses, organizations, name shapes).
//!
//! Model-based detectors (spaCy-style pipelines, transformer NER) live
//! outside this crate and plug in through the same `Detector` trait.
//!
//! License: MIT OR APACHE 2.0

pub mod pattern;

pub use pattern::PatternDetector;
