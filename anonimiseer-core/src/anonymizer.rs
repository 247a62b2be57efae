// anonimiseer-core/src/anonymizer.rs
//! Convenience wrapper wiring detectors, resolver and redaction engine
//! together for one-shot use on plain text. This is the primary entry point
//! for CLI and API callers that do not go through the document pipeline.
//!
//! License: MIT OR APACHE 2.0

use std::collections::{BTreeMap, HashSet};

use log::info;

use crate::config::DetectionConfig;
use crate::detector::{Detector, DetectorRegistry};
use crate::detectors::PatternDetector;
use crate::entity::ResolvedEntity;
use crate::errors::AnonError;
use crate::redactor::{RedactionEngine, RedactionOperator};
use crate::resolver::SpanResolver;

/// Detect, resolve and redact over plain text in one call.
///
/// Holds no mutable state between calls; a shared instance may be used from
/// multiple threads.
pub struct TextAnonymizer {
    registry: DetectorRegistry,
    resolver: SpanResolver,
    redactor: RedactionEngine,
}

impl TextAnonymizer {
    /// Builds an anonymizer around an existing detector registry.
    pub fn new(registry: DetectorRegistry, config: DetectionConfig) -> Self {
        Self {
            registry,
            resolver: SpanResolver::from_config(config),
            redactor: RedactionEngine::new(),
        }
    }

    /// Builds an anonymizer from a detection config, with the built-in
    /// pattern detector registered.
    pub fn from_config(config: DetectionConfig) -> Result<Self, AnonError> {
        let mut registry = DetectorRegistry::new();
        registry.register(Box::new(PatternDetector::new(config.clone())?));
        Ok(Self::new(registry, config))
    }

    /// Builds an anonymizer with the built-in Dutch configuration.
    pub fn with_defaults() -> Result<Self, AnonError> {
        let config = DetectionConfig::load_default().map_err(AnonError::AnyhowWrapper)?;
        Self::from_config(config)
    }

    /// Registers an additional detector (e.g. a model-based one).
    pub fn register_detector(&mut self, detector: Box<dyn Detector>) {
        self.registry.register(detector);
    }

    /// Runs all detectors and the span resolver over `text`.
    pub fn analyze(
        &self,
        text: &str,
        requested_types: Option<&HashSet<String>>,
    ) -> Result<Vec<ResolvedEntity>, AnonError> {
        if text.is_empty() {
            return Err(AnonError::Validation("text cannot be empty".into()));
        }
        let detected = self.registry.detect_all(text, requested_types);
        self.resolver.resolve(text, detected, requested_types)
    }

    /// Analyzes and redacts `text`, returning the redacted text and the
    /// resolved entities that drove the redaction.
    pub fn anonymize(
        &self,
        text: &str,
        requested_types: Option<&HashSet<String>>,
        operators: Option<&BTreeMap<String, RedactionOperator>>,
    ) -> Result<(String, Vec<ResolvedEntity>), AnonError> {
        let resolved = self.analyze(text, requested_types)?;
        info!("Resolved {} entity span(s) for redaction", resolved.len());
        let redacted = self.redactor.redact(text, &resolved, operators)?;
        Ok((redacted, resolved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymize_iban_sentence() {
        let anonymizer = TextAnonymizer::with_defaults().unwrap();
        let (redacted, resolved) =
            anonymizer.anonymize("IBAN: NL91ABNA0417164300", None, None).unwrap();
        assert_eq!(redacted, "IBAN: [REKENINGNUMMER]");
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].entity_type, "IBAN");
    }

    #[test]
    fn test_anonymize_clean_text_is_identity() {
        let anonymizer = TextAnonymizer::with_defaults().unwrap();
        let (redacted, resolved) = anonymizer.anonymize("geen pii hier", None, None).unwrap();
        assert_eq!(redacted, "geen pii hier");
        assert!(resolved.is_empty());
    }

    #[test]
    fn test_empty_text_is_rejected() {
        let anonymizer = TextAnonymizer::with_defaults().unwrap();
        assert!(matches!(
            anonymizer.analyze("", None).unwrap_err(),
            AnonError::Validation(_)
        ));
    }
}
