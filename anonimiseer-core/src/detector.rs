// anonimiseer-core/src/detector.rs
//! Defines the core `Detector` trait and the registry that aggregates
//! detector results.
//!
//! The `Detector` trait provides a pluggable interface for entity detection
//! methods (regex patterns, statistical models, transformer NER). This module
//! defines the contract all detectors must adhere to; the span resolver is
//! agnostic to how many or which kinds are active.
//!
//! License: MIT OR APACHE 2.0

use std::collections::HashSet;

use log::{debug, warn};

use crate::entity::DetectedEntity;
use crate::errors::AnonError;

/// A trait that defines the core functionality of an entity detector.
///
/// This trait decouples span resolution from the specific detection method,
/// allowing pattern-based and model-based detectors to be used
/// interchangeably.
pub trait Detector: Send + Sync {
    /// A stable, human-readable identifier for the detector.
    fn name(&self) -> &str;

    /// Performs any expensive one-time setup (model loading, pattern
    /// compilation). Invoked once by the owning process before first use;
    /// `detect` may assume it has been called.
    fn initialize(&mut self) -> Result<(), AnonError> {
        Ok(())
    }

    /// Whether `initialize` has completed successfully.
    fn is_ready(&self) -> bool {
        true
    }

    /// Proposes entity spans for the given text.
    ///
    /// # Arguments
    /// * `text` - The original text to scan.
    /// * `requested_types` - If set, detectors may skip entity types outside
    ///   this set; the resolver filters again regardless.
    fn detect(
        &self,
        text: &str,
        requested_types: Option<&HashSet<String>>,
    ) -> Result<Vec<DetectedEntity>, AnonError>;
}

/// An ordered collection of detectors whose union forms the candidate pool
/// for the span resolver.
#[derive(Default)]
pub struct DetectorRegistry {
    detectors: Vec<Box<dyn Detector>>,
}

impl DetectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a detector. Order is preserved but carries no priority;
    /// conflicts between detectors are settled by the resolver.
    pub fn register(&mut self, detector: Box<dyn Detector>) {
        debug!("Registering detector '{}'", detector.name());
        self.detectors.push(detector);
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    /// Initializes every registered detector, failing on the first error.
    pub fn initialize_all(&mut self) -> Result<(), AnonError> {
        for detector in &mut self.detectors {
            detector.initialize()?;
        }
        Ok(())
    }

    /// Runs every detector over `text` and returns the union of their
    /// results.
    ///
    /// Detector failures are isolated: a detector that returns an error is
    /// logged and treated as having found nothing, so one broken detector
    /// cannot suppress the others' results.
    pub fn detect_all(
        &self,
        text: &str,
        requested_types: Option<&HashSet<String>>,
    ) -> Vec<DetectedEntity> {
        let mut candidates = Vec::new();
        for detector in &self.detectors {
            match detector.detect(text, requested_types) {
                Ok(mut found) => {
                    debug!("Detector '{}' proposed {} span(s)", detector.name(), found.len());
                    candidates.append(&mut found);
                }
                Err(e) => {
                    warn!("Detector '{}' failed, ignoring its results: {}", detector.name(), e);
                }
            }
        }
        candidates
    }
}
