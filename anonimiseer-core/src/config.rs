//! Configuration management for `anonimiseer-core`.
//!
//! This module defines the data structures for detection patterns, the
//! entity-type alias table and the false-positive set. It handles
//! serialization/deserialization of YAML configurations and provides
//! utilities for loading and validating them.
//!
//! License: MIT OR APACHE 2.0

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};
use std::path::Path;

/// Maximum allowed length for a regex pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// A single regex-based detection pattern used by the pattern detector.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PatternRule {
    /// Unique identifier for the pattern (e.g. "dutch_iban").
    pub name: String,
    /// Canonical entity type this pattern proposes (e.g. "IBAN").
    pub entity_type: String,
    /// Human-readable description of what the pattern targets.
    pub description: Option<String>,
    /// The regex pattern string.
    pub pattern: String,
    /// Confidence carried by every match of this pattern.
    pub score: f64,
    /// Explicit override for enabling/disabling the pattern.
    pub enabled: Option<bool>,
}

impl Default for PatternRule {
    fn default() -> Self {
        Self {
            name: String::new(),
            entity_type: String::new(),
            description: None,
            pattern: String::new(),
            score: 0.5,
            enabled: None,
        }
    }
}

impl Eq for PatternRule {}

impl Hash for PatternRule {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.entity_type.hash(state);
        self.description.hash(state);
        self.pattern.hash(state);
        self.score.to_bits().hash(state);
        self.enabled.hash(state);
    }
}

/// Top-level detection configuration: patterns plus the static tables
/// consulted by the span resolver.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Regex-based detection patterns.
    pub patterns: Vec<PatternRule>,
    /// Detector-internal entity labels mapped onto the canonical set
    /// (e.g. "IBAN_CODE" -> "IBAN").
    pub aliases: HashMap<String, String>,
    /// Literal spans dropped by the resolver regardless of which detector
    /// proposed them.
    pub false_positives: HashSet<String>,
}

impl DetectionConfig {
    /// Loads a detection configuration from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading detection config from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: DetectionConfig = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        validate_patterns(&config.patterns)?;
        info!("Loaded {} patterns from file {}.", config.patterns.len(), path.display());

        Ok(config)
    }

    /// Loads the built-in Dutch detection configuration.
    pub fn load_default() -> Result<Self> {
        debug!("Loading default detection config from embedded string...");
        let default_yaml = include_str!("../config/default_config.yaml");
        let config: DetectionConfig =
            serde_yml::from_str(default_yaml).context("Failed to parse default config")?;

        debug!("Loaded {} default patterns.", config.patterns.len());
        Ok(config)
    }

    /// Returns the canonical name for an entity type, collapsing aliases.
    pub fn canonical_type<'a>(&'a self, entity_type: &'a str) -> &'a str {
        self.aliases.get(entity_type).map(String::as_str).unwrap_or(entity_type)
    }
}

/// Validates pattern integrity (unique names, regex compilation, length).
pub fn validate_patterns(patterns: &[PatternRule]) -> Result<()> {
    let mut names = HashSet::new();
    let mut errors = Vec::new();

    for rule in patterns {
        if rule.name.is_empty() {
            errors.push("A pattern has an empty `name` field.".to_string());
        } else if !names.insert(rule.name.clone()) {
            errors.push(format!("Duplicate pattern name found: '{}'.", rule.name));
        }

        if rule.entity_type.is_empty() {
            errors.push(format!("Pattern '{}' is missing the `entity_type` field.", rule.name));
        }

        if rule.pattern.is_empty() {
            errors.push(format!("Pattern '{}' has an empty `pattern` field.", rule.name));
        } else if rule.pattern.len() > MAX_PATTERN_LENGTH {
            errors.push(format!(
                "Pattern '{}': length ({}) exceeds maximum allowed ({}).",
                rule.name,
                rule.pattern.len(),
                MAX_PATTERN_LENGTH
            ));
        } else if let Err(e) = Regex::new(&rule.pattern) {
            errors.push(format!("Pattern '{}' has an invalid regex: {}", rule.name, e));
        }

        if !(0.0..=1.0).contains(&rule.score) {
            errors.push(format!(
                "Pattern '{}': score ({}) must be within [0.0, 1.0].",
                rule.name, rule.score
            ));
        }
    }

    if !errors.is_empty() {
        Err(anyhow!("Pattern validation failed:\n{}", errors.join("\n")))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = DetectionConfig::load_default().unwrap();
        assert!(!config.patterns.is_empty());
        assert!(validate_patterns(&config.patterns).is_ok());
        assert_eq!(config.canonical_type("IBAN_CODE"), "IBAN");
        assert_eq!(config.canonical_type("ORG"), "ORGANIZATION");
        assert_eq!(config.canonical_type("PERSON"), "PERSON");
        assert!(config.false_positives.contains("Met vriendelijke groet"));
    }

    #[test]
    fn test_validate_rejects_invalid_regex() {
        let rules = vec![PatternRule {
            name: "broken".into(),
            entity_type: "PERSON".into(),
            pattern: "([unclosed".into(),
            score: 0.5,
            ..Default::default()
        }];
        assert!(validate_patterns(&rules).is_err());
    }

    #[test]
    fn test_validate_rejects_duplicate_names() {
        let rule = PatternRule {
            name: "dup".into(),
            entity_type: "EMAIL".into(),
            pattern: "a+".into(),
            score: 0.5,
            ..Default::default()
        };
        let rules = vec![rule.clone(), rule];
        let err = validate_patterns(&rules).unwrap_err();
        assert!(err.to_string().contains("Duplicate pattern name"));
    }

    #[test]
    fn test_validate_rejects_out_of_range_score() {
        let rules = vec![PatternRule {
            name: "scored".into(),
            entity_type: "EMAIL".into(),
            pattern: "a+".into(),
            score: 1.5,
            ..Default::default()
        }];
        assert!(validate_patterns(&rules).is_err());
    }
}
