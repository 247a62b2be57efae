// anonimiseer-core/src/resolver.rs
//! The span resolver: merges the results of all active detectors into a
//! non-overlapping set of resolved entities.
//!
//! Resolution is deterministic: candidates are ordered by descending score,
//! then descending span length, then ascending start offset and entity type.
//! Selection is greedy, favoring confidence over maximal packing. The greedy
//! heuristic is not globally optimal by total coverage; that is the intended
//! policy, since one wrong redaction is worse than one missed low-confidence
//! one.
//!
//! License: MIT OR APACHE 2.0

use std::collections::HashSet;

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::DetectionConfig;
use crate::entity::{DetectedEntity, ResolvedEntity};
use crate::errors::AnonError;

/// A domain-specific post-filter applied during candidate selection.
///
/// Exclusion rules let new dropout conditions be added without touching the
/// resolution loop. `excludes` receives the candidate with its type already
/// canonicalized and the matched snippet.
pub trait ExclusionRule: Send + Sync {
    fn name(&self) -> &str;

    /// Returns `true` when the candidate must be dropped.
    fn excludes(&self, snippet: &str, candidate: &DetectedEntity) -> bool;
}

/// Drops LOCATION candidates that look like bank-account codes: an NL/BE/DE
/// country prefix followed by digits is an IBAN fragment, not a place name.
pub struct BankCodeAsLocation;

impl ExclusionRule for BankCodeAsLocation {
    fn name(&self) -> &str {
        "bank-code-as-location"
    }

    fn excludes(&self, snippet: &str, candidate: &DetectedEntity) -> bool {
        if candidate.entity_type != "LOCATION" {
            return false;
        }
        let upper = snippet.to_uppercase();
        ["NL", "BE", "DE"].iter().any(|prefix| upper.starts_with(prefix))
            && snippet.chars().any(|c| c.is_ascii_digit())
    }
}

static PERSON_STOP_WORDS: &[&str] = &[
    "aan de", "voor de", "met de", "in de", "op de", "bij de", "wordt", "kunnen", "hebben",
    "moeten", "zullen", "ruimte", "contact", "kantoor", "tijdens", "bleek", "sprak", "momenteel",
];

static FORMAL_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:de\s+heer|mevrouw|mevr\.|dhr\.|dr\.|mr\.|prof\.)\s+(?:[A-Z]\.?\s+)?(?:van\s+(?:der|den|de|het)|de|den|ter|te|ten|het|'t)?\s*[A-Z][a-zÀ-ÿ]+\b",
    )
    .unwrap()
});

static FAMILY_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:familie|gezin|echtpaar)\s+(?:van\s+(?:der|den|de|het)|de|den|ter|te|ten|het|'t)?\s*[A-Z][a-zÀ-ÿ]+\b",
    )
    .unwrap()
});

static FULL_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b[A-Z][a-zÀ-ÿ]+\s+(?:van\s+(?:der|den|de|het)|de|den|ter|te|ten|het|'t)?\s*[A-Z][a-zÀ-ÿ]+\b",
    )
    .unwrap()
});

/// Drops PERSON candidates whose text does not look like a Dutch name:
/// spans containing common function words, or spans matching none of the
/// accepted name shapes (formal address, family reference, full name).
pub struct DutchPersonShape;

impl ExclusionRule for DutchPersonShape {
    fn name(&self) -> &str {
        "dutch-person-shape"
    }

    fn excludes(&self, snippet: &str, candidate: &DetectedEntity) -> bool {
        if candidate.entity_type != "PERSON" {
            return false;
        }
        let lower = snippet.to_lowercase();
        if PERSON_STOP_WORDS.iter().any(|w| lower.contains(w)) {
            return true;
        }
        !(FORMAL_NAME_RE.is_match(snippet)
            || FAMILY_NAME_RE.is_match(snippet)
            || FULL_NAME_RE.is_match(snippet))
    }
}

/// Merges detector output into a non-overlapping, canonically-typed set.
///
/// Pure over its inputs aside from the static alias/false-positive tables
/// it was built with; safe to share across threads.
pub struct SpanResolver {
    config: DetectionConfig,
    exclusions: Vec<Box<dyn ExclusionRule>>,
}

impl SpanResolver {
    /// Builds a resolver with the standard Dutch exclusion rules.
    pub fn from_config(config: DetectionConfig) -> Self {
        Self {
            config,
            exclusions: vec![Box::new(BankCodeAsLocation), Box::new(DutchPersonShape)],
        }
    }

    /// Builds a resolver without any exclusion rules.
    pub fn bare(config: DetectionConfig) -> Self {
        Self { config, exclusions: Vec::new() }
    }

    /// Adds a domain-specific exclusion rule.
    pub fn with_exclusion(mut self, rule: Box<dyn ExclusionRule>) -> Self {
        self.exclusions.push(rule);
        self
    }

    /// Resolves raw detector candidates into a non-overlapping entity set.
    ///
    /// Empty `text` is rejected; an empty candidate list yields `Ok(vec![])`.
    pub fn resolve(
        &self,
        text: &str,
        detected: Vec<DetectedEntity>,
        requested_types: Option<&HashSet<String>>,
    ) -> Result<Vec<ResolvedEntity>, AnonError> {
        if text.is_empty() {
            return Err(AnonError::Validation("text cannot be empty".into()));
        }
        if detected.is_empty() {
            return Ok(Vec::new());
        }

        // Canonicalize types and drop candidates that violate the span
        // invariant (a broken detector must not abort the whole run).
        let mut candidates: Vec<DetectedEntity> = Vec::with_capacity(detected.len());
        for mut entity in detected {
            if !entity.is_valid_for(text) {
                warn!(
                    "Dropping out-of-range span [{}, {}) of type '{}'",
                    entity.start, entity.end, entity.entity_type
                );
                continue;
            }
            let alias = self.config.aliases.get(&entity.entity_type).cloned();
            if let Some(requested) = requested_types {
                // Accept a request phrased in either the detector's label or
                // the canonical name.
                let canonical = alias.as_deref().unwrap_or(&entity.entity_type);
                if !requested.contains(&entity.entity_type) && !requested.contains(canonical) {
                    continue;
                }
            }
            if let Some(canonical) = alias {
                entity.entity_type = canonical;
            }
            candidates.push(entity);
        }

        // Descending score, then descending length; start and type break the
        // remaining ties so the order is total and runs are reproducible.
        candidates.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| b.len().cmp(&a.len()))
                .then_with(|| a.start.cmp(&b.start))
                .then_with(|| a.entity_type.cmp(&b.entity_type))
        });

        let mut resolved: Vec<ResolvedEntity> = Vec::new();
        'candidates: for candidate in candidates {
            let snippet = &text[candidate.start..candidate.end];

            if self.config.false_positives.contains(snippet) {
                debug!("Dropping configured false positive: '{}'", snippet);
                continue;
            }

            for selected in &resolved {
                if candidate.start < selected.end && selected.start < candidate.end {
                    continue 'candidates;
                }
            }

            for rule in &self.exclusions {
                if rule.excludes(snippet, &candidate) {
                    debug!("Exclusion rule '{}' dropped span '{}'", rule.name(), snippet);
                    continue 'candidates;
                }
            }

            resolved.push(ResolvedEntity {
                entity_type: candidate.entity_type,
                start: candidate.start,
                end: candidate.end,
                score: candidate.score,
                text: snippet.to_string(),
            });
        }

        Ok(resolved)
    }
}
