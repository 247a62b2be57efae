// anonimiseer-core/src/entity.rs
//! Core data structures for detected and resolved entity spans, and for
//! per-run processing statistics.
//!
//! License: MIT OR APACHE 2.0

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

/// One detector's claim about a substring of the original text.
///
/// `start` and `end` are half-open byte offsets into the text the detector
/// was given, both on `char` boundaries. A `DetectedEntity` is immutable
/// once produced; the span resolver may rename its type (alias collapsing)
/// by constructing a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedEntity {
    pub entity_type: String,
    pub start: usize,
    pub end: usize,
    /// Confidence in `[0.0, 1.0]`.
    pub score: f64,
}

impl DetectedEntity {
    pub fn new(entity_type: impl Into<String>, start: usize, end: usize, score: f64) -> Self {
        Self { entity_type: entity_type.into(), start, end, score }
    }

    /// Span length in bytes.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Whether the span shares any character position with `other`.
    pub fn overlaps(&self, other: &DetectedEntity) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Checks the span invariant against the text it refers to:
    /// `0 <= start < end <= text.len()`, both offsets on `char` boundaries.
    pub fn is_valid_for(&self, text: &str) -> bool {
        self.start < self.end
            && self.end <= text.len()
            && text.is_char_boundary(self.start)
            && text.is_char_boundary(self.end)
    }
}

/// A `DetectedEntity` that survived conflict resolution and false-positive
/// filtering. Within one resolution run, resolved entities are guaranteed
/// pairwise non-overlapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedEntity {
    /// Canonical entity type (aliases collapsed, e.g. `IBAN`, never `IBAN_CODE`).
    pub entity_type: String,
    pub start: usize,
    pub end: usize,
    pub score: f64,
    /// The original substring `text[start..end]`.
    pub text: String,
}

impl ResolvedEntity {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn overlaps(&self, other: &ResolvedEntity) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// One redacted occurrence, as reported in [`ProcessingStats`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMention {
    pub text: String,
    pub score: f64,
}

/// Aggregate of a single document run, returned to the caller and not
/// retained by the core.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingStats {
    pub total_entities: usize,
    /// Resolved entities grouped by canonical type. A `BTreeMap` keeps the
    /// serialized output deterministic.
    pub entities_by_type: BTreeMap<String, Vec<EntityMention>>,
    pub input_file: String,
    pub output_file: String,
    /// Informational note for non-fatal conditions, e.g. a document without
    /// extractable text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ProcessingStats {
    /// Groups resolved entities by canonical type.
    pub fn from_resolved(
        resolved: &[ResolvedEntity],
        input_file: impl Into<String>,
        output_file: impl Into<String>,
    ) -> Self {
        let mut entities_by_type: BTreeMap<String, Vec<EntityMention>> = BTreeMap::new();
        for entity in resolved {
            entities_by_type
                .entry(entity.entity_type.clone())
                .or_default()
                .push(EntityMention { text: entity.text.clone(), score: entity.score });
        }
        Self {
            total_entities: resolved.len(),
            entities_by_type,
            input_file: input_file.into(),
            output_file: output_file.into(),
            note: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_detection() {
        let a = DetectedEntity::new("PERSON", 0, 12, 0.85);
        let b = DetectedEntity::new("ORGANIZATION", 0, 17, 0.7);
        let c = DetectedEntity::new("LOCATION", 21, 30, 0.9);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_adjacent_spans_do_not_overlap() {
        let a = DetectedEntity::new("PERSON", 0, 5, 0.9);
        let b = DetectedEntity::new("PERSON", 5, 10, 0.9);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_span_validity() {
        let text = "Jan de Vries";
        assert!(DetectedEntity::new("PERSON", 0, 12, 0.85).is_valid_for(text));
        assert!(!DetectedEntity::new("PERSON", 0, 13, 0.85).is_valid_for(text));
        assert!(!DetectedEntity::new("PERSON", 4, 4, 0.85).is_valid_for(text));
        // offset inside a multi-byte character is not a valid span boundary
        let accented = "Café Jansen";
        assert!(!DetectedEntity::new("ORGANIZATION", 0, 4, 0.85).is_valid_for(accented));
    }

    #[test]
    fn test_stats_grouping_is_deterministic() {
        let resolved = vec![
            ResolvedEntity {
                entity_type: "PERSON".into(),
                start: 0,
                end: 12,
                score: 0.85,
                text: "Jan de Vries".into(),
            },
            ResolvedEntity {
                entity_type: "LOCATION".into(),
                start: 22,
                end: 31,
                score: 0.85,
                text: "Amsterdam".into(),
            },
        ];
        let stats = ProcessingStats::from_resolved(&resolved, "in.pdf", "out.pdf");
        assert_eq!(stats.total_entities, 2);
        let keys: Vec<&String> = stats.entities_by_type.keys().collect();
        assert_eq!(keys, vec!["LOCATION", "PERSON"]);
    }
}
