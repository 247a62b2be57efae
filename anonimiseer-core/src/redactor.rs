// anonimiseer-core/src/redactor.rs
//! The redaction engine: maps each resolved entity type to a redaction
//! operator and rewrites the text in a single left-to-right pass.
//!
//! The engine expects its input to be pairwise non-overlapping; conflict
//! resolution is the span resolver's job. Overlapping input is rejected
//! with a validation error rather than silently corrupting offsets.
//!
//! License: MIT OR APACHE 2.0

use std::collections::{BTreeMap, HashSet};

use log::debug;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::entity::ResolvedEntity;
use crate::errors::AnonError;

/// Resolved spans scoring below this are left untouched rather than
/// redacted: a low-confidence wrong redaction is worse than a miss.
pub const MIN_REDACTION_SCORE: f64 = 0.4;

/// A configured transform applied to a resolved span's original text.
///
/// Only `Replace` is used by the default table; `Mask` and `Hash` are
/// available for callers that need partial visibility or a stable
/// pseudonymous token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RedactionOperator {
    /// Substitute the span with a literal replacement string.
    Replace { value: String },
    /// Mask `chars_to_mask` characters of the span with `mask_char`.
    Mask { mask_char: char, chars_to_mask: usize, from_end: bool },
    /// Substitute the span with the hex SHA-256 of its text.
    Hash,
}

impl RedactionOperator {
    pub fn replace(value: impl Into<String>) -> Self {
        Self::Replace { value: value.into() }
    }

    /// Produces the replacement for `original`.
    pub fn apply(&self, original: &str) -> String {
        match self {
            Self::Replace { value } => value.clone(),
            Self::Mask { mask_char, chars_to_mask, from_end } => {
                let chars: Vec<char> = original.chars().collect();
                let count = (*chars_to_mask).min(chars.len());
                let masked_range = if *from_end {
                    chars.len() - count..chars.len()
                } else {
                    0..count
                };
                chars
                    .iter()
                    .enumerate()
                    .map(|(i, c)| if masked_range.contains(&i) { *mask_char } else { *c })
                    .collect()
            }
            Self::Hash => {
                let mut hasher = Sha256::new();
                hasher.update(original.as_bytes());
                hex::encode(hasher.finalize())
            }
        }
    }
}

/// The built-in operator table: every canonical Dutch entity type mapped to
/// its replacement token.
pub fn default_operators() -> BTreeMap<String, RedactionOperator> {
    BTreeMap::from([
        ("PERSON".to_string(), RedactionOperator::replace("[NAAM]")),
        ("LOCATION".to_string(), RedactionOperator::replace("[LOCATIE]")),
        ("PHONE_NUMBER".to_string(), RedactionOperator::replace("[TELEFOONNUMMER]")),
        ("IBAN".to_string(), RedactionOperator::replace("[REKENINGNUMMER]")),
        ("EMAIL".to_string(), RedactionOperator::replace("[EMAIL]")),
        ("ORGANIZATION".to_string(), RedactionOperator::replace("[ORGANISATIE]")),
        ("ADDRESS".to_string(), RedactionOperator::replace("[ADRES]")),
    ])
}

/// Applies redaction operators to resolved spans.
///
/// Stateless between calls; `redact` is a pure function of its arguments.
#[derive(Debug, Clone)]
pub struct RedactionEngine {
    min_score: f64,
}

impl Default for RedactionEngine {
    fn default() -> Self {
        Self { min_score: MIN_REDACTION_SCORE }
    }
}

impl RedactionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the minimum confidence threshold.
    pub fn with_min_score(min_score: f64) -> Self {
        Self { min_score }
    }

    /// Rewrites `text`, substituting every resolved span with its operator's
    /// replacement value.
    ///
    /// When `operators` is `None`, the built-in table is used. A supplied
    /// table must be non-empty and must cover every entity type present in
    /// `resolved`.
    pub fn redact(
        &self,
        text: &str,
        resolved: &[ResolvedEntity],
        operators: Option<&BTreeMap<String, RedactionOperator>>,
    ) -> Result<String, AnonError> {
        if text.is_empty() {
            return Err(AnonError::Validation("text cannot be empty".into()));
        }

        let default_table;
        let table = match operators {
            Some(supplied) => {
                if supplied.is_empty() {
                    return Err(AnonError::Validation(
                        "operator table cannot be empty".into(),
                    ));
                }
                supplied
            }
            None => {
                default_table = default_operators();
                &default_table
            }
        };

        // Coverage is checked against every resolved type, including spans
        // that the confidence threshold will skip below.
        let present: HashSet<&str> = resolved.iter().map(|e| e.entity_type.as_str()).collect();
        for entity_type in present {
            if !table.contains_key(entity_type) {
                return Err(AnonError::MissingOperator(entity_type.to_string()));
            }
        }

        let mut spans: Vec<&ResolvedEntity> = resolved
            .iter()
            .filter(|e| {
                if e.score < self.min_score {
                    debug!(
                        "Skipping low-confidence span '{}' (score {:.2} < {:.2})",
                        e.entity_type, e.score, self.min_score
                    );
                    false
                } else {
                    true
                }
            })
            .collect();
        spans.sort_by_key(|e| e.start);

        for pair in spans.windows(2) {
            if pair[1].start < pair[0].end {
                return Err(AnonError::Validation(format!(
                    "overlapping spans passed to redaction engine: [{}, {}) and [{}, {})",
                    pair[0].start, pair[0].end, pair[1].start, pair[1].end
                )));
            }
        }

        let mut output = String::with_capacity(text.len());
        let mut cursor = 0usize;
        for span in spans {
            if span.end > text.len()
                || !text.is_char_boundary(span.start)
                || !text.is_char_boundary(span.end)
            {
                return Err(AnonError::Validation(format!(
                    "span [{}, {}) does not fit the supplied text",
                    span.start, span.end
                )));
            }
            output.push_str(&text[cursor..span.start]);
            let replacement = table
                .get(span.entity_type.as_str())
                .ok_or_else(|| AnonError::MissingOperator(span.entity_type.clone()))?
                .apply(&text[span.start..span.end]);
            output.push_str(&replacement);
            cursor = span.end;
        }
        output.push_str(&text[cursor..]);

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(entity_type: &str, start: usize, end: usize, score: f64, text: &str) -> ResolvedEntity {
        ResolvedEntity {
            entity_type: entity_type.into(),
            start,
            end,
            score,
            text: text[start..end].to_string(),
        }
    }

    #[test]
    fn test_replace_operator() {
        let text = "Jan de Vries woont in Amsterdam.";
        let spans = vec![
            resolved("PERSON", 0, 12, 0.85, text),
            resolved("LOCATION", 22, 31, 0.85, text),
        ];
        let out = RedactionEngine::new().redact(text, &spans, None).unwrap();
        assert_eq!(out, "[NAAM] woont in [LOCATIE].");
    }

    #[test]
    fn test_no_spans_is_identity() {
        let text = "schone tekst zonder PII";
        let out = RedactionEngine::new().redact(text, &[], None).unwrap();
        assert_eq!(out, text);
    }

    #[test]
    fn test_empty_text_is_rejected() {
        let err = RedactionEngine::new().redact("", &[], None).unwrap_err();
        assert!(matches!(err, AnonError::Validation(_)));
    }

    #[test]
    fn test_empty_operator_table_is_rejected() {
        let table = BTreeMap::new();
        let err = RedactionEngine::new().redact("tekst", &[], Some(&table)).unwrap_err();
        assert!(matches!(err, AnonError::Validation(_)));
    }

    #[test]
    fn test_missing_operator_is_reported() {
        let text = "NL91ABNA0417164300";
        let spans = vec![resolved("IBAN", 0, 18, 0.95, text)];
        let table = BTreeMap::from([("PERSON".to_string(), RedactionOperator::replace("[NAAM]"))]);
        let err = RedactionEngine::new().redact(text, &spans, Some(&table)).unwrap_err();
        match err {
            AnonError::MissingOperator(t) => assert_eq!(t, "IBAN"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_low_confidence_span_is_left_untouched() {
        let text = "Jan de Vries woont hier";
        let spans = vec![resolved("PERSON", 0, 12, 0.2, text)];
        let out = RedactionEngine::new().redact(text, &spans, None).unwrap();
        assert_eq!(out, text);
    }

    #[test]
    fn test_span_ending_inside_multibyte_char_is_rejected() {
        let text = "Café Jansen";
        // end = 4 falls inside the two-byte 'é'
        let spans = vec![ResolvedEntity {
            entity_type: "ORGANIZATION".into(),
            start: 0,
            end: 4,
            score: 0.85,
            text: "Caf".into(),
        }];
        let err = RedactionEngine::new().redact(text, &spans, None).unwrap_err();
        assert!(matches!(err, AnonError::Validation(_)));
    }

    #[test]
    fn test_overlapping_input_is_rejected() {
        let text = "Jan de Vries Bank";
        let spans = vec![
            resolved("PERSON", 0, 12, 0.85, text),
            resolved("ORGANIZATION", 4, 17, 0.85, text),
        ];
        let err = RedactionEngine::new().redact(text, &spans, None).unwrap_err();
        assert!(matches!(err, AnonError::Validation(_)));
    }

    #[test]
    fn test_redaction_is_deterministic() {
        let text = "Mail jan@voorbeeld.nl vandaag";
        let spans = vec![resolved("EMAIL", 5, 21, 0.85, text)];
        let engine = RedactionEngine::new();
        let a = engine.redact(text, &spans, None).unwrap();
        let b = engine.redact(text, &spans, None).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, "Mail [EMAIL] vandaag");
    }

    #[test]
    fn test_mask_operator() {
        let op = RedactionOperator::Mask { mask_char: '*', chars_to_mask: 4, from_end: true };
        assert_eq!(op.apply("0612345678"), "061234****");
        let op = RedactionOperator::Mask { mask_char: '*', chars_to_mask: 99, from_end: false };
        assert_eq!(op.apply("abc"), "***");
    }

    #[test]
    fn test_hash_operator_is_stable() {
        let op = RedactionOperator::Hash;
        let a = op.apply("NL91ABNA0417164300");
        let b = op.apply("NL91ABNA0417164300");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }
}
