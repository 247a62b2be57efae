// anonimiseer-core/src/detectors/pattern.rs
//! A `Detector` implementation that uses regular expressions to propose
//! entity spans, plus a thread-safe cache that avoids recompiling the same
//! pattern set across detector instances.
//!
//! License: MIT OR APACHE 2.0

use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};

use lazy_static::lazy_static;
use log::debug;
use regex::{Regex, RegexBuilder};

use crate::config::{DetectionConfig, PatternRule, MAX_PATTERN_LENGTH};
use crate::detector::Detector;
use crate::entity::DetectedEntity;
use crate::errors::AnonError;

/// A single compiled detection pattern, ready for matching.
#[derive(Debug)]
pub struct CompiledPattern {
    pub regex: Regex,
    pub name: String,
    pub entity_type: String,
    pub score: f64,
}

/// The full set of compiled patterns for one configuration.
#[derive(Debug)]
pub struct CompiledPatterns {
    pub patterns: Vec<CompiledPattern>,
}

lazy_static! {
    /// A thread-safe, global cache for compiled patterns, keyed by a hash of
    /// the pattern list.
    static ref COMPILED_PATTERNS_CACHE: RwLock<HashMap<u64, Arc<CompiledPatterns>>> =
        RwLock::new(HashMap::new());
}

/// Hashes the pattern list to create a stable cache key. Patterns are sorted
/// by name first so the key does not depend on declaration order.
fn hash_patterns(patterns: &[PatternRule]) -> u64 {
    let mut hasher = DefaultHasher::new();
    let mut to_hash = patterns.to_vec();
    to_hash.sort_by(|a, b| a.name.cmp(&b.name));
    to_hash.hash(&mut hasher);
    hasher.finish()
}

/// Compiles a list of `PatternRule`s. Disabled patterns are skipped.
pub fn compile_patterns(rules: &[PatternRule]) -> Result<CompiledPatterns, AnonError> {
    debug!("Starting compilation of {} pattern(s).", rules.len());

    let mut compiled = Vec::new();
    let mut errors = Vec::new();

    for rule in rules {
        if let Some(false) = rule.enabled {
            continue;
        }
        if rule.pattern.len() > MAX_PATTERN_LENGTH {
            errors.push(AnonError::PatternLengthExceeded(
                rule.name.clone(),
                rule.pattern.len(),
                MAX_PATTERN_LENGTH,
            ));
            continue;
        }

        let result = RegexBuilder::new(&rule.pattern)
            .size_limit(10 * (1 << 20)) // 10 MB limit for compiled regex
            .build();

        match result {
            Ok(regex) => {
                debug!("Pattern '{}' compiled successfully.", rule.name);
                compiled.push(CompiledPattern {
                    regex,
                    name: rule.name.clone(),
                    entity_type: rule.entity_type.clone(),
                    score: rule.score,
                });
            }
            Err(e) => errors.push(AnonError::PatternCompilation(rule.name.clone(), e)),
        }
    }

    if !errors.is_empty() {
        let message = errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("\n");
        Err(AnonError::Fatal(format!(
            "Failed to compile {} pattern(s):\n{}",
            errors.len(),
            message
        )))
    } else {
        debug!("Finished compiling patterns. Total compiled: {}.", compiled.len());
        Ok(CompiledPatterns { patterns: compiled })
    }
}

/// Gets a `CompiledPatterns` instance from the cache, compiling on a miss.
pub fn get_or_compile_patterns(
    patterns: &[PatternRule],
) -> Result<Arc<CompiledPatterns>, AnonError> {
    let cache_key = hash_patterns(patterns);

    {
        let cache = COMPILED_PATTERNS_CACHE.read().unwrap();
        if let Some(compiled) = cache.get(&cache_key) {
            debug!("Serving compiled patterns from cache for key: {}", cache_key);
            return Ok(Arc::clone(compiled));
        }
    }

    let compiled = Arc::new(compile_patterns(patterns)?);
    COMPILED_PATTERNS_CACHE.write().unwrap().insert(cache_key, Arc::clone(&compiled));
    debug!("Compiled and cached patterns for key: {}", cache_key);
    Ok(compiled)
}

/// Regex-based detector for Dutch PII.
///
/// Patterns, their entity types and their confidence scores come from a
/// [`DetectionConfig`]; compilation happens in `initialize` (or lazily in
/// the constructor when built with [`PatternDetector::new`]).
pub struct PatternDetector {
    config: DetectionConfig,
    compiled: Option<Arc<CompiledPatterns>>,
}

impl PatternDetector {
    /// Builds a detector and compiles its patterns immediately.
    pub fn new(config: DetectionConfig) -> Result<Self, AnonError> {
        let compiled = get_or_compile_patterns(&config.patterns)?;
        Ok(Self { config, compiled: Some(compiled) })
    }

    /// Builds a detector with the built-in Dutch configuration.
    pub fn with_defaults() -> Result<Self, AnonError> {
        let config = DetectionConfig::load_default().map_err(AnonError::AnyhowWrapper)?;
        Self::new(config)
    }

    /// Builds a detector without compiling; `initialize` must be called
    /// before first use. Useful when construction happens early but pattern
    /// compilation cost should be paid at a controlled point.
    pub fn deferred(config: DetectionConfig) -> Self {
        Self { config, compiled: None }
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }
}

impl Detector for PatternDetector {
    fn name(&self) -> &str {
        "dutch-patterns"
    }

    fn initialize(&mut self) -> Result<(), AnonError> {
        if self.compiled.is_none() {
            self.compiled = Some(get_or_compile_patterns(&self.config.patterns)?);
        }
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.compiled.is_some()
    }

    fn detect(
        &self,
        text: &str,
        requested_types: Option<&HashSet<String>>,
    ) -> Result<Vec<DetectedEntity>, AnonError> {
        let compiled = self
            .compiled
            .as_ref()
            .ok_or_else(|| AnonError::Fatal("PatternDetector used before initialize()".into()))?;

        let mut found = Vec::new();
        for pattern in &compiled.patterns {
            if let Some(requested) = requested_types {
                if !requested.contains(&pattern.entity_type) {
                    continue;
                }
            }
            for m in pattern.regex.find_iter(text) {
                found.push(DetectedEntity::new(
                    pattern.entity_type.clone(),
                    m.start(),
                    m.end(),
                    pattern.score,
                ));
            }
        }
        Ok(found)
    }
}
