//! Key paths and template matching.
//!
//! Field keys are dotted paths with bracketed array indices
//! (`auto.vehicles[2].vin`). A template key uses `[*]` in place of an index
//! and stands for every concrete key with the same shape. Matching a concrete
//! key back to its template goes through the [`TemplateMatcher`] trait so the
//! registry does not care how matching is done.

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{FieldsError, Result};

/// Placeholder standing for any array index.
pub const PLACEHOLDER: &str = "[*]";

/// Bracketed placeholder or literal index
static BRACKET_REGEX: OnceLock<Regex> = OnceLock::new();

fn bracket_regex() -> &'static Regex {
    BRACKET_REGEX
        .get_or_init(|| Regex::new(r"\[(\*|\d+)\]").expect("Invalid bracket regex"))
}

/// Bracketed literal index only
static INDEX_REGEX: OnceLock<Regex> = OnceLock::new();

fn index_regex() -> &'static Regex {
    INDEX_REGEX.get_or_init(|| Regex::new(r"\[(\d+)\]").expect("Invalid index regex"))
}

/// True when the key carries a `[*]` placeholder.
pub fn is_template_key(key: &str) -> bool {
    key.contains(PLACEHOLDER)
}

/// Normalized shape of a key: every placeholder or literal index becomes `[*]`.
///
/// Two keys with equal signatures are matched by the same template.
pub fn signature(key: &str) -> String {
    bracket_regex().replace_all(key, PLACEHOLDER).into_owned()
}

/// The digits of the first bracketed integer in a key.
///
/// Kept as text: an index is only ever spliced back into keys and ids, and
/// the matcher accepts any run of digits, however long.
pub fn first_index(key: &str) -> Option<&str> {
    index_regex()
        .captures(key)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Replace the first `[*]` of a template key with a concrete index.
pub fn with_index(template: &str, index: &str) -> String {
    template.replacen(PLACEHOLDER, &format!("[{index}]"), 1)
}

/// A template key compiled into an anchored matcher.
#[derive(Debug, Clone)]
pub struct KeyPattern {
    template: String,
    regex: Regex,
}

impl KeyPattern {
    /// Compile a template: literal text is escaped, every bracketed
    /// placeholder or index matches "brackets around one or more digits".
    pub fn compile(template: &str) -> Result<Self> {
        let mut source = String::from("^");
        let mut last = 0;
        for m in bracket_regex().find_iter(template) {
            source.push_str(&regex::escape(&template[last..m.start()]));
            source.push_str(r"\[\d+\]");
            last = m.end();
        }
        source.push_str(&regex::escape(&template[last..]));
        source.push('$');

        let regex = Regex::new(&source).map_err(|source| FieldsError::InvalidPattern {
            key: template.to_string(),
            source,
        })?;
        Ok(Self {
            template: template.to_string(),
            regex,
        })
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn is_match(&self, key: &str) -> bool {
        self.regex.is_match(key)
    }
}

/// Finds the template key that applies to a concrete data key.
///
/// Implementations must refuse a template whose signature is already
/// registered, so at most one template can ever match a given key.
pub trait TemplateMatcher: fmt::Debug + Send + Sync {
    /// Register a template key.
    fn insert(&mut self, template: &str) -> Result<()>;

    /// The registered template matching `key`, if any.
    fn find(&self, key: &str) -> Option<&str>;

    /// Number of registered templates.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Matcher keyed by normalized template signature. Lookup is one hash probe.
#[derive(Debug, Default)]
pub struct SignatureMatcher {
    by_signature: HashMap<String, String>,
}

impl SignatureMatcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TemplateMatcher for SignatureMatcher {
    fn insert(&mut self, template: &str) -> Result<()> {
        let sig = signature(template);
        if let Some(existing) = self.by_signature.get(&sig) {
            return Err(FieldsError::AmbiguousTemplate {
                key: template.to_string(),
                existing: existing.clone(),
                signature: sig,
            });
        }
        self.by_signature.insert(sig, template.to_string());
        Ok(())
    }

    fn find(&self, key: &str) -> Option<&str> {
        if is_template_key(key) {
            return None;
        }
        self.by_signature.get(&signature(key)).map(String::as_str)
    }

    fn len(&self) -> usize {
        self.by_signature.len()
    }
}

/// Matcher that tries each compiled template in registration order.
#[derive(Debug, Default)]
pub struct ScanMatcher {
    patterns: Vec<KeyPattern>,
    signatures: HashMap<String, usize>,
}

impl ScanMatcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TemplateMatcher for ScanMatcher {
    fn insert(&mut self, template: &str) -> Result<()> {
        let sig = signature(template);
        if let Some(&idx) = self.signatures.get(&sig) {
            return Err(FieldsError::AmbiguousTemplate {
                key: template.to_string(),
                existing: self.patterns[idx].template.clone(),
                signature: sig,
            });
        }
        let pattern = KeyPattern::compile(template)?;
        self.signatures.insert(sig, self.patterns.len());
        self.patterns.push(pattern);
        Ok(())
    }

    fn find(&self, key: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|p| p.is_match(key))
            .map(KeyPattern::template)
    }

    fn len(&self) -> usize {
        self.patterns.len()
    }
}

/// Which [`TemplateMatcher`] a registry is built with.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    #[default]
    Signature,
    Scan,
}

impl MatchStrategy {
    pub fn matcher(self) -> Box<dyn TemplateMatcher> {
        match self {
            MatchStrategy::Signature => Box::new(SignatureMatcher::new()),
            MatchStrategy::Scan => Box::new(ScanMatcher::new()),
        }
    }
}
