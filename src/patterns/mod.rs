/*!
 * Phrase substitution rules.
 *
 * Rules are loaded once from a flat JSON document with one section per
 * category and kept in registration order, which is also the order the
 * phrase pass tries them in:
 * - `shorten` / `expand`: phrase pairs such as contractions
 * - `filler`: phrases that can be deleted outright
 * - `compounds`: two-word spellings fused into one word
 * - `regional`: British to American spelling pairs, used token by token
 */

use anyhow::{Context, Result, anyhow};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;

use crate::text::{char_count, word_count};

const BUILTIN_PATTERNS: &str = include_str!("default_patterns.json");

/// Rule category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternCategory {
    /// Contraction and expansion pairs
    Contraction,
    /// Deletable filler phrase
    Filler,
    /// Two words fused into one
    Compound,
}

/// A single source -> target rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternEntry {
    pub source: String,
    pub target: String,
    pub category: PatternCategory,
    /// Words gained by applying the rule forward
    pub word_delta: i64,
    /// Characters gained by applying the rule forward
    pub char_delta: i64,
}

impl PatternEntry {
    pub fn new(source: impl Into<String>, target: impl Into<String>, category: PatternCategory) -> Self {
        let source = source.into();
        let target = target.into();
        let word_delta = word_count(&target) as i64 - word_count(&source) as i64;
        let char_delta = char_count(&target) as i64 - char_count(&source) as i64;
        Self {
            source,
            target,
            category,
            word_delta,
            char_delta,
        }
    }

    /// Whether the rule deletes its source phrase
    pub fn is_deletion(&self) -> bool {
        self.target.is_empty()
    }

    /// The same rule applied target -> source. Deletions cannot be reversed.
    pub fn reversed(&self) -> Option<PatternEntry> {
        if self.is_deletion() {
            return None;
        }
        Some(PatternEntry {
            source: self.target.clone(),
            target: self.source.clone(),
            category: self.category,
            word_delta: -self.word_delta,
            char_delta: -self.char_delta,
        })
    }
}

/// Raw rule document, one flat section per category
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternData {
    #[serde(default)]
    pub shorten: Map<String, Value>,
    #[serde(default)]
    pub expand: Map<String, Value>,
    #[serde(default)]
    pub filler: Vec<String>,
    #[serde(default)]
    pub compounds: Map<String, Value>,
    #[serde(default)]
    pub regional: Map<String, Value>,
}

/// Symmetric British/American spelling pairs
#[derive(Debug, Clone, Default)]
pub struct RegionalSpellings {
    counterparts: HashMap<String, String>,
}

impl RegionalSpellings {
    /// Register a pair in both directions, with capitalized forms
    pub fn insert(&mut self, british: &str, american: &str) {
        for (a, b) in [
            (british.to_string(), american.to_string()),
            (capitalize(british), capitalize(american)),
        ] {
            self.counterparts.insert(a.clone(), b.clone());
            self.counterparts.insert(b, a);
        }
    }

    /// Spelling of `word` in the other dialect, if known
    pub fn counterpart(&self, word: &str) -> Option<&str> {
        self.counterparts.get(word).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.counterparts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counterparts.is_empty()
    }
}

/// Ordered phrase rules plus regional spellings
#[derive(Debug, Clone, Default)]
pub struct PatternTable {
    entries: Vec<PatternEntry>,
    forward: HashMap<String, usize>,
    reverse: HashMap<String, usize>,
    regional: RegionalSpellings,
}

impl PatternTable {
    /// Rules shipped with the crate
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_PATTERNS).context("Failed to parse built-in patterns")
    }

    /// Load rules from `path`, or the built-in rules when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read pattern file: {:?}", path))?;
                Self::from_json(&raw).with_context(|| format!("Failed to parse pattern file: {:?}", path))
            }
            None => Self::builtin(),
        }
    }

    /// Parse a JSON rule document
    pub fn from_json(raw: &str) -> Result<Self> {
        let data: PatternData = serde_json::from_str(raw)?;
        Self::from_data(data)
    }

    /// Build the table from parsed data
    pub fn from_data(data: PatternData) -> Result<Self> {
        let mut table = Self::default();

        for (source, target) in data.shorten.iter().chain(data.expand.iter()) {
            table.register(PatternEntry::new(source, as_phrase(source, target)?, PatternCategory::Contraction));
        }
        for source in &data.filler {
            table.register(PatternEntry::new(source, "", PatternCategory::Filler));
        }
        for (source, target) in &data.compounds {
            if !table.forward.contains_key(source) {
                table.register(PatternEntry::new(source, as_phrase(source, target)?, PatternCategory::Compound));
            }
        }

        let lower_rules = table.entries.clone();
        for entry in lower_rules {
            table.register(PatternEntry::new(
                capitalize(&entry.source),
                capitalize(&entry.target),
                entry.category,
            ));
        }

        for (british, american) in &data.regional {
            table.regional.insert(british, as_phrase(british, american)?);
        }

        debug!(
            "Loaded {} phrase rules and {} regional spellings",
            table.entries.len(),
            table.regional.len()
        );
        Ok(table)
    }

    /// Add a rule. An existing rule with the same source keeps its position
    /// and takes the new target.
    fn register(&mut self, entry: PatternEntry) {
        if entry.source.trim().is_empty() {
            return;
        }
        match self.forward.get(&entry.source) {
            Some(&index) => {
                let old = std::mem::replace(&mut self.entries[index], entry);
                if self.reverse.get(&old.target) == Some(&index) {
                    self.reverse.remove(&old.target);
                }
                let current = &self.entries[index];
                if !current.is_deletion() {
                    self.reverse.entry(current.target.clone()).or_insert(index);
                }
            }
            None => {
                let index = self.entries.len();
                self.forward.insert(entry.source.clone(), index);
                if !entry.is_deletion() {
                    self.reverse.entry(entry.target.clone()).or_insert(index);
                }
                self.entries.push(entry);
            }
        }
    }

    /// Rules in registration order
    pub fn entries(&self) -> &[PatternEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Target phrase for `key`
    pub fn forward(&self, key: &str) -> Option<&str> {
        self.forward.get(key).map(|&i| self.entries[i].target.as_str())
    }

    /// Source phrase whose target is `value`
    pub fn reverse(&self, value: &str) -> Option<&str> {
        self.reverse.get(value).map(|&i| self.entries[i].source.as_str())
    }

    /// Words gained by applying the rule for `key` forward
    pub fn delta_words(&self, key: &str) -> Option<i64> {
        self.forward.get(key).map(|&i| self.entries[i].word_delta)
    }

    pub fn regional(&self) -> &RegionalSpellings {
        &self.regional
    }
}

fn as_phrase<'a>(key: &str, value: &'a Value) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| anyhow!("Pattern value for '{}' must be a string", key))
}

/// Uppercase the first character, leaving the rest untouched
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
