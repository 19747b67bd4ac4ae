use anyhow::{Context, Result};
use log::info;
use std::collections::HashMap;
use std::path::Path;

/// Known number of senses per word.
///
/// Words with a single known sense are unambiguous and never looked up.
/// Words missing from the inventory are always looked up.
#[derive(Debug, Clone, Default)]
pub struct SenseInventory {
    senses: HashMap<String, usize>,
}

impl SenseInventory {
    /// Empty inventory: every open-class word is looked up
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON object mapping words to sense counts
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read sense table: {:?}", path))?;
        let inventory = Self::from_json(&raw)
            .with_context(|| format!("Failed to parse sense table: {:?}", path))?;
        info!("Loaded {} sense counts from {:?}", inventory.len(), path);
        Ok(inventory)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let senses: HashMap<String, usize> = serde_json::from_str(raw)?;
        Ok(senses.into_iter().collect())
    }

    pub fn insert(&mut self, word: &str, senses: usize) {
        self.senses.insert(word.to_lowercase(), senses);
    }

    pub fn known_senses(&self, word: &str) -> Option<usize> {
        self.senses.get(&word.to_lowercase()).copied()
    }

    /// Whether an external lookup is worth making for `word`
    pub fn should_lookup(&self, word: &str) -> bool {
        !matches!(self.known_senses(word), Some(n) if n <= 1)
    }

    pub fn len(&self) -> usize {
        self.senses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senses.is_empty()
    }
}

impl FromIterator<(String, usize)> for SenseInventory {
    fn from_iter<I: IntoIterator<Item = (String, usize)>>(iter: I) -> Self {
        Self {
            senses: iter.into_iter().map(|(w, n)| (w.to_lowercase(), n)).collect(),
        }
    }
}
