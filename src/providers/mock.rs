/*!
 * Mock synonym sources.
 *
 * This module provides in-memory sources that simulate different behaviors:
 * - `MockSynonymSource::working()` - answers from a fixed table
 * - `MockSynonymSource::failing()` - always fails with an error
 * - `MockSynonymSource::slow()` - answers after a delay
 * - `MockSynonymSource::offline()` - never knows any synonym
 */

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::errors::ProviderError;

use super::{SynonymCandidate, SynonymSource};

/// Behavior mode for the mock source
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Answers from the table
    Working,
    /// Always fails with an error
    Failing,
    /// Answers from the table after a delay
    Slow { delay_ms: u64 },
}

/// In-memory synonym source counting its calls
#[derive(Debug, Clone)]
pub struct MockSynonymSource {
    behavior: MockBehavior,
    table: HashMap<String, Vec<SynonymCandidate>>,
    calls: Arc<AtomicUsize>,
}

impl MockSynonymSource {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            table: HashMap::new(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A source answering from its table
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// A source that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// A source answering after `delay_ms`
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// A source with an empty table, used for offline runs
    pub fn offline() -> Self {
        Self::working()
    }

    /// Register synonyms for `word`, tagged as `syn` with the given service POS code
    pub fn with_synonyms(mut self, word: &str, pos: &str, synonyms: &[&str]) -> Self {
        let entries = self.table.entry(word.to_lowercase()).or_default();
        entries.extend(synonyms.iter().map(|s| SynonymCandidate::new(*s, &["syn", pos])));
        self
    }

    /// Register raw candidates for `word`
    pub fn with_candidates(mut self, word: &str, candidates: Vec<SynonymCandidate>) -> Self {
        self.table.entry(word.to_lowercase()).or_default().extend(candidates);
        self
    }

    /// Number of lookups received so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SynonymSource for MockSynonymSource {
    async fn lookup(&self, word: &str) -> Result<Vec<SynonymCandidate>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockBehavior::Working => {}
            MockBehavior::Failing => {
                return Err(ProviderError::ConnectionError("mock source is down".to_string()));
            }
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }

        Ok(self.table.get(&word.to_lowercase()).cloned().unwrap_or_default())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
