/*!
 * Synonym lookup providers.
 *
 * This module contains client implementations for synonym lookup services:
 * - Datamuse: the public "means like" word-finding API
 * - Mock: in-memory sources for offline runs and tests
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::errors::ProviderError;

pub mod datamuse;
pub mod mock;

/// One candidate returned by a lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynonymCandidate {
    /// Candidate word or phrase
    pub word: String,

    /// Service tags, e.g. `syn`, `n`, `v`, `adj`, `adv`
    #[serde(default)]
    pub tags: Vec<String>,

    /// Whether the service marks the candidate as a proper noun
    #[serde(default)]
    pub is_proper_noun: bool,
}

impl SynonymCandidate {
    pub fn new(word: impl Into<String>, tags: &[&str]) -> Self {
        let tags: Vec<String> = tags.iter().map(|t| t.to_string()).collect();
        Self {
            word: word.into(),
            is_proper_noun: tags.iter().any(|t| t == "prop"),
            tags,
        }
    }

    /// Whether the service tagged the candidate with `tag`
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Common trait for all synonym lookup services
///
/// An empty result is a valid answer and must not be reported as an error.
#[async_trait]
pub trait SynonymSource: Send + Sync + Debug {
    /// Look up candidates for `word`
    async fn lookup(&self, word: &str) -> Result<Vec<SynonymCandidate>, ProviderError>;

    /// Short name used in logs
    fn name(&self) -> &str;
}
