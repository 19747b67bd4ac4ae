/*!
 * Synonym cache.
 *
 * Maps a (lowercase word, grammatical tag) key to the single-word candidates
 * that may replace it without changing its tag in context. Every key is
 * resolved through the external `SynonymSource` at most once: the answer,
 * including "no synonyms known", is kept in memory and appended to a
 * `SynonymStore` so later runs start warm. The in-memory map is unbounded.
 */

use futures::stream::{self, StreamExt};
use log::{debug, info, warn};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::errors::ReconcileError;
use crate::patterns::capitalize;
use crate::providers::{SynonymCandidate, SynonymSource};
use crate::text::{Document, Tagger, WordToken, token_spans};

pub mod senses;
pub mod store;

pub use senses::SenseInventory;
pub use store::{JsonLogStore, MemoryStore, SqliteStore, SynonymRecord, SynonymStore};

/// Default bound on a single external lookup
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(15);

/// Cache key: lowercase word plus its Penn tag
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SynonymKey {
    pub word: String,
    pub tag: String,
}

impl SynonymKey {
    pub fn new(word: &str, tag: &str) -> Self {
        Self {
            word: word.to_lowercase(),
            tag: tag.to_string(),
        }
    }

    pub fn of(token: &WordToken) -> Self {
        Self::new(&token.text, &token.tag)
    }
}

/// Outcome of a warm-up run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WarmStats {
    /// Distinct keys found in the document
    pub unique_keys: usize,
    /// Keys that were not cached yet and got resolved
    pub resolved: usize,
    /// External lookups made while resolving them
    pub lookups: usize,
}

/// Memoized, persisted synonym resolution
#[derive(Clone)]
pub struct SynonymCache {
    entries: Arc<RwLock<HashMap<SynonymKey, Option<Vec<String>>>>>,
    source: Arc<dyn SynonymSource>,
    tagger: Arc<dyn Tagger>,
    store: Arc<dyn SynonymStore>,
    senses: Arc<SenseInventory>,
    lookup_timeout: Duration,
    lookups: Arc<AtomicUsize>,
}

impl SynonymCache {
    /// Build the cache, loading every record the store already holds
    pub fn open(
        source: Arc<dyn SynonymSource>,
        tagger: Arc<dyn Tagger>,
        store: Arc<dyn SynonymStore>,
        senses: SenseInventory,
    ) -> Result<Self, ReconcileError> {
        let mut entries = HashMap::new();
        for record in store.load()? {
            entries.insert(SynonymKey::new(&record.word, &record.tag), record.candidates);
        }
        info!(
            "Synonym cache ready with {} entries from {} (source: {})",
            entries.len(),
            store.describe(),
            source.name()
        );

        Ok(Self {
            entries: Arc::new(RwLock::new(entries)),
            source,
            tagger,
            store,
            senses: Arc::new(senses),
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
            lookups: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Bound each external lookup by `timeout`
    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    /// Cached entry for `key`: `None` when never resolved, `Some(None)` when
    /// resolved without synonyms
    pub fn get(&self, key: &SynonymKey) -> Option<Option<Vec<String>>> {
        self.entries.read().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// External lookups made by this cache so far
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Replacement candidates for `tokens[index]` within `sentence`.
    ///
    /// The first element is always the token's own text, so choosing it is a
    /// no-op. Candidates take the token's capitalization. An out of range
    /// index yields an empty list.
    pub async fn candidates(
        &self,
        sentence: &str,
        tokens: &[WordToken],
        index: usize,
    ) -> Result<Vec<String>, ReconcileError> {
        let Some(token) = tokens.get(index) else {
            return Ok(Vec::new());
        };

        let mut candidates = vec![token.text.clone()];
        if let Some(list) = self.resolve(sentence, tokens, index).await? {
            candidates.extend(
                list.iter()
                    .skip(1)
                    .map(|c| match_case(&token.text, c))
                    .filter(|c| *c != token.text),
            );
        }
        Ok(candidates)
    }

    /// Cached entry for `tokens[index]`, resolving it on a miss
    pub async fn resolve(
        &self,
        sentence: &str,
        tokens: &[WordToken],
        index: usize,
    ) -> Result<Option<Vec<String>>, ReconcileError> {
        let Some(token) = tokens.get(index) else {
            return Ok(None);
        };
        let key = SynonymKey::of(token);
        if let Some(hit) = self.get(&key) {
            return Ok(hit);
        }

        let resolved = self.lookup(&key, sentence, tokens, index).await?;
        self.record(key, resolved.clone());
        Ok(resolved)
    }

    /// Resolve every uncached key of `document`, `concurrency` lookups at a time
    pub async fn warm(&self, document: &Document, concurrency: usize) -> Result<WarmStats, ReconcileError> {
        let lookups_before = self.lookup_count();
        let mut seen: HashSet<SynonymKey> = HashSet::new();
        let mut jobs: Vec<(String, Vec<WordToken>, usize)> = Vec::new();

        for paragraph in document.paragraphs() {
            for sentence in paragraph.sentences() {
                let tokens = self.tagger.tag(&sentence)?;
                let fresh: Vec<usize> = tokens
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| {
                        let key = SynonymKey::of(t);
                        let cached = self.entries.read().contains_key(&key);
                        seen.insert(key) && !cached
                    })
                    .map(|(i, _)| i)
                    .collect();
                for index in fresh {
                    jobs.push((sentence.clone(), tokens.clone(), index));
                }
            }
        }

        let pending = jobs.len();
        debug!("Warming synonym cache: {} of {} keys need resolving", pending, seen.len());

        let results: Vec<Result<Option<Vec<String>>, ReconcileError>> = stream::iter(jobs)
            .map(|(sentence, tokens, index)| async move { self.resolve(&sentence, &tokens, index).await })
            .buffer_unordered(concurrency.max(1))
            .collect()
            .await;

        for result in results {
            result?;
        }

        let stats = WarmStats {
            unique_keys: seen.len(),
            resolved: pending,
            lookups: self.lookup_count() - lookups_before,
        };
        info!(
            "Synonym warm-up resolved {} keys with {} lookups ({} distinct keys)",
            stats.resolved, stats.lookups, stats.unique_keys
        );
        Ok(stats)
    }

    /// Ask the source about `key` and keep the candidates that fit in context
    async fn lookup(
        &self,
        key: &SynonymKey,
        sentence: &str,
        tokens: &[WordToken],
        index: usize,
    ) -> Result<Option<Vec<String>>, ReconcileError> {
        let token = &tokens[index];
        let Some(code) = token.universal().lookup_code() else {
            return Ok(None);
        };
        if !token.is_word() || !self.senses.should_lookup(&key.word) {
            return Ok(None);
        }

        self.lookups.fetch_add(1, Ordering::SeqCst);
        let found = match tokio::time::timeout(self.lookup_timeout, self.source.lookup(&key.word)).await {
            Ok(Ok(found)) => found,
            Ok(Err(e)) => {
                warn!("Synonym lookup for '{}' failed: {}", key.word, e);
                return Ok(None);
            }
            Err(_) => {
                warn!(
                    "Synonym lookup for '{}' timed out after {:?}",
                    key.word, self.lookup_timeout
                );
                return Ok(None);
            }
        };

        let Some(span) = token_spans(sentence, tokens).get(index).cloned().flatten() else {
            return Ok(None);
        };

        let mut accepted = vec![key.word.clone()];
        for candidate in found.iter().filter(|c| is_usable(c, code)) {
            let lower = candidate.word.trim().to_lowercase();
            if accepted.contains(&lower) {
                continue;
            }

            let surface = match_case(&token.text, &lower);
            let variant = format!("{}{}{}", &sentence[..span.start], surface, &sentence[span.end..]);
            let retagged = self.tagger.tag(&variant)?;
            if retagged
                .get(index)
                .is_some_and(|t| t.text == surface && t.tag == token.tag)
            {
                accepted.push(lower);
            }
        }

        debug!(
            "Resolved '{}' ({}): {} of {} candidates fit",
            key.word,
            key.tag,
            accepted.len() - 1,
            found.len()
        );
        Ok((accepted.len() > 1).then_some(accepted))
    }

    fn record(&self, key: SynonymKey, candidates: Option<Vec<String>>) {
        let record = SynonymRecord::new(key.word.clone(), key.tag.clone(), candidates.clone());
        self.entries.write().insert(key, candidates);
        if let Err(e) = self.store.append(&record) {
            warn!("Failed to persist synonyms for '{}': {}", record.word, e);
        }
    }
}

/// Whether a lookup candidate is a plain single-word synonym of the wanted POS
fn is_usable(candidate: &SynonymCandidate, code: &str) -> bool {
    let word = candidate.word.trim();
    candidate.has_tag("syn")
        && !candidate.is_proper_noun
        && candidate.has_tag(code)
        && !word.is_empty()
        && !word.contains(char::is_whitespace)
}

/// Give `candidate` the capitalization pattern of `original`
pub fn match_case(original: &str, candidate: &str) -> String {
    let mut letters = original.chars().filter(|c| c.is_alphabetic());
    let first_upper = original.chars().next().is_some_and(char::is_uppercase);
    let all_upper = original.chars().filter(|c| c.is_alphabetic()).count() > 1
        && letters.all(char::is_uppercase);

    if all_upper {
        candidate.to_uppercase()
    } else if first_upper {
        capitalize(candidate)
    } else {
        candidate.to_string()
    }
}
