/*!
 * Extractive paragraph summarization.
 *
 * A `Summarizer` ranks the sentences of a paragraph by salience. The
 * `ParagraphSummarizer` adapter keeps the top `n` of them and restores their
 * source order, so a summary only ever drops sentences, never reorders them.
 *
 * `FrequencySummarizer` is the built-in ranking: sentences score by the mean
 * paragraph frequency of their content words.
 */

use log::debug;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use unicode_segmentation::UnicodeSegmentation;

use crate::errors::ReconcileError;
use crate::text::split_sentences;

/// Sentence ranking collaborator
pub trait Summarizer: Send + Sync {
    /// Sentence indices of `paragraph`, most salient first.
    ///
    /// Returns `Ok(None)` when the paragraph is too short to rank
    /// meaningfully: no rankable terms, or fewer distinct terms than sentences.
    fn rank_sentences(&self, paragraph: &str) -> Result<Option<Vec<usize>>, ReconcileError>;
}

const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for",
    "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself",
    "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just",
    "me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once",
    "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same", "she",
    "should", "so", "some", "such", "than", "that", "the", "their", "theirs", "them",
    "themselves", "then", "there", "these", "they", "this", "those", "through", "to", "too",
    "under", "until", "up", "upon", "very", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "would", "you", "your", "yours", "yourself",
    "yourselves",
];

/// Term-frequency sentence ranking
#[derive(Debug, Clone)]
pub struct FrequencySummarizer {
    stop_words: HashSet<String>,
}

impl Default for FrequencySummarizer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrequencySummarizer {
    /// Ranking with the built-in English stop words
    pub fn new() -> Self {
        Self::with_stop_words(STOP_WORDS.iter().copied())
    }

    /// Ranking with a custom stop word list
    pub fn with_stop_words<'a>(words: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            stop_words: words.into_iter().map(str::to_lowercase).collect(),
        }
    }

    /// Lowercase content words of `text`
    fn terms(&self, text: &str) -> Vec<String> {
        text.unicode_words()
            .map(str::to_lowercase)
            .filter(|w| w.chars().any(char::is_alphabetic) && !self.stop_words.contains(w))
            .collect()
    }
}

impl Summarizer for FrequencySummarizer {
    fn rank_sentences(&self, paragraph: &str) -> Result<Option<Vec<usize>>, ReconcileError> {
        let sentences = split_sentences(paragraph);
        let sentence_terms: Vec<Vec<String>> = sentences.iter().map(|s| self.terms(s)).collect();

        let mut frequencies: HashMap<&str, usize> = HashMap::new();
        for term in sentence_terms.iter().flatten() {
            *frequencies.entry(term.as_str()).or_insert(0) += 1;
        }

        if frequencies.is_empty() || frequencies.len() < sentences.len() {
            return Ok(None);
        }

        let scores: Vec<f64> = sentence_terms
            .iter()
            .map(|terms| {
                if terms.is_empty() {
                    return 0.0;
                }
                let total: usize = terms.iter().map(|t| frequencies[t.as_str()]).sum();
                total as f64 / terms.len() as f64
            })
            .collect();

        let mut order: Vec<usize> = (0..sentences.len()).collect();
        // Stable sort keeps earlier sentences first on ties
        order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

        Ok(Some(order))
    }
}

/// Produces shortened paragraphs at a requested sentence count
#[derive(Clone)]
pub struct ParagraphSummarizer {
    summarizer: Arc<dyn Summarizer>,
}

impl ParagraphSummarizer {
    pub fn new(summarizer: Arc<dyn Summarizer>) -> Self {
        Self { summarizer }
    }

    /// Keep the `n_sentences` most salient sentences in source order.
    ///
    /// Degenerate paragraphs come back unchanged.
    pub fn summarize(&self, paragraph: &str, n_sentences: usize) -> Result<String, ReconcileError> {
        Ok(self
            .try_summarize(paragraph, n_sentences)?
            .unwrap_or_else(|| paragraph.to_string()))
    }

    /// Like `summarize`, but `None` for a degenerate paragraph
    pub fn try_summarize(&self, paragraph: &str, n_sentences: usize) -> Result<Option<String>, ReconcileError> {
        let sentences = split_sentences(paragraph);
        if n_sentences >= sentences.len() {
            return Ok(Some(paragraph.to_string()));
        }

        let Some(ranking) = self.summarizer.rank_sentences(paragraph)? else {
            debug!("Paragraph of {} sentences is too short to rank", sentences.len());
            return Ok(None);
        };

        let mut selected: Vec<usize> = ranking
            .into_iter()
            .filter(|&i| i < sentences.len())
            .take(n_sentences)
            .collect();
        selected.sort_unstable();
        selected.dedup();

        Ok(Some(
            selected
                .into_iter()
                .map(|i| sentences[i].as_str())
                .collect::<Vec<_>>()
                .join(" "),
        ))
    }
}
