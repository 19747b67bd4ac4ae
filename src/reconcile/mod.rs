/*!
 * Length reconciliation engine.
 *
 * Rewrites a text until its word and/or character count hits a target.
 * Three passes run in order over one mutable `Document`, all threading the
 * same `DeltaState`:
 * 1. **Paragraph reduction**: swap paragraphs for extractive summaries,
 *    chosen by exact-sum combination search or a greedy fallback
 * 2. **Phrase substitution**: contraction, filler and compound rules
 * 3. **Token substitution**: same-tag synonyms and regional spellings
 *
 * An unreachable target is not an error: the engine stops at the closest
 * state it can reach and reports the remaining deltas.
 */

use async_trait::async_trait;
use log::{debug, info};
use std::fmt;
use std::sync::Arc;

use crate::errors::ReconcileError;
use crate::patterns::PatternTable;
use crate::summarize::{ParagraphSummarizer, Summarizer};
use crate::synonyms::{SynonymCache, WarmStats};
use crate::text::{Document, EditDelta, Tagger};

pub mod combination;
pub mod paragraph_pass;
pub mod phrase_pass;
pub mod token_pass;

pub use combination::{SearchLimits, SearchOutcome, find_subsets, find_subsets_grouped};

/// Requested output length. `None` leaves that axis unconstrained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Targets {
    pub words: Option<usize>,
    pub chars: Option<usize>,
}

impl Targets {
    pub fn new(words: Option<usize>, chars: Option<usize>) -> Self {
        Self { words, chars }
    }

    pub fn words(words: usize) -> Self {
        Self::new(Some(words), None)
    }

    pub fn chars(chars: usize) -> Self {
        Self::new(None, Some(chars))
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_none() && self.chars.is_none()
    }
}

/// Remaining (words, characters) to add; negative values must be removed.
///
/// An untracked axis stays at zero whatever the edits do to it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeltaState {
    words: i64,
    chars: i64,
    track_words: bool,
    track_chars: bool,
}

impl DeltaState {
    /// Distance from `document` to `targets`
    pub fn new(targets: Targets, document: &Document) -> Self {
        Self {
            words: targets.words.map_or(0, |w| w as i64 - document.word_count() as i64),
            chars: targets.chars.map_or(0, |c| c as i64 - document.char_count() as i64),
            track_words: targets.words.is_some(),
            track_chars: targets.chars.is_some(),
        }
    }

    pub fn words(&self) -> i64 {
        self.words
    }

    pub fn chars(&self) -> i64 {
        self.chars
    }

    pub fn tracks_chars(&self) -> bool {
        self.track_chars
    }

    /// Account for an applied edit
    pub fn apply(&mut self, edit: EditDelta) {
        if self.track_words {
            self.words -= edit.words;
        }
        if self.track_chars {
            self.chars -= edit.chars;
        }
    }

    /// Both axes at zero
    pub fn is_settled(&self) -> bool {
        self.words == 0 && self.chars == 0
    }

    /// Whether `document` is exactly `remaining` away from `targets`
    pub fn agrees_with(&self, targets: Targets, document: &Document) -> bool {
        *self == Self::new(targets, document)
    }
}

/// Edits accepted by one pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    pub edits: usize,
    /// Combination search hit a limit (paragraph pass only)
    pub truncated: bool,
}

/// Engine switches and bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileOptions {
    pub limits: SearchLimits,
    pub enable_summarization: bool,
    pub enable_phrases: bool,
    pub enable_tokens: bool,
    /// Concurrent synonym lookups during warm-up
    pub warm_concurrency: usize,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            limits: SearchLimits::default(),
            enable_summarization: true,
            enable_phrases: true,
            enable_tokens: true,
            warm_concurrency: 4,
        }
    }
}

/// What a reconciliation did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub targets: Targets,
    pub initial_words: usize,
    pub initial_chars: usize,
    pub final_words: usize,
    pub final_chars: usize,
    pub remaining: DeltaState,
    pub paragraph_edits: usize,
    pub phrase_edits: usize,
    pub token_edits: usize,
    pub search_truncated: bool,
    pub warm: WarmStats,
}

impl ReconcileReport {
    /// Every requested target was hit
    pub fn is_exact(&self) -> bool {
        self.remaining.is_settled()
    }

    pub fn total_edits(&self) -> usize {
        self.paragraph_edits + self.phrase_edits + self.token_edits
    }
}

impl fmt::Display for ReconcileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "words {} -> {}, chars {} -> {}, remaining ({:+}, {:+}), edits: {} paragraph / {} phrase / {} token",
            self.initial_words,
            self.final_words,
            self.initial_chars,
            self.final_chars,
            self.remaining.words(),
            self.remaining.chars(),
            self.paragraph_edits,
            self.phrase_edits,
            self.token_edits
        )?;
        if self.search_truncated {
            write!(f, " (combination search truncated)")?;
        }
        Ok(())
    }
}

/// Final text plus report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub text: String,
    pub report: ReconcileReport,
}

/// Length reconciliation capability
#[async_trait]
pub trait Reconciler: Send + Sync {
    /// Rewrite `text` toward `targets`
    async fn reconcile(&self, text: &str, targets: Targets) -> Result<ReconcileOutcome, ReconcileError>;
}

/// Three-pass engine over injected collaborators
pub struct LengthReconciler {
    tagger: Arc<dyn Tagger>,
    summarizer: ParagraphSummarizer,
    patterns: Arc<PatternTable>,
    synonyms: SynonymCache,
    options: ReconcileOptions,
}

impl LengthReconciler {
    pub fn new(
        tagger: Arc<dyn Tagger>,
        summarizer: Arc<dyn Summarizer>,
        patterns: PatternTable,
        synonyms: SynonymCache,
    ) -> Self {
        Self {
            tagger,
            summarizer: ParagraphSummarizer::new(summarizer),
            patterns: Arc::new(patterns),
            synonyms,
            options: ReconcileOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ReconcileOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ReconcileOptions {
        &self.options
    }

    pub fn synonyms(&self) -> &SynonymCache {
        &self.synonyms
    }

    pub fn patterns(&self) -> &PatternTable {
        &self.patterns
    }

    /// Reconcile and return only the text
    pub async fn reconcile_text(
        &self,
        text: &str,
        target_words: Option<usize>,
        target_chars: Option<usize>,
    ) -> Result<String, ReconcileError> {
        Ok(self.reconcile(text, Targets::new(target_words, target_chars)).await?.text)
    }

    /// Run every enabled pass over an already parsed document
    pub async fn reconcile_document(
        &self,
        document: &mut Document,
        targets: Targets,
    ) -> Result<ReconcileReport, ReconcileError> {
        let mut delta = DeltaState::new(targets, document);
        let mut report = ReconcileReport {
            targets,
            initial_words: document.word_count(),
            initial_chars: document.char_count(),
            ..Default::default()
        };
        debug!(
            "Reconciling {} paragraphs, starting deltas ({:+}, {:+})",
            document.len(),
            delta.words(),
            delta.chars()
        );

        if self.options.enable_summarization && delta.words() < 0 {
            let stats = paragraph_pass::reduce_paragraphs(document, &mut delta, &self.summarizer, self.options.limits)?;
            report.paragraph_edits = stats.edits;
            report.search_truncated = stats.truncated;
            info!(
                "Paragraph pass: {} edits, deltas now ({:+}, {:+})",
                stats.edits,
                delta.words(),
                delta.chars()
            );
        }

        if self.options.enable_phrases && delta.words() != 0 {
            let stats = phrase_pass::substitute_phrases(document, &mut delta, &self.patterns);
            report.phrase_edits = stats.edits;
            info!(
                "Phrase pass: {} edits, deltas now ({:+}, {:+})",
                stats.edits,
                delta.words(),
                delta.chars()
            );
        }

        if self.options.enable_tokens && delta.chars() != 0 {
            report.warm = self.synonyms.warm(document, self.options.warm_concurrency).await?;
            let stats = token_pass::substitute_tokens(
                document,
                &mut delta,
                &self.synonyms,
                self.tagger.as_ref(),
                self.patterns.regional(),
            )
            .await?;
            report.token_edits = stats.edits;
            info!(
                "Token pass: {} edits, deltas now ({:+}, {:+})",
                stats.edits,
                delta.words(),
                delta.chars()
            );
        }

        debug_assert!(delta.agrees_with(targets, document));

        report.final_words = document.word_count();
        report.final_chars = document.char_count();
        report.remaining = delta;
        Ok(report)
    }
}

#[async_trait]
impl Reconciler for LengthReconciler {
    async fn reconcile(&self, text: &str, targets: Targets) -> Result<ReconcileOutcome, ReconcileError> {
        let mut document = Document::parse(text);
        let report = self.reconcile_document(&mut document, targets).await?;
        Ok(ReconcileOutcome {
            text: document.render(),
            report,
        })
    }
}
