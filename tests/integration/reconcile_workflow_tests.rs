/*!
 * End-to-end tests of the reconciliation engine
 */

use anyhow::Result;
use std::sync::Arc;

use spreadshred::errors::ReconcileError;
use spreadshred::patterns::PatternTable;
use spreadshred::providers::mock::MockSynonymSource;
use spreadshred::reconcile::paragraph_pass::collect_candidates;
use spreadshred::reconcile::{LengthReconciler, ReconcileOptions, Reconciler, Targets};
use spreadshred::summarize::{FrequencySummarizer, ParagraphSummarizer};
use spreadshred::synonyms::{MemoryStore, SenseInventory, SynonymCache};
use spreadshred::text::{Document, Tagger, char_count, word_count};

use crate::common::{self, HOUND_TEXT, mock_collaborators::{FailingTagger, ReverseSummarizer}};

/// Test that a word target reachable by summaries is hit exactly
#[tokio::test]
async fn test_reconcile_reachableWordTarget_shouldBeExact() -> Result<()> {
    let document = Document::parse(HOUND_TEXT);
    let summarizer = ParagraphSummarizer::new(Arc::new(FrequencySummarizer::new()));
    let candidates = collect_candidates(&document, &summarizer)?;
    let first = &candidates[0];
    let second = candidates.iter().find(|c| c.paragraph != first.paragraph).unwrap();
    let target = (document.word_count() as i64 + first.words + second.words) as usize;

    let outcome = common::engine(MockSynonymSource::offline())
        .reconcile(HOUND_TEXT, Targets::words(target))
        .await?;

    assert!(outcome.report.is_exact());
    assert_eq!(word_count(&outcome.text), target);
    assert!(outcome.report.paragraph_edits >= 1);
    assert_eq!(outcome.report.phrase_edits, 0);
    Ok(())
}

/// Test that the report always describes the returned text
#[tokio::test]
async fn test_reconcile_report_shouldMatchOutputText() -> Result<()> {
    let engine = common::engine(MockSynonymSource::offline());
    let original_words = Document::parse(HOUND_TEXT).word_count();

    for target in [original_words / 2, original_words - 3, original_words + 4] {
        let targets = Targets::new(Some(target), Some(300));
        let outcome = engine.reconcile(HOUND_TEXT, targets).await?;
        let report = &outcome.report;

        assert_eq!(report.final_words, word_count(&outcome.text));
        assert_eq!(report.final_chars, char_count(&outcome.text));
        assert_eq!(report.final_words as i64 + report.remaining.words(), target as i64);
        assert_eq!(report.final_chars as i64 + report.remaining.chars(), 300);
    }
    Ok(())
}

/// Test that a summary removing more words than asked is passed over so the
/// phrase rules can settle the target exactly
#[tokio::test]
async fn test_reconcile_noExactSummaryCombination_shouldNotOvershoot() -> Result<()> {
    let engine = LengthReconciler::new(
        Arc::new(spreadshred::text::RuleTagger::new()),
        Arc::new(ReverseSummarizer),
        PatternTable::builtin()?,
        common::memory_cache(MockSynonymSource::offline()),
    );
    let text = "It is cold. We do not know what to do about the weather today.";
    // The only summary drops "It is cold." and removes three words
    let target = word_count(text) - 2;

    let outcome = engine.reconcile(text, Targets::words(target)).await?;

    assert_eq!(outcome.text, "It's cold. We don't know what to do about the weather today.");
    assert!(outcome.report.is_exact());
    assert_eq!(outcome.report.paragraph_edits, 0);
    assert_eq!(outcome.report.phrase_edits, 2);
    Ok(())
}

/// Test that a growing word target uses reversed contraction rules
#[tokio::test]
async fn test_reconcile_growingWordTarget_shouldExpandContraction() -> Result<()> {
    let engine = common::engine(MockSynonymSource::offline());

    let outcome = engine.reconcile("We don't go because it rains.", Targets::words(7)).await?;

    assert_eq!(outcome.text, "We do not go because it rains.");
    assert_eq!(outcome.report.phrase_edits, 1);
    assert_eq!(outcome.report.paragraph_edits, 0);
    Ok(())
}

/// Test that both targets can be hit together
#[tokio::test]
async fn test_reconcile_wordAndCharTargets_shouldBothBeHit() -> Result<()> {
    let engine = common::engine(MockSynonymSource::offline());
    let text = "We do not know the colour.";

    let outcome = engine
        .reconcile(text, Targets::new(Some(5), Some(char_count(text) - 2)))
        .await?;

    assert_eq!(outcome.text, "We don't know the color.");
    assert!(outcome.report.is_exact());
    assert_eq!(outcome.report.phrase_edits, 1);
    assert_eq!(outcome.report.token_edits, 1);
    Ok(())
}

/// Test that regional spellings move characters in both directions
#[tokio::test]
async fn test_reconcile_charTargets_shouldSwapRegionalSpellings() -> Result<()> {
    let engine = common::engine(MockSynonymSource::offline());
    let british = "The colour of the harbour.";

    let american = engine.reconcile(british, Targets::chars(char_count(british) - 2)).await?;
    assert_eq!(american.text, "The color of the harbor.");

    let restored = engine
        .reconcile(&american.text, Targets::chars(char_count(british)))
        .await?;
    assert_eq!(restored.text, british);
    Ok(())
}

/// Test that a synonym from the lookup service fixes a character target
#[tokio::test]
async fn test_reconcile_charTarget_shouldUseSynonym() -> Result<()> {
    let source = MockSynonymSource::working().with_synonyms("house", "n", &["home", "structure"]);
    let engine = common::engine(source);
    let text = "The old house collapsed.";

    let outcome = engine.reconcile(text, Targets::chars(char_count(text) - 1)).await?;

    assert_eq!(outcome.text, "The old home collapsed.");
    assert!(outcome.report.warm.lookups >= 1);
    Ok(())
}

/// Test that an unreachable target returns the closest text without failing
#[tokio::test]
async fn test_reconcile_unreachableTarget_shouldReportRemaining() -> Result<()> {
    let engine = common::engine(MockSynonymSource::offline());

    let outcome = engine.reconcile("Short text.", Targets::words(100)).await?;

    assert_eq!(outcome.text, "Short text.");
    assert!(!outcome.report.is_exact());
    assert_eq!(outcome.report.remaining.words(), 98);
    assert_eq!(outcome.report.total_edits(), 0);
    Ok(())
}

/// Test that reconciling converged output again changes nothing
#[tokio::test]
async fn test_reconcile_secondRunOnOutput_shouldBeStable() -> Result<()> {
    let engine = common::engine(MockSynonymSource::offline());
    let text = "It is really cold and we do not care.";
    let targets = Targets::words(word_count(text) - 3);

    let first = engine.reconcile(text, targets).await?;
    let second = engine.reconcile(&first.text, Targets::words(first.report.final_words)).await?;

    assert!(first.report.is_exact());
    assert_eq!(first.text, "It's cold and we don't care.");
    assert_eq!(second.text, first.text);
    assert_eq!(second.report.total_edits(), 0);
    Ok(())
}

/// Test that the token pass can be switched off
#[tokio::test]
async fn test_reconcile_tokensDisabled_shouldLeaveCharsAlone() -> Result<()> {
    let options = ReconcileOptions {
        enable_tokens: false,
        ..Default::default()
    };
    let engine = common::engine(MockSynonymSource::offline()).with_options(options);
    let text = "The colour faded.";

    let outcome = engine.reconcile(text, Targets::chars(char_count(text) - 1)).await?;

    assert_eq!(outcome.text, text);
    assert_eq!(outcome.report.remaining.chars(), -1);
    Ok(())
}

/// Test that a failing tagger aborts the run
#[tokio::test]
async fn test_reconcile_failingTagger_shouldReturnError() -> Result<()> {
    common::init_test_logging();
    let tagger: Arc<dyn Tagger> = Arc::new(FailingTagger);
    let cache = SynonymCache::open(
        Arc::new(MockSynonymSource::offline()),
        tagger.clone(),
        Arc::new(MemoryStore::new()),
        SenseInventory::new(),
    )?;
    let engine = LengthReconciler::new(tagger, Arc::new(FrequencySummarizer::new()), PatternTable::builtin()?, cache);

    let result = engine.reconcile("The colour faded.", Targets::chars(10)).await;

    assert!(matches!(result, Err(ReconcileError::Tagger(_))));
    Ok(())
}

/// Test the text-only convenience wrapper
#[tokio::test]
async fn test_reconcileText_shouldReturnFittedText() -> Result<()> {
    let engine = common::engine(MockSynonymSource::offline());

    let text = engine.reconcile_text("They did not come.", Some(3), None).await?;

    assert_eq!(text, "They didn't come.");
    Ok(())
}
