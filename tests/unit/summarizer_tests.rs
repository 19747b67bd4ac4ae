/*!
 * Tests for paragraph summarization
 */

use std::sync::Arc;

use spreadshred::summarize::{FrequencySummarizer, ParagraphSummarizer, Summarizer};
use spreadshred::text::split_sentences;

use crate::common::mock_collaborators::{DegenerateSummarizer, ReverseSummarizer};

const PARAGRAPH: &str = "Rain fell on the moor. Holmes smoked. Watson wrote to London. The moor rain kept falling.";

/// Test that a summary of n sentences holds exactly n source sentences
#[test]
fn test_summarize_shouldKeepRequestedSentenceCount() {
    let adapter = ParagraphSummarizer::new(Arc::new(FrequencySummarizer::new()));
    let sources = split_sentences(PARAGRAPH);

    for n in 1..sources.len() {
        let summary = adapter.summarize(PARAGRAPH, n).unwrap();
        let kept = split_sentences(&summary);
        assert_eq!(kept.len(), n);
        assert!(kept.iter().all(|s| sources.contains(s)));
    }
}

/// Test that the adapter restores source order whatever the ranking says
#[test]
fn test_summarize_reverseRanking_shouldStillFollowSourceOrder() {
    let adapter = ParagraphSummarizer::new(Arc::new(ReverseSummarizer));

    let summary = adapter.summarize(PARAGRAPH, 2).unwrap();

    assert_eq!(summary, "Watson wrote to London. The moor rain kept falling.");
}

/// Test that an injected summarizer can declare every paragraph degenerate
#[test]
fn test_trySummarize_degenerateRanking_shouldBeNone() {
    let adapter = ParagraphSummarizer::new(Arc::new(DegenerateSummarizer));

    assert!(adapter.try_summarize(PARAGRAPH, 1).unwrap().is_none());
    assert_eq!(adapter.summarize(PARAGRAPH, 1).unwrap(), PARAGRAPH);
}

/// Test that a paragraph with fewer distinct terms than sentences is degenerate
#[test]
fn test_rankSentences_smallVocabulary_shouldBeDegenerate() {
    let ranking = FrequencySummarizer::new().rank_sentences("Rain. Rain. Rain.").unwrap();
    assert!(ranking.is_none());
}

/// Test that custom stop words change what counts as a term
#[test]
fn test_withStopWords_shouldIgnoreListedTerms() {
    let paragraph = "Moor moor moor. Pipe smoke.";
    let default_ranking = FrequencySummarizer::new().rank_sentences(paragraph).unwrap().unwrap();
    let custom = FrequencySummarizer::with_stop_words(["moor"]);

    assert_eq!(default_ranking, vec![0, 1]);
    // With "moor" ignored the first sentence has no terms left
    assert_eq!(custom.rank_sentences(paragraph).unwrap(), Some(vec![1, 0]));
}
