//! Pass 1: shrink the document by swapping paragraphs for their summaries.

use log::debug;
use std::collections::HashSet;

use crate::errors::ReconcileError;
use crate::summarize::ParagraphSummarizer;
use crate::text::{Document, char_count, word_count};

use super::combination::{SearchLimits, find_subsets_grouped};
use super::{DeltaState, PassStats};

/// A summarized variant of one paragraph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryCandidate {
    pub paragraph: usize,
    pub sentences: usize,
    pub text: String,
    pub words: i64,
    pub chars: i64,
}

/// Whether `text` has an unbalanced number of double quotes
pub fn has_unbalanced_quotes(text: &str) -> bool {
    text.matches('"').count() % 2 != 0
}

/// Summaries of every paragraph at every shorter sentence count.
///
/// Paragraphs are visited longest first. A paragraph the summarizer cannot
/// rank is dropped entirely; variants with unbalanced quotes or no word
/// change are skipped.
pub fn collect_candidates(
    document: &Document,
    summarizer: &ParagraphSummarizer,
) -> Result<Vec<SummaryCandidate>, ReconcileError> {
    let mut ranked: Vec<usize> = (0..document.len()).collect();
    ranked.sort_by_key(|&i| std::cmp::Reverse(document.paragraphs()[i].sentence_count()));

    let longest = ranked
        .first()
        .map_or(0, |&i| document.paragraphs()[i].sentence_count());

    let mut unsummarizable: HashSet<usize> = HashSet::new();
    let mut candidates = Vec::new();

    for sentences in 1..longest {
        for &index in &ranked {
            let paragraph = &document.paragraphs()[index];
            if paragraph.sentence_count() <= sentences {
                break;
            }
            if unsummarizable.contains(&index) {
                continue;
            }

            let Some(text) = summarizer.try_summarize(paragraph.text(), sentences)? else {
                unsummarizable.insert(index);
                continue;
            };
            if has_unbalanced_quotes(&text) {
                debug!("Skipping summary of paragraph {} with unbalanced quotes", index);
                continue;
            }

            let words = word_count(&text) as i64 - paragraph.word_count() as i64;
            if words == 0 || text.trim().is_empty() {
                continue;
            }
            let chars = char_count(&text) as i64 - paragraph.char_count() as i64;

            candidates.push(SummaryCandidate {
                paragraph: index,
                sentences,
                text,
                words,
                chars,
            });
        }
    }

    Ok(candidates)
}

/// Indices of candidates picked greedily: each step takes the unused
/// paragraph's candidate that brings `remaining` closest to zero, as long as
/// it strictly improves.
///
/// A candidate that would remove more words than `remaining` asks for is
/// never taken. Later passes can still shave off the rest but rarely add
/// words back.
pub fn greedy_selection(candidates: &[SummaryCandidate], mut remaining: i64) -> Vec<usize> {
    let mut altered: HashSet<usize> = HashSet::new();
    let mut picked = Vec::new();

    loop {
        let best = candidates
            .iter()
            .enumerate()
            .filter(|(_, c)| !altered.contains(&c.paragraph))
            .filter(|(_, c)| remaining - c.words <= 0)
            .filter(|(_, c)| (remaining - c.words).abs() < remaining.abs())
            .min_by_key(|(_, c)| (remaining - c.words).abs());

        let Some((index, candidate)) = best else {
            break;
        };
        altered.insert(candidate.paragraph);
        remaining -= candidate.words;
        picked.push(index);
    }

    picked
}

/// Run the paragraph pass. Does nothing unless words must be removed.
pub fn reduce_paragraphs(
    document: &mut Document,
    delta: &mut DeltaState,
    summarizer: &ParagraphSummarizer,
    limits: SearchLimits,
) -> Result<PassStats, ReconcileError> {
    let mut stats = PassStats::default();
    if delta.words() >= 0 {
        return Ok(stats);
    }

    let candidates = collect_candidates(document, summarizer)?;
    if candidates.is_empty() {
        debug!("No paragraph can be summarized");
        return Ok(stats);
    }

    let deltas: Vec<i64> = candidates.iter().map(|c| c.words).collect();
    let groups: Vec<usize> = candidates.iter().map(|c| c.paragraph).collect();
    let outcome = find_subsets_grouped(&deltas, &groups, delta.words(), limits);
    stats.truncated = outcome.truncated;

    let chosen: Vec<usize> = match outcome.smallest() {
        Some(subset) => {
            debug!(
                "Exact paragraph combination of {} members out of {} subsets",
                subset.len(),
                outcome.subsets.len()
            );
            subset.to_vec()
        }
        None => {
            debug!("No exact paragraph combination, falling back to greedy selection");
            greedy_selection(&candidates, delta.words())
        }
    };

    for index in chosen {
        let candidate = &candidates[index];
        if let Some(edit) = document.replace_paragraph(candidate.paragraph, candidate.text.clone()) {
            debug!(
                "Summarized paragraph {} to {} sentences ({:+} words)",
                candidate.paragraph, candidate.sentences, edit.words
            );
            delta.apply(edit);
            stats.edits += 1;
        }
    }

    Ok(stats)
}
