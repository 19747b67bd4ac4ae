//! Pass 3: one-for-one token swaps that move the character count.
//!
//! Sentences are re-tagged after every accepted swap, since a changed word
//! can change the tags of its neighbours.

use log::debug;

use crate::errors::ReconcileError;
use crate::patterns::RegionalSpellings;
use crate::synonyms::SynonymCache;
use crate::text::{Document, Tagger, char_count, sentence_spans, token_spans, word_count};

use super::{DeltaState, PassStats};

/// Candidate that brings `remaining` closest to zero when it replaces
/// `original`, or `None` when no candidate strictly improves
pub fn best_candidate<'a>(original: &str, candidates: &'a [String], remaining: i64) -> Option<&'a str> {
    let base = char_count(original) as i64;
    let (best, distance) = candidates
        .iter()
        .map(|c| (c, (remaining - (char_count(c) as i64 - base)).abs()))
        .min_by_key(|(_, distance)| *distance)?;
    (distance < remaining.abs()).then_some(best.as_str())
}

/// Regional counterpart of `word` when it moves characters toward `remaining`
pub fn regional_swap<'a>(word: &str, regional: &'a RegionalSpellings, remaining: i64) -> Option<&'a str> {
    let counterpart = regional.counterpart(word)?;
    let change = char_count(counterpart) as i64 - char_count(word) as i64;
    (change != 0 && change.signum() == remaining.signum() && (remaining - change).abs() < remaining.abs())
        .then_some(counterpart)
}

/// Where a token sits inside the document
struct Cursor {
    paragraph: usize,
    start: usize,
    end: usize,
}

/// Replace the token under `cursor` with `replacement`, keeping word counts
fn swap(document: &mut Document, delta: &mut DeltaState, cursor: &Cursor, replacement: &str) -> bool {
    if word_count(replacement) != 1 {
        return false;
    }
    let text = document.paragraphs()[cursor.paragraph].text();
    let replaced = format!("{}{}{}", &text[..cursor.start], replacement, &text[cursor.end..]);
    if word_count(&replaced) != word_count(text) {
        return false;
    }

    match document.replace_paragraph(cursor.paragraph, replaced) {
        Some(edit) => {
            delta.apply(edit);
            true
        }
        None => false,
    }
}

/// Run one sweep over every token of the document
async fn sweep(
    document: &mut Document,
    delta: &mut DeltaState,
    cache: &SynonymCache,
    tagger: &dyn Tagger,
    regional: &RegionalSpellings,
) -> Result<usize, ReconcileError> {
    let mut edits = 0;

    for paragraph in 0..document.len() {
        let mut sentence_index = 0;
        let mut token_index = 0;

        loop {
            if delta.chars() == 0 {
                return Ok(edits);
            }

            let text = document.paragraphs()[paragraph].text().to_string();
            let spans = sentence_spans(&text);
            let Some(&(offset, sentence)) = spans.get(sentence_index) else {
                break;
            };
            let tokens = tagger.tag(sentence)?;
            if token_index >= tokens.len() {
                sentence_index += 1;
                token_index = 0;
                continue;
            }

            let Some(span) = token_spans(sentence, &tokens)[token_index].clone() else {
                token_index += 1;
                continue;
            };
            let mut cursor = Cursor {
                paragraph,
                start: offset + span.start,
                end: offset + span.end,
            };
            let mut current = tokens[token_index].text.clone();

            let candidates = cache.candidates(sentence, &tokens, token_index).await?;
            if let Some(best) = best_candidate(&current, &candidates, delta.chars()) {
                let best = best.to_string();
                if best != current && swap(document, delta, &cursor, &best) {
                    debug!("Synonym '{}' -> '{}' ({:+} chars left)", current, best, delta.chars());
                    cursor.end = cursor.start + best.len();
                    current = best;
                    edits += 1;
                }
            }

            if delta.chars() != 0 {
                if let Some(counterpart) = regional_swap(&current, regional, delta.chars()) {
                    if swap(document, delta, &cursor, counterpart) {
                        debug!("Spelling '{}' -> '{}' ({:+} chars left)", current, counterpart, delta.chars());
                        edits += 1;
                    }
                }
            }

            token_index += 1;
        }
    }

    Ok(edits)
}

/// Run the token pass until a sweep changes nothing or the character delta is zero
pub async fn substitute_tokens(
    document: &mut Document,
    delta: &mut DeltaState,
    cache: &SynonymCache,
    tagger: &dyn Tagger,
    regional: &RegionalSpellings,
) -> Result<PassStats, ReconcileError> {
    let mut stats = PassStats::default();

    while delta.chars() != 0 {
        let edits = sweep(document, delta, cache, tagger, regional).await?;
        stats.edits += edits;
        if edits == 0 {
            break;
        }
    }

    Ok(stats)
}
