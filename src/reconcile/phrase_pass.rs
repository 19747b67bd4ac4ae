//! Pass 2: phrase rules from the pattern table, applied until nothing changes.

use log::debug;
use std::borrow::Cow;
use std::ops::Range;

use crate::patterns::{PatternEntry, PatternTable};
use crate::text::{Document, word_count};

use super::{DeltaState, PassStats};

/// Byte offset of the first occurrence of `phrase` at or after `from` that
/// is bounded by whitespace or the ends of `text`
pub fn find_bounded(text: &str, phrase: &str, from: usize) -> Option<usize> {
    if phrase.is_empty() {
        return None;
    }
    let mut start = from;
    while start <= text.len() {
        let at = start + text.get(start..)?.find(phrase)?;
        let end = at + phrase.len();
        let open = text[..at].chars().next_back().is_none_or(char::is_whitespace);
        let close = text[end..].chars().next().is_none_or(char::is_whitespace);
        if open && close {
            return Some(at);
        }
        start = at + text[at..].chars().next().map_or(1, char::len_utf8);
    }
    None
}

/// `text` with the occurrence of `source` at `at` replaced by `target`.
/// An empty target also removes one neighbouring space.
pub fn splice(text: &str, at: usize, source: &str, target: &str) -> String {
    let end = at + source.len();
    if !target.is_empty() {
        return format!("{}{}{}", &text[..at], target, &text[end..]);
    }

    let before = &text[..at];
    let after = &text[end..];
    match after.chars().next() {
        Some(c) if c.is_whitespace() => format!("{}{}", before, &after[c.len_utf8()..]),
        _ => match before.chars().next_back() {
            Some(c) if c.is_whitespace() => format!("{}{}", &before[..before.len() - c.len_utf8()], after),
            _ => format!("{}{}", before, after),
        },
    }
}

/// The rule in whichever direction moves words toward `remaining`
fn orient(entry: &PatternEntry, remaining: i64) -> Option<Cow<'_, PatternEntry>> {
    if entry.word_delta != 0 && entry.word_delta.signum() == remaining.signum() {
        return Some(Cow::Borrowed(entry));
    }
    entry
        .reversed()
        .filter(|r| r.word_delta != 0 && r.word_delta.signum() == remaining.signum())
        .map(Cow::Owned)
}

/// Byte ranges of text written by earlier substitutions, per paragraph
type WrittenSpans = Vec<Vec<Range<usize>>>;

fn overlaps(spans: &[Range<usize>], start: usize, end: usize) -> bool {
    spans.iter().any(|span| span.start < end && start < span.end)
}

/// Record a substitution of `removed` bytes at `at` by `inserted` bytes,
/// where the paragraph changed length by `shift`
fn record_written(spans: &mut Vec<Range<usize>>, at: usize, removed: usize, inserted: usize, shift: isize) {
    let end = at + removed;
    for span in spans.iter_mut().filter(|span| span.start >= end) {
        span.start = span.start.saturating_add_signed(shift);
        span.end = span.end.saturating_add_signed(shift);
    }
    if inserted > 0 {
        spans.push(at..at + inserted);
    }
}

/// Apply `rule` at every occurrence where it still makes progress.
/// Occurrences inside text an earlier substitution wrote are left alone.
fn apply_rule(
    document: &mut Document,
    delta: &mut DeltaState,
    rule: &PatternEntry,
    written: &mut WrittenSpans,
) -> usize {
    let mut edits = 0;
    if written.len() < document.len() {
        written.resize(document.len(), Vec::new());
    }

    for index in 0..document.len() {
        let mut from = 0;
        loop {
            let remaining = delta.words();
            if remaining == 0 {
                return edits;
            }

            let text = document.paragraphs()[index].text().to_string();
            let Some(at) = find_bounded(&text, &rule.source, from) else {
                break;
            };
            let skip_to = at + text[at..].chars().next().map_or(1, char::len_utf8);
            if overlaps(&written[index], at, at + rule.source.len()) {
                from = skip_to;
                continue;
            }

            let replaced = splice(&text, at, &rule.source, &rule.target);
            let words = word_count(&replaced) as i64 - word_count(&text) as i64;
            if (remaining - words).abs() >= remaining.abs() {
                from = skip_to;
                continue;
            }

            match document.replace_paragraph(index, replaced.clone()) {
                Some(edit) => {
                    debug!(
                        "Phrase '{}' -> '{}' in paragraph {} ({:+} words, {:+} chars)",
                        rule.source, rule.target, index, edit.words, edit.chars
                    );
                    delta.apply(edit);
                    edits += 1;
                    let shift = replaced.len() as isize - text.len() as isize;
                    record_written(&mut written[index], at, rule.source.len(), rule.target.len(), shift);
                    from = at + rule.target.len();
                }
                None => from = skip_to,
            }
        }
    }

    edits
}

/// Run the phrase pass until a full sweep over the table changes nothing
pub fn substitute_phrases(document: &mut Document, delta: &mut DeltaState, table: &PatternTable) -> PassStats {
    let mut stats = PassStats::default();
    let mut written: WrittenSpans = vec![Vec::new(); document.len()];

    loop {
        let mut changed = false;
        for entry in table.entries() {
            if delta.words() == 0 {
                return stats;
            }
            let Some(rule) = orient(entry, delta.words()) else {
                continue;
            };
            let edits = apply_rule(document, delta, &rule, &mut written);
            stats.edits += edits;
            changed |= edits > 0;
        }
        if !changed {
            return stats;
        }
    }
}
