/*!
 * Document model for length reconciliation.
 *
 * A document is an ordered list of paragraphs. Paragraphs are replaced
 * wholesale, never edited in place, and the document keeps its word and
 * character totals in step with every replacement.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use super::normalize::TextPipeline;

/// Separator placed between paragraphs when rendering
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").expect("paragraph pattern is valid"));

/// Number of whitespace-separated words. Leading, trailing or repeated
/// whitespace never produces empty words, so `word_count("") == 0`.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Number of Unicode scalar values
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// Split raw text on blank lines
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    PARAGRAPH_BREAK.split(text).collect()
}

/// Split a paragraph into trimmed, non-empty sentences
pub fn split_sentences(text: &str) -> Vec<String> {
    text.split_sentence_bounds()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Trimmed, non-empty sentences with their byte offset into `text`
pub fn sentence_spans(text: &str) -> Vec<(usize, &str)> {
    text.split_sentence_bound_indices()
        .filter_map(|(start, raw)| {
            let trimmed = raw.trim_start();
            let offset = start + (raw.len() - trimmed.len());
            let trimmed = trimmed.trim_end();
            (!trimmed.is_empty()).then_some((offset, trimmed))
        })
        .collect()
}

/// A contiguous span of prose
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    text: String,
    sentence_count: usize,
    word_count: usize,
    char_count: usize,
}

impl Paragraph {
    /// Create a paragraph from already normalized text
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            sentence_count: split_sentences(&text).len(),
            word_count: word_count(&text),
            char_count: char_count(&text),
            text,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sentence_count(&self) -> usize {
        self.sentence_count
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn char_count(&self) -> usize {
        self.char_count
    }

    /// Sentences of the paragraph in source order
    pub fn sentences(&self) -> Vec<String> {
        split_sentences(&self.text)
    }
}

/// Word and character change produced by one edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EditDelta {
    /// Change in words (new - old)
    pub words: i64,
    /// Change in characters (new - old)
    pub chars: i64,
}

/// Ordered sequence of paragraphs
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    paragraphs: Vec<Paragraph>,
    word_count: usize,
    content_chars: usize,
}

impl Document {
    /// Normalize raw text and split it into paragraphs
    pub fn parse(raw: &str) -> Self {
        let pipeline = TextPipeline::cleaning();
        let paragraphs = split_paragraphs(raw)
            .into_iter()
            .map(|p| pipeline.run(p))
            .filter(|p| !p.is_empty())
            .map(Paragraph::new)
            .collect();
        Self::from_paragraphs(paragraphs)
    }

    /// Build a document from paragraphs
    pub fn from_paragraphs(paragraphs: Vec<Paragraph>) -> Self {
        let word_count = paragraphs.iter().map(Paragraph::word_count).sum();
        let content_chars = paragraphs.iter().map(Paragraph::char_count).sum();
        Self {
            paragraphs,
            word_count,
            content_chars,
        }
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// Total words across all paragraphs
    pub fn word_count(&self) -> usize {
        self.word_count
    }

    /// Characters of the rendered text, separators included
    pub fn char_count(&self) -> usize {
        let separators = self.paragraphs.len().saturating_sub(1) * char_count(PARAGRAPH_SEPARATOR);
        self.content_chars + separators
    }

    /// Replace paragraph `index` with `text` and return the exact count change.
    ///
    /// Returns `None` when the index is out of range or the replacement would
    /// leave the paragraph empty.
    pub fn replace_paragraph(&mut self, index: usize, text: impl Into<String>) -> Option<EditDelta> {
        let text = text.into();
        if text.trim().is_empty() {
            return None;
        }
        let slot = self.paragraphs.get_mut(index)?;
        let replacement = Paragraph::new(text);
        let delta = EditDelta {
            words: replacement.word_count as i64 - slot.word_count as i64,
            chars: replacement.char_count as i64 - slot.char_count as i64,
        };

        self.word_count = self.word_count - slot.word_count + replacement.word_count;
        self.content_chars = self.content_chars - slot.char_count + replacement.char_count;
        *slot = replacement;

        Some(delta)
    }

    /// Render paragraphs joined by a blank line
    pub fn render(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join(PARAGRAPH_SEPARATOR)
    }
}
