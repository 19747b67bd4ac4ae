/*!
 * Text normalization.
 *
 * Normalization is an explicit, ordered list of named stages. Each stage is a
 * pure function from text to text and the pipeline simply folds the input
 * through them. The cleaning pipeline is idempotent: running it on its own
 * output changes nothing.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use unicode_normalization::UnicodeNormalization;

use super::document::{PARAGRAPH_SEPARATOR, split_paragraphs};

static HYPHENATED_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\w)-[ \t]*\r?\n\s*(\w)").expect("hyphenation pattern is valid"));

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// A single named transformation
pub struct Stage {
    name: String,
    apply: Box<dyn Fn(&str) -> String + Send + Sync>,
}

impl Stage {
    /// Create a stage from a name and a pure function
    pub fn new(name: impl Into<String>, apply: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self {
            name: name.into(),
            apply: Box::new(apply),
        }
    }

    /// Stage name, used in debug output
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the stage
    pub fn apply(&self, text: &str) -> String {
        (self.apply)(text)
    }
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage").field("name", &self.name).finish()
    }
}

/// Ordered list of stages run front to back
#[derive(Debug, Default)]
pub struct TextPipeline {
    stages: Vec<Stage>,
}

impl TextPipeline {
    /// Create an empty pipeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Pipeline that cleans a single paragraph
    pub fn cleaning() -> Self {
        Self::new()
            .then(Stage::new("strip_control_chars", strip_control_chars))
            .then(Stage::new("join_hyphenated_words", join_hyphenated_words))
            .then(Stage::new("flatten_line_breaks", flatten_line_breaks))
            .then(Stage::new("normalize_quotation_marks", normalize_quotation_marks))
            .then(Stage::new("normalize_unicode", normalize_unicode))
            .then(Stage::new("normalize_whitespace", normalize_whitespace))
    }

    /// Append a stage
    pub fn then(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    /// Names of the stages in run order
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(Stage::name).collect()
    }

    /// Fold the text through every stage
    pub fn run(&self, text: &str) -> String {
        self.stages
            .iter()
            .fold(text.to_string(), |acc, stage| stage.apply(&acc))
    }
}

/// Normalize a whole text: split on blank lines, clean each paragraph,
/// drop empty ones and rejoin with a single blank line.
pub fn normalize(text: &str) -> String {
    let pipeline = TextPipeline::cleaning();
    split_paragraphs(text)
        .into_iter()
        .map(|p| pipeline.run(p))
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(PARAGRAPH_SEPARATOR)
}

/// Remove control characters other than whitespace
pub fn strip_control_chars(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .collect()
}

/// Re-join words split by a hyphen at a line break
pub fn join_hyphenated_words(text: &str) -> String {
    HYPHENATED_BREAK.replace_all(text, "$1$2").into_owned()
}

/// Turn line breaks and underscores into spaces
pub fn flatten_line_breaks(text: &str) -> String {
    text.chars()
        .map(|c| if c == '\n' || c == '\r' || c == '_' { ' ' } else { c })
        .collect()
}

/// Replace typographic quotes with their ASCII forms
pub fn normalize_quotation_marks(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{2033}' | '\u{00AB}' | '\u{00BB}' => '"',
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' => '\'',
            other => other,
        })
        .collect()
}

/// Canonical composition (NFC)
pub fn normalize_unicode(text: &str) -> String {
    text.nfc().collect()
}

/// Collapse whitespace runs and trim the ends
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
}

/// Greedy line wrapping stage.
///
/// Paragraph separators are kept; each paragraph is wrapped on its own.
pub fn wrap_stage(width: usize) -> Stage {
    Stage::new(format!("wrap_{}", width), move |text| wrap(text, width))
}

/// Wrap every paragraph of `text` to at most `width` columns where possible
pub fn wrap(text: &str, width: usize) -> String {
    split_paragraphs(text)
        .into_iter()
        .map(|paragraph| {
            let mut lines: Vec<String> = Vec::new();
            let mut line = String::new();
            for word in paragraph.split_whitespace() {
                let needed = line.chars().count() + word.chars().count() + usize::from(!line.is_empty());
                if !line.is_empty() && needed > width {
                    lines.push(std::mem::take(&mut line));
                }
                if !line.is_empty() {
                    line.push(' ');
                }
                line.push_str(word);
            }
            if !line.is_empty() {
                lines.push(line);
            }
            lines.join("\n")
        })
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(PARAGRAPH_SEPARATOR)
}
