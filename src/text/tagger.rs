/*!
 * Grammatical tagging.
 *
 * The engine only depends on the `Tagger` trait. `RuleTagger` is the built-in
 * implementation: a lexicon of closed-class words plus suffix and context
 * rules producing Penn Treebank tags. Tags depend on the surrounding words,
 * so the same surface form may be tagged differently once its sentence
 * changes; callers re-tag after every edit instead of caching tags.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::ops::Range;

use crate::errors::ReconcileError;

static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\p{L}\p{N}]+(?:['][\p{L}]+)*(?:-[\p{L}\p{N}]+)*|[^\s\p{L}\p{N}]")
        .expect("token pattern is valid")
});

/// One tagged word of a sentence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordToken {
    /// Orthographic text as it appears in the sentence
    pub text: String,
    /// Penn Treebank tag
    pub tag: String,
    /// Whether a named entity starts at this token
    pub entity_start: bool,
}

impl WordToken {
    pub fn new(text: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tag: tag.into(),
            entity_start: false,
        }
    }

    /// Lowercase lookup key
    pub fn key(&self) -> String {
        self.text.to_lowercase()
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Coarse part of speech
    pub fn universal(&self) -> UniversalPos {
        penn_to_universal(&self.tag)
    }

    /// Whether the token is made of letters only (apostrophes and hyphens allowed)
    pub fn is_word(&self) -> bool {
        self.text.chars().any(char::is_alphabetic)
            && self.text.chars().all(|c| c.is_alphabetic() || c == '\'' || c == '-')
    }
}

/// Tagging collaborator
pub trait Tagger: Send + Sync {
    /// Tag one sentence, preserving token order
    fn tag(&self, sentence: &str) -> Result<Vec<WordToken>, ReconcileError>;
}

/// Byte range of every token in `sentence`, found left to right.
///
/// A token the sentence does not contain in order yields `None`, and the
/// search resumes after the last located token.
pub fn token_spans(sentence: &str, tokens: &[WordToken]) -> Vec<Option<Range<usize>>> {
    let mut cursor = 0;
    tokens
        .iter()
        .map(|token| {
            let found = sentence[cursor..].find(token.text.as_str())?;
            let start = cursor + found;
            cursor = start + token.text.len();
            Some(start..cursor)
        })
        .collect()
}

/// Universal part-of-speech categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniversalPos {
    Adj,
    Adp,
    Adv,
    Cconj,
    Det,
    Intj,
    Noun,
    Num,
    Part,
    Pron,
    Propn,
    Punct,
    Sym,
    Verb,
    X,
}

impl UniversalPos {
    /// Part-of-speech code used by the synonym lookup service, for open classes only
    pub fn lookup_code(&self) -> Option<&'static str> {
        match self {
            Self::Adj => Some("adj"),
            Self::Adv => Some("adv"),
            Self::Noun => Some("n"),
            Self::Verb => Some("v"),
            _ => None,
        }
    }
}

/// Map a Penn Treebank tag onto its universal category
pub fn penn_to_universal(tag: &str) -> UniversalPos {
    match tag {
        "#" | "$" | "SYM" => UniversalPos::Sym,
        "\"" | "''" | "``" | "," | "-LRB-" | "-RRB-" | "." | ":" | "HYPH" => UniversalPos::Punct,
        "AFX" | "JJ" | "JJR" | "JJS" => UniversalPos::Adj,
        "CC" => UniversalPos::Cconj,
        "CD" => UniversalPos::Num,
        "DT" | "PDT" | "PRP$" | "WDT" | "WP$" => UniversalPos::Det,
        "EX" | "PRP" | "WP" => UniversalPos::Pron,
        "IN" | "RP" => UniversalPos::Adp,
        "MD" | "VB" | "VBD" | "VBG" | "VBN" | "VBP" | "VBZ" => UniversalPos::Verb,
        "NN" | "NNS" => UniversalPos::Noun,
        "NNP" | "NNPS" => UniversalPos::Propn,
        "POS" | "TO" => UniversalPos::Part,
        "RB" | "RBR" | "RBS" | "WRB" => UniversalPos::Adv,
        "UH" => UniversalPos::Intj,
        _ => UniversalPos::X,
    }
}

const LEXICON: &[(&str, &str)] = &[
    ("the", "DT"), ("a", "DT"), ("an", "DT"), ("this", "DT"), ("that", "DT"), ("these", "DT"),
    ("those", "DT"), ("every", "DT"), ("each", "DT"), ("some", "DT"), ("any", "DT"), ("no", "DT"),
    ("all", "DT"), ("both", "DT"), ("either", "DT"), ("neither", "DT"), ("another", "DT"),
    ("of", "IN"), ("in", "IN"), ("on", "IN"), ("at", "IN"), ("by", "IN"), ("for", "IN"),
    ("with", "IN"), ("from", "IN"), ("into", "IN"), ("onto", "IN"), ("upon", "IN"), ("about", "IN"),
    ("above", "IN"), ("below", "IN"), ("under", "IN"), ("over", "IN"), ("after", "IN"),
    ("before", "IN"), ("between", "IN"), ("through", "IN"), ("during", "IN"), ("without", "IN"),
    ("within", "IN"), ("among", "IN"), ("amongst", "IN"), ("against", "IN"), ("toward", "IN"),
    ("towards", "IN"), ("since", "IN"), ("until", "IN"), ("than", "IN"), ("because", "IN"),
    ("although", "IN"), ("though", "IN"), ("while", "IN"), ("whilst", "IN"), ("whereas", "IN"),
    ("if", "IN"), ("unless", "IN"), ("whether", "IN"), ("like", "IN"), ("near", "IN"),
    ("across", "IN"), ("behind", "IN"), ("beside", "IN"), ("beyond", "IN"), ("around", "IN"),
    ("and", "CC"), ("or", "CC"), ("but", "CC"), ("nor", "CC"), ("yet", "CC"), ("so", "CC"),
    ("i", "PRP"), ("you", "PRP"), ("he", "PRP"), ("she", "PRP"), ("it", "PRP"), ("we", "PRP"),
    ("they", "PRP"), ("me", "PRP"), ("him", "PRP"), ("her", "PRP"), ("us", "PRP"), ("them", "PRP"),
    ("myself", "PRP"), ("yourself", "PRP"), ("himself", "PRP"), ("herself", "PRP"),
    ("itself", "PRP"), ("ourselves", "PRP"), ("themselves", "PRP"),
    ("my", "PRP$"), ("your", "PRP$"), ("his", "PRP$"), ("its", "PRP$"), ("our", "PRP$"),
    ("their", "PRP$"),
    ("can", "MD"), ("could", "MD"), ("may", "MD"), ("might", "MD"), ("must", "MD"),
    ("shall", "MD"), ("should", "MD"), ("will", "MD"), ("would", "MD"), ("can't", "MD"),
    ("won't", "MD"), ("wouldn't", "MD"), ("couldn't", "MD"), ("shouldn't", "MD"),
    ("mustn't", "MD"), ("needn't", "MD"),
    ("to", "TO"),
    ("which", "WDT"), ("who", "WP"), ("whom", "WP"), ("what", "WP"), ("whose", "WP$"),
    ("when", "WRB"), ("where", "WRB"), ("why", "WRB"), ("how", "WRB"),
    ("not", "RB"), ("never", "RB"), ("very", "RB"), ("too", "RB"), ("also", "RB"), ("just", "RB"),
    ("only", "RB"), ("even", "RB"), ("still", "RB"), ("already", "RB"), ("always", "RB"),
    ("often", "RB"), ("sometimes", "RB"), ("here", "RB"), ("now", "RB"), ("then", "RB"),
    ("again", "RB"), ("soon", "RB"), ("quite", "RB"), ("rather", "RB"), ("there", "RB"),
    ("is", "VBZ"), ("has", "VBZ"), ("does", "VBZ"), ("isn't", "VBZ"), ("hasn't", "VBZ"),
    ("doesn't", "VBZ"),
    ("are", "VBP"), ("am", "VBP"), ("have", "VBP"), ("do", "VBP"), ("aren't", "VBP"),
    ("haven't", "VBP"), ("don't", "VBP"),
    ("was", "VBD"), ("were", "VBD"), ("had", "VBD"), ("did", "VBD"), ("wasn't", "VBD"),
    ("weren't", "VBD"), ("hadn't", "VBD"), ("didn't", "VBD"), ("said", "VBD"),
    ("be", "VB"), ("been", "VBN"), ("being", "VBG"),
    ("oh", "UH"), ("ah", "UH"), ("yes", "UH"), ("hello", "UH"),
];

const NOUN_SUFFIXES: &[&str] = &[
    "tion", "sion", "ness", "ment", "ity", "ism", "ist", "ship", "hood", "ance", "ence", "dom",
];

const ADJECTIVE_SUFFIXES: &[&str] = &[
    "ous", "ful", "ive", "able", "ible", "ical", "ic", "ish", "less", "ary", "al",
];

const AUXILIARIES: &[&str] = &[
    "have", "has", "had", "having", "was", "were", "is", "are", "be", "been", "being", "am",
];

/// Lexicon and suffix rule tagger producing Penn Treebank tags
#[derive(Debug, Clone)]
pub struct RuleTagger {
    lexicon: HashMap<&'static str, &'static str>,
}

impl Default for RuleTagger {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleTagger {
    pub fn new() -> Self {
        Self {
            lexicon: LEXICON.iter().copied().collect(),
        }
    }

    /// Split a sentence into surface tokens
    pub fn tokenize(sentence: &str) -> Vec<&str> {
        TOKEN_PATTERN.find_iter(sentence).map(|m| m.as_str()).collect()
    }

    fn punctuation_tag(token: &str) -> Option<&'static str> {
        let tag = match token {
            "." | "!" | "?" => ".",
            "," => ",",
            ":" | ";" => ":",
            "\"" => "''",
            "(" | "[" | "{" => "-LRB-",
            ")" | "]" | "}" => "-RRB-",
            "$" => "$",
            "#" => "#",
            "-" => "HYPH",
            _ if token.chars().all(|c| !c.is_alphanumeric()) => "SYM",
            _ => return None,
        };
        Some(tag)
    }

    fn suffix_tag(lower: &str, previous: Option<(&str, &str)>) -> &'static str {
        let len = lower.chars().count();
        let after_auxiliary = previous.is_some_and(|(word, _)| AUXILIARIES.contains(&word));

        if len > 4 && lower.ends_with("ly") {
            return "RB";
        }
        if len > 4 && lower.ends_with("ing") {
            return "VBG";
        }
        if len > 3 && lower.ends_with("ed") {
            return if after_auxiliary { "VBN" } else { "VBD" };
        }
        if len > 5 && lower.ends_with("est") {
            return "JJS";
        }
        if let Some(stem) = lower.strip_suffix('s') {
            if NOUN_SUFFIXES.iter().any(|s| stem.ends_with(s)) {
                return "NNS";
            }
        }
        if NOUN_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
            return "NN";
        }
        if ADJECTIVE_SUFFIXES.iter().any(|s| lower.ends_with(s) && len > s.len() + 2) {
            return "JJ";
        }
        if len > 3 && lower.ends_with('s') && !lower.ends_with("ss") && !lower.ends_with("us") {
            let subject = previous.is_some_and(|(word, tag)| {
                matches!(word, "he" | "she" | "it") || matches!(tag, "NN" | "NNP")
            });
            return if subject { "VBZ" } else { "NNS" };
        }
        "NN"
    }

    fn context_override(tag: &'static str, previous: Option<(&str, &str)>) -> &'static str {
        let Some((word, prev_tag)) = previous else {
            return tag;
        };
        match (prev_tag, tag) {
            ("MD" | "TO", "NN" | "VBP" | "VBD" | "NNS") => "VB",
            ("PRP", "NN") if matches!(word, "i" | "you" | "we" | "they") => "VBP",
            ("DT" | "PRP$", "VBD") => "JJ",
            _ => tag,
        }
    }
}

impl Tagger for RuleTagger {
    fn tag(&self, sentence: &str) -> Result<Vec<WordToken>, ReconcileError> {
        let mut tokens: Vec<WordToken> = Vec::new();
        let mut previous: Option<(String, &'static str)> = None;

        for (position, surface) in Self::tokenize(sentence).into_iter().enumerate() {
            let lower = surface.to_lowercase();
            let prev = previous.as_ref().map(|(w, t)| (w.as_str(), *t));
            let capitalized = surface.chars().next().is_some_and(char::is_uppercase);

            let tag = if let Some(tag) = Self::punctuation_tag(surface) {
                tag
            } else if surface.chars().all(|c| c.is_numeric() || c == '-') {
                "CD"
            } else if let Some(tag) = self.lexicon.get(lower.as_str()).copied() {
                tag
            } else if capitalized && position > 0 && prev.is_none_or(|(_, t)| t != ".") {
                "NNP"
            } else {
                Self::context_override(Self::suffix_tag(&lower, prev), prev)
            };

            let entity_start = tag == "NNP" && prev.is_none_or(|(_, t)| t != "NNP");
            tokens.push(WordToken {
                text: surface.to_string(),
                tag: tag.to_string(),
                entity_start,
            });
            previous = Some((lower, tag));
        }

        Ok(tokens)
    }
}
