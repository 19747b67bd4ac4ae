/*!
 * Tokenized text model.
 *
 * Raw prose flows through three layers here:
 * 1. **Normalization**: an ordered pipeline of pure `text -> text` stages
 * 2. **Document**: paragraphs split on blank lines, with word and character counts
 * 3. **Tagging**: sentence-level tokens with grammatical tags from a `Tagger`
 */

pub mod document;
pub mod normalize;
pub mod tagger;

pub use document::{Document, EditDelta, PARAGRAPH_SEPARATOR, Paragraph, char_count, sentence_spans, split_sentences, word_count};
pub use normalize::{Stage, TextPipeline, normalize};
pub use tagger::{RuleTagger, Tagger, UniversalPos, WordToken, penn_to_universal, token_spans};
