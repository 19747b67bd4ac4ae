/*!
 * Tests for normalization, documents and tagging
 */

use spreadshred::text::normalize::{TextPipeline, wrap};
use spreadshred::text::{
    Document, Paragraph, RuleTagger, Tagger, UniversalPos, char_count, normalize, penn_to_universal, sentence_spans,
    token_spans, word_count,
};

/// Test that word counting ignores surrounding and repeated whitespace
#[test]
fn test_wordCount_withIrregularWhitespace_shouldCountTokens() {
    assert_eq!(word_count(""), 0);
    assert_eq!(word_count("   "), 0);
    assert_eq!(word_count(" one  two\tthree\n"), 3);
}

/// Test that characters are counted as Unicode scalars, not bytes
#[test]
fn test_charCount_withAccents_shouldCountScalars() {
    assert_eq!(char_count("café"), 4);
    assert_eq!(char_count(""), 0);
}

/// Test that a document renders exactly what its counts describe
#[test]
fn test_document_counts_shouldMatchRenderedText() {
    let document = Document::parse("First  paragraph here.\n\n\n\nSecond one.\n\n   \n\nThird.");

    let rendered = document.render();

    assert_eq!(document.len(), 3);
    assert_eq!(rendered, "First paragraph here.\n\nSecond one.\n\nThird.");
    assert_eq!(document.word_count(), word_count(&rendered));
    assert_eq!(document.char_count(), char_count(&rendered));
}

/// Test that replacing a paragraph returns the exact count change
#[test]
fn test_replaceParagraph_shouldReturnExactDelta() {
    let mut document = Document::parse("One two three.\n\nFour five.");
    let before_words = document.word_count() as i64;
    let before_chars = document.char_count() as i64;

    let delta = document.replace_paragraph(0, "One.").unwrap();

    assert_eq!(delta.words, -2);
    assert_eq!(delta.chars, -10);
    assert_eq!(document.word_count() as i64, before_words + delta.words);
    assert_eq!(document.char_count() as i64, before_chars + delta.chars);
}

/// Test that a replacement cannot empty a paragraph or miss the range
#[test]
fn test_replaceParagraph_withEmptyOrOutOfRange_shouldBeRejected() {
    let mut document = Document::parse("Only paragraph.");
    assert!(document.replace_paragraph(0, "   ").is_none());
    assert!(document.replace_paragraph(3, "text").is_none());
    assert_eq!(document.render(), "Only paragraph.");
}

/// Test that a paragraph knows its sentences
#[test]
fn test_paragraph_sentences_shouldSplitOnBoundaries() {
    let paragraph = Paragraph::new("It rained. We stayed in! Did you?");
    assert_eq!(paragraph.sentence_count(), 3);
    assert_eq!(paragraph.sentences()[1], "We stayed in!");
}

/// Test that sentence spans point back into the paragraph
#[test]
fn test_sentenceSpans_shouldCarryByteOffsets() {
    let text = "Hi there. Bye now.";
    let spans = sentence_spans(text);
    assert_eq!(spans.len(), 2);
    for (offset, sentence) in spans {
        assert_eq!(&text[offset..offset + sentence.len()], sentence);
    }
}

/// Test that cleaning a text twice changes nothing the second time
#[test]
fn test_normalize_twice_shouldBeStable() {
    let raw = "\u{201C}Quoted\u{201D}  text_with  under-\nscores\n\n\n\nNext.";
    let once = normalize(raw);
    assert_eq!(normalize(&once), once);
    assert!(once.contains("\"Quoted\""));
}

/// Test that stages can be appended to a pipeline in order
#[test]
fn test_pipeline_then_shouldRunStagesInOrder() {
    let pipeline = TextPipeline::new()
        .then(spreadshred::text::Stage::new("upper", |t| t.to_uppercase()))
        .then(spreadshred::text::Stage::new("exclaim", |t| format!("{}!", t)));

    assert_eq!(pipeline.stage_names(), vec!["upper", "exclaim"]);
    assert_eq!(pipeline.run("hey"), "HEY!");
}

/// Test that wrapping keeps paragraphs apart and words intact
#[test]
fn test_wrap_withParagraphs_shouldWrapEachOnItsOwn() {
    let wrapped = wrap("alpha beta gamma delta\n\nepsilon zeta", 11);
    let paragraphs: Vec<&str> = wrapped.split("\n\n").collect();

    assert_eq!(paragraphs.len(), 2);
    assert_eq!(paragraphs[0], "alpha beta\ngamma delta");
    assert_eq!(paragraphs[1], "epsilon\nzeta");
}

/// Test that the rule tagger tags a simple sentence
#[test]
fn test_ruleTagger_simpleSentence_shouldTagOpenClasses() {
    let tokens = RuleTagger::new().tag("The old house collapsed quickly.").unwrap();
    let tags: Vec<&str> = tokens.iter().map(|t| t.tag.as_str()).collect();

    assert_eq!(tokens.len(), 6);
    assert_eq!(tags[0], "DT");
    assert_eq!(tags[2], "NN");
    assert_eq!(tags[3], "VBD");
    assert_eq!(tags[4], "RB");
    assert_eq!(tags[5], ".");
}

/// Test that a capitalized word inside a sentence starts an entity
#[test]
fn test_ruleTagger_properNoun_shouldStartEntity() {
    let tokens = RuleTagger::new().tag("We met Sherlock Holmes today.").unwrap();
    assert_eq!(tokens[2].tag, "NNP");
    assert!(tokens[2].entity_start);
    assert_eq!(tokens[3].tag, "NNP");
    assert!(!tokens[3].entity_start);
}

/// Test the mapping from Penn tags onto universal categories
#[test]
fn test_pennToUniversal_shouldMapOpenClasses() {
    assert_eq!(penn_to_universal("NNS"), UniversalPos::Noun);
    assert_eq!(penn_to_universal("NNP"), UniversalPos::Propn);
    assert_eq!(penn_to_universal("VBZ"), UniversalPos::Verb);
    assert_eq!(penn_to_universal("JJR"), UniversalPos::Adj);
    assert_eq!(penn_to_universal("WRB"), UniversalPos::Adv);
    assert_eq!(penn_to_universal("???"), UniversalPos::X);
    assert_eq!(UniversalPos::Noun.lookup_code(), Some("n"));
    assert_eq!(UniversalPos::Det.lookup_code(), None);
}

/// Test that token spans locate every token left to right
#[test]
fn test_tokenSpans_shouldLocateRepeatedWords() {
    let sentence = "the cat saw the dog";
    let tokens = RuleTagger::new().tag(sentence).unwrap();
    let spans = token_spans(sentence, &tokens);

    assert_eq!(spans[3], Some(12..15));
    for (token, span) in tokens.iter().zip(spans) {
        let span = span.unwrap();
        assert_eq!(&sentence[span], token.text);
    }
}
