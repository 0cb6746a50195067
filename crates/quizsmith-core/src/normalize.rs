//! Text normalization: cleanup and sentence segmentation.
//!
//! The normalizer is the only pipeline stage that can fail: lesson text that
//! yields zero usable sentences is a hard `MissingContent` error. Everything
//! downstream degrades instead of failing.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::QuizError;

static MULTI_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static SPACE_BEFORE_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+([.,!?;:])").unwrap());
static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

/// One segmented sentence with its position in the lesson.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sentence {
    /// Cleaned sentence text.
    pub text: String,
    /// Zero-based index across the whole lesson.
    pub index: usize,
    /// Zero-based paragraph the sentence belongs to.
    pub paragraph: usize,
}

/// The normalized form of a lesson: cleaned, segmented sentences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedText {
    /// All usable sentences, in document order.
    pub sentences: Vec<Sentence>,
}

impl NormalizedText {
    /// The full cleaned text, sentences joined by single spaces.
    pub fn joined(&self) -> String {
        self.sentences
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Sentence texts only, for stages that don't need positions.
    pub fn texts(&self) -> Vec<&str> {
        self.sentences.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Collapse whitespace runs and fix spacing before punctuation.
pub fn clean_text(text: &str) -> String {
    let collapsed = MULTI_WHITESPACE.replace_all(text, " ");
    SPACE_BEFORE_PUNCT
        .replace_all(&collapsed, "$1")
        .trim()
        .to_string()
}

/// Split one paragraph into sentences on terminal punctuation.
///
/// The split happens after a run of `.`, `!` or `?` (plus any closing quote)
/// followed by whitespace. Rust's regex crate has no lookbehind, so this is a
/// character walk rather than the usual split pattern.
fn split_paragraph(paragraph: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = paragraph.chars().peekable();

    while let Some(ch) = chars.next() {
        current.push(ch);
        if matches!(ch, '.' | '!' | '?') {
            // Consume any further terminal punctuation and closing quotes.
            while let Some(&next) = chars.peek() {
                if matches!(next, '.' | '!' | '?' | '"' | '\'' | ')') {
                    current.push(next);
                    chars.next();
                } else {
                    break;
                }
            }
            if chars.peek().map_or(true, |c| c.is_whitespace()) {
                sentences.push(current.clone());
                current.clear();
            }
        }
    }
    if !current.trim().is_empty() {
        sentences.push(current);
    }
    sentences
}

/// Normalize raw lesson text into cleaned sentences.
///
/// Returns `QuizError::MissingContent` when nothing usable remains.
pub fn normalize(raw: &str) -> Result<NormalizedText, QuizError> {
    let mut sentences = Vec::new();
    let mut index = 0usize;

    for (paragraph_idx, paragraph) in PARAGRAPH_BREAK.split(raw).enumerate() {
        for fragment in split_paragraph(paragraph) {
            let text = clean_text(&fragment);
            if text.is_empty() {
                continue;
            }
            sentences.push(Sentence {
                text,
                index,
                paragraph: paragraph_idx,
            });
            index += 1;
        }
    }

    if sentences.is_empty() {
        return Err(QuizError::MissingContent);
    }

    Ok(NormalizedText { sentences })
}

/// Whether a sentence is well-formed enough to stand alone as a true/false
/// statement: long enough, starts uppercase, ends with terminal punctuation.
pub fn is_statement_quality(sentence: &str) -> bool {
    let words = sentence.split_whitespace().count();
    if words < 5 || sentence.len() < 20 || sentence.len() > 300 {
        return false;
    }
    let starts_upper = sentence.chars().next().is_some_and(|c| c.is_uppercase());
    let ends_terminal = sentence
        .trim_end_matches(['"', '\'', ')'])
        .ends_with(['.', '!', '?']);
    starts_upper && ends_terminal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_collapses_whitespace() {
        assert_eq!(clean_text("a  b\t c"), "a b c");
        assert_eq!(clean_text("word , next ."), "word, next.");
        assert_eq!(clean_text("  padded  "), "padded");
    }

    #[test]
    fn splits_on_terminal_punctuation() {
        let text = "Plants grow. Do they need light? Yes! They do.";
        let normalized = normalize(text).unwrap();
        let texts: Vec<_> = normalized.texts();
        assert_eq!(
            texts,
            vec!["Plants grow.", "Do they need light?", "Yes!", "They do."]
        );
    }

    #[test]
    fn does_not_split_on_decimal_points() {
        let text = "Water boils at 100.5 degrees under pressure. It freezes at zero.";
        let normalized = normalize(text).unwrap();
        assert_eq!(normalized.sentences.len(), 2);
        assert!(normalized.sentences[0].text.contains("100.5"));
    }

    #[test]
    fn tracks_paragraphs() {
        let text = "First paragraph sentence one. Sentence two.\n\nSecond paragraph here.";
        let normalized = normalize(text).unwrap();
        assert_eq!(normalized.sentences[0].paragraph, 0);
        assert_eq!(normalized.sentences[1].paragraph, 0);
        assert_eq!(normalized.sentences[2].paragraph, 1);
        assert_eq!(normalized.sentences[2].index, 2);
    }

    #[test]
    fn empty_input_is_missing_content() {
        assert!(matches!(normalize(""), Err(QuizError::MissingContent)));
        assert!(matches!(normalize("   \n\t  "), Err(QuizError::MissingContent)));
    }

    #[test]
    fn trailing_fragment_without_punctuation_kept() {
        let normalized = normalize("A full sentence. and a trailing fragment").unwrap();
        assert_eq!(normalized.sentences.len(), 2);
        assert_eq!(normalized.sentences[1].text, "and a trailing fragment");
    }

    #[test]
    fn statement_quality_filter() {
        assert!(is_statement_quality(
            "Photosynthesis produces oxygen as a byproduct."
        ));
        assert!(!is_statement_quality("Too short."));
        assert!(!is_statement_quality(
            "lowercase start is rejected even when long enough."
        ));
        assert!(!is_statement_quality(
            "No terminal punctuation even though this is long enough"
        ));
    }
}
