//! Lexicon-backed syntactic analysis.
//!
//! The model file is a JSON object mapping lowercase words to coarse
//! part-of-speech tags (`NOUN`, `ADJ`, `VERB`, `DET`, ...). Analysis is a
//! single left-to-right chunking pass: adjective/determiner runs ending in
//! nouns become noun phrases, capitalized token runs become entities, and
//! repeated lexicon nouns become key nouns.

use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use quizsmith_core::error::CapabilityError;
use quizsmith_core::traits::{NamedEntity, SyntacticAnalyzer, SyntacticAnnotations};

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z][\w'-]*").unwrap());

/// Longest token run kept as a single noun phrase or entity.
const MAX_SPAN_WORDS: usize = 4;

/// Minimum mention count for a noun to qualify as a key noun.
const KEY_NOUN_THRESHOLD: usize = 2;

/// A syntactic analyzer driven by a word-to-tag lexicon file.
#[derive(Debug)]
pub struct LexiconAnalyzer {
    tags: HashMap<String, String>,
}

impl LexiconAnalyzer {
    /// Load the lexicon from a JSON model file.
    pub fn load(path: &Path) -> Result<Self, CapabilityError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CapabilityError::ModelUnavailable(format!("{}: {e}", path.display()))
        })?;
        let tags: HashMap<String, String> =
            serde_json::from_str(&content).map_err(|e| CapabilityError::MalformedModel {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        if tags.is_empty() {
            return Err(CapabilityError::MalformedModel {
                path: path.display().to_string(),
                message: "lexicon is empty".into(),
            });
        }
        Ok(Self {
            tags: tags
                .into_iter()
                .map(|(w, t)| (w.to_lowercase(), t.to_uppercase()))
                .collect(),
        })
    }

    fn tag(&self, word: &str) -> Option<&str> {
        self.tags.get(&word.to_lowercase()).map(String::as_str)
    }

    fn is_noun(&self, word: &str) -> bool {
        self.tag(word) == Some("NOUN")
    }

    fn is_modifier(&self, word: &str) -> bool {
        matches!(self.tag(word), Some("ADJ") | Some("DET"))
    }
}

fn is_capitalized(word: &str) -> bool {
    word.len() >= 2 && word.chars().next().is_some_and(|c| c.is_uppercase())
}

impl SyntacticAnalyzer for LexiconAnalyzer {
    fn name(&self) -> &str {
        "lexicon"
    }

    fn analyze(&self, text: &str) -> Result<SyntacticAnnotations, CapabilityError> {
        let tokens: Vec<&str> = WORD.find_iter(text).map(|m| m.as_str()).collect();

        let mut annotations = SyntacticAnnotations::default();
        let mut noun_counts: HashMap<String, usize> = HashMap::new();

        // Noun phrase chunking: modifier* noun+ runs.
        let mut i = 0;
        while i < tokens.len() {
            let start = i;
            while i < tokens.len() && self.is_modifier(tokens[i]) {
                i += 1;
            }
            let noun_start = i;
            while i < tokens.len() && self.is_noun(tokens[i]) {
                *noun_counts
                    .entry(tokens[i].to_lowercase())
                    .or_default() += 1;
                i += 1;
            }
            if i > noun_start && i - start <= MAX_SPAN_WORDS {
                // At least one modifier or a multi-noun compound; single bare
                // nouns are handled by the key noun count instead.
                if i - start >= 2 {
                    annotations.noun_phrases.push(tokens[start..i].join(" "));
                }
            }
            if i == start {
                i += 1;
            }
        }

        // Entities: runs of capitalized tokens.
        let mut i = 0;
        while i < tokens.len() {
            if !is_capitalized(tokens[i]) {
                i += 1;
                continue;
            }
            let start = i;
            while i < tokens.len() && is_capitalized(tokens[i]) && i - start < MAX_SPAN_WORDS {
                i += 1;
            }
            annotations.entities.push(NamedEntity {
                text: tokens[start..i].join(" "),
                label: "PROPER".into(),
            });
        }

        annotations.key_nouns = noun_counts
            .into_iter()
            .filter(|(_, count)| *count >= KEY_NOUN_THRESHOLD)
            .map(|(noun, _)| noun)
            .collect();
        annotations.key_nouns.sort();

        Ok(annotations)
    }
}
