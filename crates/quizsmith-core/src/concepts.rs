//! Rule-based concept extraction, optionally enriched by syntactic analysis.
//!
//! Each surface signal contributes an independent additive score; candidates
//! are merged by normalized text, so a term that is both capitalized and
//! frequently repeated outranks one with a single signal. Ordering is
//! deterministic: descending score, ties broken by first occurrence.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{Concept, ConceptOrigin};
use crate::normalize::NormalizedText;
use crate::traits::SyntacticAnalyzer;

/// Words that never stand alone as concepts or subjects.
pub static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "this", "that", "with", "from", "when", "what", "where", "which", "there",
        "their", "these", "those", "have", "has", "had", "will", "would", "could", "should",
        "more", "most", "very", "also", "just", "only", "about", "some", "such", "into",
        "through", "during", "before", "after", "above", "below", "between", "under",
        "again", "each", "other", "being", "been", "both", "same", "they", "them", "because",
        "it", "its",
    ]
    .into_iter()
    .collect()
});

static CAPITALIZED_SEQUENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+){0,3}\b").unwrap());
static QUOTED_TERM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""([^"]{3,40})"|'([^']{3,40})'"#).unwrap());
static DEFINED_SUBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([A-Z][A-Za-z][A-Za-z ]{0,34}?)\s+(?:is|are)\s+(?:a|an|the)\s").unwrap());
static LOWERCASE_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[a-z]{4,}\b").unwrap());
static LEADING_ARTICLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(?:the|a|an)\s+").unwrap());

// Signal weights. Quoted and entity signals carry the strongest intent;
// raw frequency is the weakest.
const WEIGHT_CAPITALIZED: f64 = 2.0;
const WEIGHT_QUOTED: f64 = 3.0;
const WEIGHT_DEFINED: f64 = 4.0;
const WEIGHT_FREQUENT: f64 = 1.0;
const WEIGHT_NOUN_PHRASE: f64 = 2.0;
const WEIGHT_ENTITY: f64 = 5.0;
const WEIGHT_KEY_NOUN: f64 = 1.0;

/// Minimum repetitions before a plain lowercase word counts as a signal.
const FREQUENCY_THRESHOLD: usize = 2;

/// Maximum concepts returned per lesson.
const MAX_CONCEPTS: usize = 20;

/// Strip leading articles and trailing punctuation, then capitalize.
pub fn clean_subject(subject: &str) -> String {
    let stripped = LEADING_ARTICLE.replace(subject.trim(), "");
    let stripped = stripped.trim_end_matches(['.', ',', ';', ':']).trim();
    let mut chars = stripped.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Whether a cleaned term can serve as a concept or question subject.
pub fn is_valid_subject(subject: &str) -> bool {
    let lower = subject.trim().to_lowercase();
    if lower.len() < 2 || lower.len() > 50 {
        return false;
    }
    if STOP_WORDS.contains(lower.as_str()) {
        return false;
    }
    const INVALID_STARTERS: [&str; 13] = [
        "the ", "a ", "an ", "this ", "that ", "in ", "on ", "at ", "by ", "for ", "of ",
        "to ", "from ",
    ];
    if INVALID_STARTERS.iter().any(|s| lower.starts_with(s)) {
        return false;
    }
    const INVALID_ENDERS: [&str; 7] = [" and", " or", " but", " of", " in", " on", " at"];
    if INVALID_ENDERS.iter().any(|e| lower.ends_with(e)) {
        return false;
    }
    subject.chars().any(|c| c.is_alphabetic())
}

struct ConceptPool<'a> {
    merged: IndexMap<String, Concept>,
    normalized: &'a NormalizedText,
}

impl<'a> ConceptPool<'a> {
    fn new(normalized: &'a NormalizedText) -> Self {
        Self {
            merged: IndexMap::new(),
            normalized,
        }
    }

    fn add(&mut self, raw: &str, weight: f64, origin: ConceptOrigin) {
        let text = clean_subject(raw);
        if !is_valid_subject(&text) {
            return;
        }
        let key = Concept::normalized_key(&text);
        if let Some(existing) = self.merged.get_mut(&key) {
            existing.score += weight;
            return;
        }
        let first_sentence = self
            .normalized
            .sentences
            .iter()
            .find(|s| s.text.to_lowercase().contains(&key))
            .map(|s| s.index);
        self.merged.insert(
            key,
            Concept {
                text,
                score: weight,
                origin,
                first_sentence,
            },
        );
    }

    fn into_ranked(self) -> Vec<Concept> {
        let mut concepts: Vec<Concept> = self.merged.into_values().collect();
        // Stable sort: insertion order (first occurrence) breaks ties.
        concepts.sort_by(|a, b| b.score.total_cmp(&a.score));
        concepts.truncate(MAX_CONCEPTS);
        concepts
    }
}

/// Extract ranked, deduplicated concepts from normalized lesson text.
///
/// The syntactic capability, when present, contributes additional candidates;
/// a failing analysis pass is absorbed and logged, never fatal.
pub fn extract_concepts(
    normalized: &NormalizedText,
    syntactic: Option<&dyn SyntacticAnalyzer>,
) -> Vec<Concept> {
    let text = normalized.joined();
    let mut pool = ConceptPool::new(normalized);

    for m in CAPITALIZED_SEQUENCE.find_iter(&text) {
        pool.add(m.as_str(), WEIGHT_CAPITALIZED, ConceptOrigin::Rule);
    }

    for caps in QUOTED_TERM.captures_iter(&text) {
        if let Some(term) = caps.get(1).or_else(|| caps.get(2)) {
            pool.add(term.as_str(), WEIGHT_QUOTED, ConceptOrigin::Rule);
        }
    }

    for caps in DEFINED_SUBJECT.captures_iter(&text) {
        pool.add(&caps[1], WEIGHT_DEFINED, ConceptOrigin::Rule);
    }

    let mut frequencies: HashMap<String, usize> = HashMap::new();
    let mut first_forms: Vec<String> = Vec::new();
    for m in LOWERCASE_WORD.find_iter(&text) {
        let word = m.as_str().to_string();
        if STOP_WORDS.contains(word.as_str()) {
            continue;
        }
        let count = frequencies.entry(word.clone()).or_insert(0);
        if *count == 0 {
            first_forms.push(word);
        }
        *count += 1;
    }
    for word in &first_forms {
        let count = frequencies[word];
        if count >= FREQUENCY_THRESHOLD {
            pool.add(word, WEIGHT_FREQUENT * count as f64, ConceptOrigin::Rule);
        }
    }

    if let Some(analyzer) = syntactic {
        match analyzer.analyze(&text) {
            Ok(annotations) => {
                for phrase in &annotations.noun_phrases {
                    pool.add(phrase, WEIGHT_NOUN_PHRASE, ConceptOrigin::Syntactic);
                }
                for entity in &annotations.entities {
                    pool.add(&entity.text, WEIGHT_ENTITY, ConceptOrigin::Syntactic);
                }
                for noun in &annotations.key_nouns {
                    pool.add(noun, WEIGHT_KEY_NOUN, ConceptOrigin::Syntactic);
                }
            }
            Err(e) => {
                tracing::warn!("syntactic analysis failed, continuing rule-only: {e}");
            }
        }
    }

    pool.into_ranked()
}
