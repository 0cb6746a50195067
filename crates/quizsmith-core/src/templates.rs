//! Question templating: facts and concepts become question candidates.
//!
//! Multiple-choice stems come from facts (and from high-scoring concepts that
//! never produced a fact); true/false statements are sampled from facts with
//! confidence weighting, with a coin flip deciding whether the statement is
//! negated by template substitution. All randomness flows through the caller's
//! seeded RNG.

use std::collections::HashSet;

use rand::distributions::WeightedIndex;
use rand::prelude::*;

use crate::model::{Concept, Fact, QuestionCandidate, QuestionCategory, RelationKind};
use crate::normalize::{is_statement_quality, NormalizedText};

/// Negation substitutions, applied first-match-wins to make a statement false.
const NEGATIONS: [(&str, &str); 14] = [
    (" is not ", " is "),
    (" are not ", " are "),
    (" is ", " is not "),
    (" are ", " are not "),
    (" causes ", " does not cause "),
    (" leads to ", " does not lead to "),
    (" results in ", " does not result in "),
    (" produces ", " does not produce "),
    (" affects ", " does not affect "),
    (" depends on ", " does not depend on "),
    (" contains ", " does not contain "),
    (" includes ", " does not include "),
    (" always ", " never "),
    (" increases ", " decreases "),
];

/// Attempt a template-driven negation of a statement.
///
/// Returns `None` when no substitution applies; the caller keeps the
/// statement true in that case.
pub fn negate_statement(statement: &str) -> Option<String> {
    for (from, to) in NEGATIONS {
        if statement.contains(from) {
            return Some(statement.replacen(from, to, 1));
        }
    }
    None
}

/// The first few words of a clause, for embedding an object into a stem.
/// Trailing function words are dropped so stems don't end mid-phrase.
fn clause_head(clause: &str) -> String {
    const DANGLERS: [&str; 12] = [
        "to", "of", "in", "on", "at", "and", "or", "the", "a", "an", "with", "for",
    ];
    let mut words: Vec<&str> = clause.split_whitespace().take(3).collect();
    while let Some(last) = words.last() {
        let bare = last.trim_end_matches([',', ';', '.']);
        if DANGLERS.contains(&bare) {
            words.pop();
        } else {
            break;
        }
    }
    words
        .join(" ")
        .trim_end_matches([',', ';', '.'])
        .to_string()
}

/// The predicate of a fact's source sentence: everything after the subject.
///
/// Falls back to the object clause when the sentence does not open with the
/// subject (e.g. after article stripping).
fn relation_clause(fact: &Fact) -> String {
    let sentence = fact.source_sentence.trim_end_matches(['.', '!', '?']);
    let lower = sentence.to_lowercase();
    let subject_lower = fact.subject.to_lowercase();

    for prefix in ["", "the ", "a ", "an "] {
        let opener = format!("{prefix}{subject_lower} ");
        if lower.starts_with(&opener) {
            return sentence[opener.len()..].trim().to_string();
        }
    }
    fact.object.clone()
}

fn truefalse_stem(statement: &str) -> String {
    let trimmed = statement.trim_end_matches('.');
    format!("True or False: {trimmed}?")
}

/// Build deduplicated question candidates from extraction output.
///
/// Emits every distinct multiple-choice candidate the facts and concepts
/// support, plus up to `num_questions` true/false candidates. Short supply is
/// not an error; the assembler copes with whatever is produced.
pub fn build_candidates<R: Rng>(
    facts: &[Fact],
    concepts: &[Concept],
    normalized: &NormalizedText,
    num_questions: usize,
    rng: &mut R,
) -> Vec<QuestionCandidate> {
    let mut candidates = Vec::new();
    let mut seen_stems: HashSet<String> = HashSet::new();
    let mut push = |candidate: QuestionCandidate, seen: &mut HashSet<String>| {
        if seen.insert(candidate.stem_text.to_lowercase()) {
            candidates.push(candidate);
        }
    };

    // Multiple-choice candidates from facts.
    for fact in facts {
        let (category, stem, correct) = match fact.relation {
            RelationKind::Definition => (
                QuestionCategory::Definition,
                format!("What is {}?", fact.subject),
                fact.object.clone(),
            ),
            RelationKind::Relationship => (
                QuestionCategory::Relationship,
                format!(
                    "How does {} relate to {}?",
                    fact.subject,
                    clause_head(&fact.object)
                ),
                relation_clause(fact),
            ),
            RelationKind::CauseEffect => (
                QuestionCategory::Factual,
                format!("What does {} lead to?", fact.subject),
                fact.object.clone(),
            ),
        };
        push(
            QuestionCandidate {
                category,
                stem_text: stem,
                correct_answer_text: correct,
                supporting_fact: Some(fact.clone()),
                truth: None,
                sentence_index: fact.sentence_index,
            },
            &mut seen_stems,
        );
    }

    // Concept candidates for high scorers that never produced a fact.
    let fact_subjects: HashSet<String> =
        facts.iter().map(|f| f.subject.to_lowercase()).collect();
    for concept in concepts {
        if fact_subjects.contains(&concept.text.to_lowercase()) {
            continue;
        }
        let Some(sentence_index) = concept.first_sentence else {
            continue;
        };
        let sentence = &normalized.sentences[sentence_index];
        if !is_statement_quality(&sentence.text) {
            continue;
        }
        push(
            QuestionCandidate {
                category: QuestionCategory::Factual,
                stem_text: format!(
                    "According to the lesson, what is true about {}?",
                    concept.text
                ),
                correct_answer_text: sentence.text.clone(),
                supporting_fact: None,
                truth: None,
                sentence_index: sentence.index,
            },
            &mut seen_stems,
        );
    }

    // True/false candidates: confidence-weighted sampling without
    // replacement, coin flip per pick for negation.
    let mut remaining: Vec<&Fact> = facts.iter().collect();
    let mut produced_tf = 0usize;
    while produced_tf < num_questions && !remaining.is_empty() {
        let weights: Vec<f64> = remaining.iter().map(|f| f.confidence).collect();
        let idx = match WeightedIndex::new(&weights) {
            Ok(dist) => dist.sample(rng),
            Err(_) => 0,
        };
        let fact = remaining.swap_remove(idx);

        let statement = fact.source_sentence.clone();
        let (text, truth) = if rng.gen_bool(0.5) {
            match negate_statement(&statement) {
                Some(negated) => (negated, false),
                None => (statement, true),
            }
        } else {
            (statement, true)
        };

        push(
            QuestionCandidate {
                category: QuestionCategory::TruefalseStatement,
                stem_text: truefalse_stem(&text),
                correct_answer_text: if truth { "True".into() } else { "False".into() },
                supporting_fact: Some(fact.clone()),
                truth: Some(truth),
                sentence_index: fact.sentence_index,
            },
            &mut seen_stems,
        );
        produced_tf += 1;
    }

    // Back-fill true/false from quality sentences no fact claimed.
    if produced_tf < num_questions {
        let fact_sentences: HashSet<usize> = facts.iter().map(|f| f.sentence_index).collect();
        for sentence in &normalized.sentences {
            if produced_tf >= num_questions {
                break;
            }
            if fact_sentences.contains(&sentence.index) || !is_statement_quality(&sentence.text)
            {
                continue;
            }
            push(
                QuestionCandidate {
                    category: QuestionCategory::TruefalseStatement,
                    stem_text: truefalse_stem(&sentence.text),
                    correct_answer_text: "True".into(),
                    supporting_fact: None,
                    truth: Some(true),
                    sentence_index: sentence.index,
                },
                &mut seen_stems,
            );
            produced_tf += 1;
        }
    }

    candidates
}
