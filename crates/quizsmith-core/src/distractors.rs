//! Distractor generation and ranking.
//!
//! Builds a pool of plausible-but-wrong options per multiple-choice
//! candidate, filters near-duplicates of the correct answer, then ranks
//! either by semantic similarity (embedding capability present) or by
//! rule-based heuristics. A distractor should sit close to the correct
//! answer topically without ever paraphrasing it.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{Distractor, Fact, QuestionCandidate};
use crate::normalize::NormalizedText;
use crate::traits::{cosine_similarity, SentenceEmbedder};

/// How many distractors a four-option question needs.
pub const TARGET_DISTRACTORS: usize = 3;

/// Similarity ceiling: anything above this reads as a paraphrase of the
/// correct answer and would risk a second correct option.
const PARAPHRASE_CEILING: f32 = 0.9;

/// Token-overlap ratio above which two options count as near-duplicates.
const NEAR_DUPLICATE_OVERLAP: f64 = 0.7;

static CLAUSE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)\bbecause\s+(.{20,180}?)[.!?]*$").unwrap(),
        Regex::new(r"(?i)\bsince\s+(.{20,180}?)[.!?]*$").unwrap(),
        Regex::new(r"(?i),\s+which\s+(.{20,180}?)[.!?]*$").unwrap(),
    ]
});

/// Category-appropriate stock fillers, used only when the lesson itself
/// cannot supply enough wrong-but-topical options.
const STOCK_FILLERS: [&str; 6] = [
    "a temporary effect that only appears under rare laboratory conditions",
    "an outdated idea that later research has completely replaced",
    "a process that requires specialized equipment to observe directly",
    "something that changes unpredictably with outside conditions",
    "None of the above",
    "All of the above",
];

#[derive(Debug, Clone)]
struct PoolEntry {
    text: String,
    sentence_index: Option<usize>,
}

fn normalized_tokens(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Token-overlap similarity (Jaccard) between two option texts.
fn overlap_ratio(a: &str, b: &str) -> f64 {
    let ta = normalized_tokens(a);
    let tb = normalized_tokens(b);
    if ta.is_empty() || tb.is_empty() {
        return 0.0;
    }
    let intersection = ta.intersection(&tb).count() as f64;
    let union = ta.union(&tb).count() as f64;
    intersection / union
}

fn is_near_duplicate(a: &str, b: &str) -> bool {
    let na = a.trim().to_lowercase();
    let nb = b.trim().to_lowercase();
    na == nb || overlap_ratio(a, b) > NEAR_DUPLICATE_OVERLAP
}

/// Minimum shape for an option that has to stand next to a real clause.
fn is_usable_option(text: &str) -> bool {
    let words = text.split_whitespace().count();
    (words >= 3 && text.len() >= 12 && text.len() <= 250)
        || text == "None of the above"
        || text == "All of the above"
}

/// Swap the phrases on either side of the first directional preposition,
/// producing a near-miss of the correct answer ("convert sunlight into
/// energy" becomes "convert energy into sunlight").
fn swap_near_miss(text: &str) -> Option<String> {
    for prep in [" into ", " from ", " toward ", " to "] {
        if let Some(pos) = text.find(prep) {
            let left = &text[..pos];
            let right = &text[pos + prep.len()..];
            let mut left_words: Vec<&str> = left.split_whitespace().collect();
            if left_words.len() < 2 || right.trim().is_empty() {
                continue;
            }
            let tail = left_words.pop().unwrap_or_default();
            let swapped = format!(
                "{} {}{}{}",
                left_words.join(" "),
                right.trim_end_matches(['.', '!', '?']),
                prep,
                tail
            );
            return Some(swapped);
        }
    }
    None
}

fn build_pool(
    candidate: &QuestionCandidate,
    facts: &[Fact],
    normalized: &NormalizedText,
) -> Vec<PoolEntry> {
    let correct = &candidate.correct_answer_text;
    let own_subject = candidate
        .supporting_fact
        .as_ref()
        .map(|f| f.subject.to_lowercase());
    let mut pool: Vec<PoolEntry> = Vec::new();
    let mut push = |text: String, sentence_index: Option<usize>, pool: &mut Vec<PoolEntry>| {
        if !is_usable_option(&text) || is_near_duplicate(&text, correct) {
            return;
        }
        if pool.iter().any(|p| is_near_duplicate(&p.text, &text)) {
            return;
        }
        pool.push(PoolEntry {
            text,
            sentence_index,
        });
    };

    // Other facts' object clauses, skipping facts about the same subject.
    for fact in facts {
        if own_subject.as_deref() == Some(fact.subject.to_lowercase().as_str()) {
            continue;
        }
        push(fact.object.clone(), Some(fact.sentence_index), &mut pool);
    }

    // Near-miss transformation of the correct answer itself.
    if let Some(swapped) = swap_near_miss(correct) {
        push(swapped, Some(candidate.sentence_index), &mut pool);
    }

    // Subordinate clauses mined from other sentences.
    for sentence in &normalized.sentences {
        if sentence.index == candidate.sentence_index {
            continue;
        }
        for pattern in CLAUSE_PATTERNS.iter() {
            if let Some(caps) = pattern.captures(&sentence.text) {
                push(caps[1].trim().to_string(), Some(sentence.index), &mut pool);
                break;
            }
        }
    }

    // Stock fillers last: only reached when the lesson ran dry.
    for filler in STOCK_FILLERS {
        push(filler.to_string(), None, &mut pool);
    }

    pool
}

/// Heuristic ranking for rule-only mode: prefer options from the same
/// paragraph and of similar length to the correct answer.
fn heuristic_rank(
    pool: Vec<PoolEntry>,
    candidate: &QuestionCandidate,
    normalized: &NormalizedText,
) -> Vec<Distractor> {
    let own_paragraph = normalized
        .sentences
        .get(candidate.sentence_index)
        .map(|s| s.paragraph);
    let correct_len = candidate.correct_answer_text.len() as f64;

    let mut scored: Vec<Distractor> = pool
        .into_iter()
        .map(|entry| {
            let mut score = 1.0;
            let paragraph = entry
                .sentence_index
                .and_then(|i| normalized.sentences.get(i))
                .map(|s| s.paragraph);
            if paragraph.is_some() && paragraph == own_paragraph {
                score += 0.5;
            }
            let len = entry.text.len() as f64;
            score += 1.0 - (len - correct_len).abs() / len.max(correct_len);
            Distractor {
                text: entry.text,
                rank_score: score,
            }
        })
        .collect();

    // Stable sort keeps pool order (lesson material before fillers) on ties.
    scored.sort_by(|a, b| b.rank_score.total_cmp(&a.rank_score));
    scored.truncate(TARGET_DISTRACTORS);
    scored
}

/// Embedding-based ranking: most similar to the correct answer wins, with a
/// ceiling that excludes near-paraphrases.
fn embedding_rank(
    pool: Vec<PoolEntry>,
    correct: &str,
    embedder: &dyn SentenceEmbedder,
) -> Option<Vec<Distractor>> {
    let mut texts: Vec<&str> = Vec::with_capacity(pool.len() + 1);
    texts.push(correct);
    texts.extend(pool.iter().map(|p| p.text.as_str()));

    let embeddings = match embedder.embed(&texts) {
        Ok(vectors) if vectors.len() == texts.len() => vectors,
        Ok(_) => {
            tracing::warn!("embedder returned wrong vector count, using heuristic ranking");
            return None;
        }
        Err(e) => {
            tracing::warn!("embedding failed, using heuristic ranking: {e}");
            return None;
        }
    };

    let correct_vec = &embeddings[0];
    let mut scored: Vec<Distractor> = pool
        .into_iter()
        .zip(embeddings[1..].iter())
        .filter_map(|(entry, vec)| {
            let sim = cosine_similarity(correct_vec, vec);
            if sim >= PARAPHRASE_CEILING {
                return None;
            }
            Some(Distractor {
                text: entry.text,
                rank_score: f64::from(sim),
            })
        })
        .collect();

    scored.sort_by(|a, b| b.rank_score.total_cmp(&a.rank_score));
    scored.truncate(TARGET_DISTRACTORS);
    Some(scored)
}

/// Generate ranked distractors for one multiple-choice candidate.
///
/// Returns up to [`TARGET_DISTRACTORS`]; fewer only when the pool is
/// exhausted. Embedding failures silently fall back to heuristics.
pub fn generate_distractors(
    candidate: &QuestionCandidate,
    facts: &[Fact],
    normalized: &NormalizedText,
    embedder: Option<&dyn SentenceEmbedder>,
) -> Vec<Distractor> {
    let pool = build_pool(candidate, facts, normalized);
    if pool.is_empty() {
        return Vec::new();
    }

    if let Some(embedder) = embedder {
        if let Some(ranked) =
            embedding_rank(pool.clone(), &candidate.correct_answer_text, embedder)
        {
            return ranked;
        }
    }

    heuristic_rank(pool, candidate, normalized)
}
