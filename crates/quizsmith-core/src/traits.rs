//! Capability trait definitions for optional analysis backends.
//!
//! These traits are implemented by the `quizsmith-providers` crate. The
//! pipeline never asks "is this library importable"; it receives a resolved
//! [`Capabilities`] bundle and branches on which slots are populated.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::CapabilityError;

// ---------------------------------------------------------------------------
// Syntactic analysis
// ---------------------------------------------------------------------------

/// A named entity found by the syntactic analyzer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedEntity {
    /// Entity text as it appears in the lesson.
    pub text: String,
    /// Coarse label (e.g. "PROPER", "PLACE").
    pub label: String,
}

/// Annotations produced by one syntactic analysis pass over a text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyntacticAnnotations {
    /// Noun phrases, in document order.
    pub noun_phrases: Vec<String>,
    /// Named entities, in document order.
    pub entities: Vec<NamedEntity>,
    /// Single nouns judged important (frequent, content-bearing).
    pub key_nouns: Vec<String>,
}

/// Trait for syntactic-analysis backends used to enrich concept extraction.
pub trait SyntacticAnalyzer: Send + Sync {
    /// Human-readable backend name (e.g. "lexicon").
    fn name(&self) -> &str;

    /// Analyze a full lesson text.
    fn analyze(&self, text: &str) -> Result<SyntacticAnnotations, CapabilityError>;
}

// ---------------------------------------------------------------------------
// Sentence embedding
// ---------------------------------------------------------------------------

/// Trait for sentence-embedding backends used to rank distractors.
///
/// Implementations must be deterministic: the same input yields the same
/// vectors for the process lifetime. Model weights are read-only after load.
pub trait SentenceEmbedder: Send + Sync {
    /// Human-readable backend name.
    fn name(&self) -> &str;

    /// Embed each text into a fixed-dimension vector.
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, CapabilityError>;
}

/// Cosine similarity between two embedding vectors.
///
/// Returns 0.0 for mismatched dimensions or zero-magnitude inputs rather
/// than propagating an error; a useless similarity just loses one ranking
/// signal.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

// ---------------------------------------------------------------------------
// Stem rewriting
// ---------------------------------------------------------------------------

/// Trait for generative stem-rewriting backends.
///
/// Rewrites must preserve meaning; the engine validates the output shape and
/// silently keeps the templated stem on any failure.
pub trait StemRewriter: Send + Sync {
    /// Human-readable backend name.
    fn name(&self) -> &str;

    /// Rewrite a templated question stem into more natural phrasing.
    fn rewrite(&self, stem: &str) -> Result<String, CapabilityError>;
}

// ---------------------------------------------------------------------------
// Resolved capability bundle
// ---------------------------------------------------------------------------

/// The set of optional capabilities resolved for a generation run.
///
/// Each slot is `Some` only when the corresponding probe succeeded and the
/// caller asked for hybrid mode. Providers are shared read-only across
/// requests.
#[derive(Clone, Default)]
pub struct Capabilities {
    /// Syntactic analysis (noun phrases, entities) for concept extraction.
    pub syntactic: Option<Arc<dyn SyntacticAnalyzer>>,
    /// Semantic-similarity embedding for distractor ranking.
    pub embedding: Option<Arc<dyn SentenceEmbedder>>,
    /// Generative rewriting for definition/relationship stems.
    pub rewriting: Option<Arc<dyn StemRewriter>>,
}

impl Capabilities {
    /// No capabilities: forces deterministic rule-only behavior.
    pub fn none() -> Self {
        Self::default()
    }

    /// True if no optional capability is populated.
    pub fn is_empty(&self) -> bool {
        self.syntactic.is_none() && self.embedding.is_none() && self.rewriting.is_none()
    }
}

impl std::fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capabilities")
            .field("syntactic", &self.syntactic.as_ref().map(|p| p.name()))
            .field("embedding", &self.embedding.as_ref().map(|p| p.name()))
            .field("rewriting", &self.rewriting.as_ref().map(|p| p.name()))
            .finish()
    }
}
