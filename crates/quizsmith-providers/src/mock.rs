//! Mock capability providers for testing.

use std::sync::atomic::{AtomicU32, Ordering};

use parking_lot::Mutex;

use quizsmith_core::error::CapabilityError;
use quizsmith_core::traits::{
    NamedEntity, SentenceEmbedder, StemRewriter, SyntacticAnalyzer, SyntacticAnnotations,
};

/// A mock syntactic analyzer returning canned annotations.
///
/// Records the number of calls and the last text analyzed so tests can
/// assert the engine consulted the capability.
pub struct MockAnalyzer {
    annotations: SyntacticAnnotations,
    call_count: AtomicU32,
    last_text: Mutex<Option<String>>,
}

impl MockAnalyzer {
    pub fn new(noun_phrases: Vec<&str>, entities: Vec<&str>, key_nouns: Vec<&str>) -> Self {
        Self {
            annotations: SyntacticAnnotations {
                noun_phrases: noun_phrases.into_iter().map(String::from).collect(),
                entities: entities
                    .into_iter()
                    .map(|text| NamedEntity {
                        text: text.to_string(),
                        label: "PROPER".into(),
                    })
                    .collect(),
                key_nouns: key_nouns.into_iter().map(String::from).collect(),
            },
            call_count: AtomicU32::new(0),
            last_text: Mutex::new(None),
        }
    }

    /// An analyzer that finds nothing.
    pub fn empty() -> Self {
        Self::new(vec![], vec![], vec![])
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn last_text(&self) -> Option<String> {
        self.last_text.lock().clone()
    }
}

impl SyntacticAnalyzer for MockAnalyzer {
    fn name(&self) -> &str {
        "mock-analyzer"
    }

    fn analyze(&self, text: &str) -> Result<SyntacticAnnotations, CapabilityError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_text.lock() = Some(text.to_string());
        Ok(self.annotations.clone())
    }
}

/// A mock embedder producing length-based vectors.
///
/// Texts of similar length embed similarly; useful when a test only needs
/// the embedding path exercised, not meaningful semantics.
pub struct MockEmbedder {
    call_count: AtomicU32,
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self {
            call_count: AtomicU32::new(0),
        }
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl SentenceEmbedder for MockEmbedder {
    fn name(&self) -> &str {
        "mock-embedder"
    }

    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, CapabilityError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        Ok(texts
            .iter()
            .map(|t| {
                let words = t.split_whitespace().count() as f32;
                vec![1.0, words, t.len() as f32 / 10.0]
            })
            .collect())
    }
}

/// An embedder that always fails, for degradation tests.
pub struct FailingEmbedder;

impl SentenceEmbedder for FailingEmbedder {
    fn name(&self) -> &str {
        "failing-embedder"
    }

    fn embed(&self, _texts: &[&str]) -> Result<Vec<Vec<f32>>, CapabilityError> {
        Err(CapabilityError::ModelUnavailable(
            "mock embedder is always unavailable".into(),
        ))
    }
}

/// A mock rewriter that prefixes every stem.
pub struct MockRewriter {
    prefix: String,
    call_count: AtomicU32,
}

impl MockRewriter {
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            call_count: AtomicU32::new(0),
        }
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

impl StemRewriter for MockRewriter {
    fn name(&self) -> &str {
        "mock-rewriter"
    }

    fn rewrite(&self, stem: &str) -> Result<String, CapabilityError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        Ok(format!("{} {stem}", self.prefix))
    }
}
