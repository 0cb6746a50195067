//! Vocabulary-weighted sentence embedding.
//!
//! The model file is a JSON object mapping lowercase tokens to idf-style
//! weights. A sentence embeds as a hashed bag of tokens: each token adds its
//! weight (1.0 when out of vocabulary) to one bucket of a fixed-dimension
//! vector. Cheap, deterministic, and good enough to separate paraphrases
//! from unrelated clauses.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::path::Path;

use quizsmith_core::error::CapabilityError;
use quizsmith_core::traits::SentenceEmbedder;

/// Embedding dimension. Small enough to stay cache-friendly, large enough
/// that distinct content words rarely collide.
const DIMENSION: usize = 256;

/// Weight for tokens absent from the vocabulary.
const DEFAULT_WEIGHT: f32 = 1.0;

/// A sentence embedder backed by a token weight vocabulary.
#[derive(Debug)]
pub struct VocabEmbedder {
    weights: HashMap<String, f32>,
}

impl VocabEmbedder {
    /// Load the vocabulary from a JSON model file.
    pub fn load(path: &Path) -> Result<Self, CapabilityError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CapabilityError::ModelUnavailable(format!("{}: {e}", path.display()))
        })?;
        let weights: HashMap<String, f32> =
            serde_json::from_str(&content).map_err(|e| CapabilityError::MalformedModel {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        if weights.is_empty() {
            return Err(CapabilityError::MalformedModel {
                path: path.display().to_string(),
                message: "vocabulary is empty".into(),
            });
        }
        Ok(Self {
            weights: weights
                .into_iter()
                .map(|(w, v)| (w.to_lowercase(), v))
                .collect(),
        })
    }

    fn bucket(token: &str) -> usize {
        let mut hasher = DefaultHasher::new();
        token.hash(&mut hasher);
        (hasher.finish() % DIMENSION as u64) as usize
    }
}

impl SentenceEmbedder for VocabEmbedder {
    fn name(&self) -> &str {
        "vocab"
    }

    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, CapabilityError> {
        Ok(texts
            .iter()
            .map(|text| {
                let mut vector = vec![0.0f32; DIMENSION];
                for token in text
                    .to_lowercase()
                    .split(|c: char| !c.is_alphanumeric() && c != '\'')
                    .filter(|t| !t.is_empty())
                {
                    let weight = self.weights.get(token).copied().unwrap_or(DEFAULT_WEIGHT);
                    vector[Self::bucket(token)] += weight;
                }
                vector
            })
            .collect())
    }
}
