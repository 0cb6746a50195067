//! The generation pipeline, end to end.
//!
//! [`QuizEngine`] wires the stages together: normalize, extract concepts and
//! facts, template candidates, generate distractors, optionally rewrite stems,
//! and assemble the final quiz. Every random decision draws from one seeded
//! RNG, so a fixed seed and fixed inputs reproduce the same questions
//! regardless of wall clock or process.

use chrono::Utc;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::assembler::{assemble, AssemblyItem};
use crate::concepts::extract_concepts;
use crate::distractors::generate_distractors;
use crate::error::QuizError;
use crate::facts::extract_facts;
use crate::model::{GenerationMode, Quiz, QuizCoverage};
use crate::normalize::normalize;
use crate::templates::build_candidates;
use crate::traits::Capabilities;

/// Seed used when the caller does not supply one. Keeping it fixed makes
/// repeated runs over the same lesson reproducible by default.
const DEFAULT_SEED: u64 = 0x5EED;

/// Longest stem a rewriting backend is allowed to return.
const MAX_REWRITTEN_STEM_LEN: usize = 300;

/// Knobs for one generation run.
#[derive(Debug, Clone, Default)]
pub struct GeneratorConfig {
    /// Enable optional ML-backed steps. When false the capability bundle is
    /// ignored entirely and generation is rule-only.
    pub use_ml: bool,
    /// Rewrite definition/relationship stems through the rewriting
    /// capability, when one is resolved. Off by default.
    pub rewrite_stems: bool,
    /// RNG seed; `None` uses a fixed default.
    pub seed: Option<u64>,
}

/// A finished quiz plus the coverage signal for the run that produced it.
#[derive(Debug, Clone)]
pub struct GeneratedQuiz {
    pub quiz: Quiz,
    pub coverage: QuizCoverage,
}

/// The quiz generation engine.
///
/// Construct once with a config and resolved capabilities, then call
/// [`generate`](QuizEngine::generate) per lesson. The engine holds no
/// per-lesson state.
pub struct QuizEngine {
    config: GeneratorConfig,
    capabilities: Capabilities,
}

impl QuizEngine {
    pub fn new(config: GeneratorConfig, capabilities: Capabilities) -> Self {
        let capabilities = if config.use_ml {
            capabilities
        } else {
            Capabilities::none()
        };
        Self {
            config,
            capabilities,
        }
    }

    /// A rule-only engine with default settings.
    pub fn rule_only() -> Self {
        Self::new(GeneratorConfig::default(), Capabilities::none())
    }

    fn mode(&self) -> GenerationMode {
        if self.config.use_ml && !self.capabilities.is_empty() {
            GenerationMode::Hybrid
        } else {
            GenerationMode::RuleOnly
        }
    }

    /// Check that a rewritten stem is still usable as a question.
    fn rewrite_is_valid(rewritten: &str) -> bool {
        let trimmed = rewritten.trim();
        !trimmed.is_empty() && trimmed.ends_with('?') && trimmed.len() <= MAX_REWRITTEN_STEM_LEN
    }

    /// Generate a quiz from raw lesson text.
    ///
    /// Returns [`QuizError::MissingContent`] only when the text normalizes to
    /// nothing; any other shortfall shows up as partial coverage instead.
    pub fn generate(&self, text: &str, num_questions: usize) -> Result<GeneratedQuiz, QuizError> {
        let normalized = normalize(text)?;
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed.unwrap_or(DEFAULT_SEED));

        let concepts = extract_concepts(&normalized, self.capabilities.syntactic.as_deref());
        let facts = extract_facts(&normalized);
        tracing::debug!(
            sentences = normalized.sentences.len(),
            concepts = concepts.len(),
            facts = facts.len(),
            "extraction complete"
        );

        let mut candidates =
            build_candidates(&facts, &concepts, &normalized, num_questions, &mut rng);

        if self.config.rewrite_stems {
            if let Some(rewriter) = self.capabilities.rewriting.as_deref() {
                for candidate in &mut candidates {
                    if !candidate.category.rewritable() {
                        continue;
                    }
                    match rewriter.rewrite(&candidate.stem_text) {
                        Ok(rewritten) if Self::rewrite_is_valid(&rewritten) => {
                            candidate.stem_text = rewritten;
                        }
                        Ok(rewritten) => {
                            tracing::debug!(
                                stem = %candidate.stem_text,
                                rewritten = %rewritten,
                                "rewritten stem failed validation, keeping template"
                            );
                        }
                        Err(e) => {
                            tracing::debug!(
                                stem = %candidate.stem_text,
                                error = %e,
                                "stem rewrite failed, keeping template"
                            );
                        }
                    }
                }
            }
        }

        let embedder = self.capabilities.embedding.as_deref();
        let items: Vec<AssemblyItem> = candidates
            .into_iter()
            .map(|candidate| {
                let distractors = if candidate.truth.is_some() {
                    Vec::new()
                } else {
                    generate_distractors(&candidate, &facts, &normalized, embedder)
                };
                AssemblyItem {
                    candidate,
                    distractors,
                }
            })
            .collect();

        let questions = assemble(&items, num_questions, &mut rng);
        let coverage = if questions.len() == num_questions {
            QuizCoverage::Full
        } else {
            QuizCoverage::Partial {
                requested: num_questions,
                produced: questions.len(),
            }
        };
        tracing::debug!(
            requested = num_questions,
            produced = questions.len(),
            mode = %self.mode(),
            "quiz assembled"
        );

        Ok(GeneratedQuiz {
            quiz: Quiz {
                questions,
                mode: self.mode(),
                generated_at: Utc::now(),
            },
            coverage,
        })
    }
}
