//! Capability resolution.
//!
//! Each optional capability is probed by loading its model file. Probing
//! happens at most once per process: the outcome (including a failure) is
//! cached, a failed probe logs one warning, and the capability stays disabled
//! until restart. Lesson-level generation never re-probes.

use std::sync::Arc;

use once_cell::sync::OnceCell;

use quizsmith_core::engine::{GeneratedQuiz, GeneratorConfig, QuizEngine};
use quizsmith_core::error::QuizError;
use quizsmith_core::traits::Capabilities;

use crate::config::{load_config, QuizsmithConfig};
use crate::embedding::VocabEmbedder;
use crate::lexicon::LexiconAnalyzer;
use crate::rewriter::RuleRewriter;

static RESOLVED: OnceCell<Capabilities> = OnceCell::new();

/// Probe all capabilities for the given config, without caching.
///
/// Prefer [`resolve_capabilities`] outside of tests; repeated probing of a
/// missing model would log the same warning on every call.
pub fn probe_capabilities(config: &QuizsmithConfig) -> Capabilities {
    let mut capabilities = Capabilities::none();

    match LexiconAnalyzer::load(&config.lexicon()) {
        Ok(analyzer) => {
            tracing::debug!(path = %config.lexicon().display(), "syntactic analysis enabled");
            capabilities.syntactic = Some(Arc::new(analyzer));
        }
        Err(e) => {
            tracing::warn!(error = %e, "syntactic analysis disabled");
        }
    }

    match VocabEmbedder::load(&config.vocab()) {
        Ok(embedder) => {
            tracing::debug!(path = %config.vocab().display(), "embedding enabled");
            capabilities.embedding = Some(Arc::new(embedder));
        }
        Err(e) => {
            tracing::warn!(error = %e, "embedding disabled");
        }
    }

    match RuleRewriter::load(&config.rewrite_rules()) {
        Ok(rewriter) => {
            tracing::debug!(path = %config.rewrite_rules().display(), "stem rewriting enabled");
            capabilities.rewriting = Some(Arc::new(rewriter));
        }
        Err(e) => {
            tracing::warn!(error = %e, "stem rewriting disabled");
        }
    }

    capabilities
}

/// Resolve capabilities once per process.
///
/// The first caller's config decides the outcome; later calls get the cached
/// bundle. Providers are shared read-only behind `Arc`.
pub fn resolve_capabilities(config: &QuizsmithConfig) -> Capabilities {
    RESOLVED.get_or_init(|| probe_capabilities(config)).clone()
}

/// One-call quiz generation with ambient configuration.
///
/// Loads `quizsmith.toml` (falling back to defaults), resolves capabilities
/// when `use_ml` is set, and runs the engine with default settings.
pub fn generate_quiz(
    text: &str,
    num_questions: usize,
    use_ml: bool,
) -> Result<GeneratedQuiz, QuizError> {
    let config = load_config().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "config load failed, using defaults");
        QuizsmithConfig::default()
    });
    let capabilities = if use_ml {
        resolve_capabilities(&config)
    } else {
        Capabilities::none()
    };
    let engine = QuizEngine::new(
        GeneratorConfig {
            use_ml,
            ..GeneratorConfig::default()
        },
        capabilities,
    );
    engine.generate(text, num_questions)
}
