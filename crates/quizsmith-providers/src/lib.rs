//! quizsmith-providers — File-backed analysis model providers.
//!
//! Implements the capability traits from `quizsmith-core` over plain JSON
//! model files, plus the resolver that probes them once per process and the
//! configuration that locates them.

pub mod config;
pub mod embedding;
pub mod lexicon;
pub mod mock;
pub mod resolver;
pub mod rewriter;

pub use config::{load_config, load_config_from, QuizsmithConfig};
pub use embedding::VocabEmbedder;
pub use lexicon::LexiconAnalyzer;
pub use resolver::{generate_quiz, probe_capabilities, resolve_capabilities};
pub use rewriter::RuleRewriter;
