//! quizsmith-core — Quiz generation engine, data model, and capability traits.
//!
//! This crate defines the fundamental types and the full generation pipeline
//! that the rest of the quizsmith system builds on: text normalization,
//! concept and fact extraction, question templating, distractor generation,
//! and quiz assembly.

pub mod assembler;
pub mod concepts;
pub mod distractors;
pub mod engine;
pub mod error;
pub mod facts;
pub mod model;
pub mod normalize;
pub mod templates;
pub mod traits;
