//! End-to-end pipeline tests over realistic lesson texts.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use quizsmith_core::engine::{GeneratorConfig, QuizEngine};
use quizsmith_core::error::{CapabilityError, QuizError};
use quizsmith_core::model::{GenerationMode, QuestionType, QuizCoverage};
use quizsmith_core::traits::{Capabilities, SentenceEmbedder};

const RICH_LESSON: &str = "\
    The water cycle is the continuous movement of water through the environment. \
    Evaporation causes surface water to rise into the atmosphere as vapor. \
    Condensation leads to the formation of clouds high above the ground. \
    Precipitation is the process that returns water to the surface as rain or snow. \
    Transpiration is the release of water vapor from the leaves of plants. \
    Rivers carry runoff water back toward the oceans over many days.\n\n\
    Groundwater is the water stored in soil and rock beneath the surface. \
    Aquifers contain large reserves of fresh water deep underground. \
    Heavy rainfall leads to flooding in low-lying areas near rivers. \
    The sun always drives the water cycle by heating the oceans. \
    Clouds release their moisture when air cools below the dew point. \
    Snowpack stores winter precipitation until spring temperatures melt it.";

const SPARSE_LESSON: &str =
    "Gravity is the force that pulls objects toward the center of the earth.";

/// Deterministic bag-of-words embedder, hashing tokens into a small vector.
struct HashedEmbedder;

impl SentenceEmbedder for HashedEmbedder {
    fn name(&self) -> &str {
        "hashed"
    }

    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, CapabilityError> {
        Ok(texts
            .iter()
            .map(|text| {
                let mut v = vec![0.0f32; 64];
                for token in text.to_lowercase().split_whitespace() {
                    let mut hasher = DefaultHasher::new();
                    token.hash(&mut hasher);
                    v[(hasher.finish() % 64) as usize] += 1.0;
                }
                v
            })
            .collect())
    }
}

/// Embedder that always fails, as if the model file disappeared mid-run.
struct OfflineEmbedder;

impl SentenceEmbedder for OfflineEmbedder {
    fn name(&self) -> &str {
        "offline"
    }

    fn embed(&self, _texts: &[&str]) -> Result<Vec<Vec<f32>>, CapabilityError> {
        Err(CapabilityError::ModelUnavailable(
            "embedding model not found".into(),
        ))
    }
}

fn hybrid_engine(embedder: Arc<dyn SentenceEmbedder>, seed: u64) -> QuizEngine {
    QuizEngine::new(
        GeneratorConfig {
            use_ml: true,
            rewrite_stems: false,
            seed: Some(seed),
        },
        Capabilities {
            embedding: Some(embedder),
            ..Capabilities::none()
        },
    )
}

fn rule_engine(seed: u64) -> QuizEngine {
    QuizEngine::new(
        GeneratorConfig {
            seed: Some(seed),
            ..GeneratorConfig::default()
        },
        Capabilities::none(),
    )
}

#[test]
fn short_definition_lesson_yields_a_definition_question() {
    let text = "\
        Photosynthesis is the process by which plants convert sunlight into chemical energy. \
        Chlorophyll is the green pigment that captures light for photosynthesis. \
        Oxygen is a byproduct that plants release during photosynthesis.";
    let result = rule_engine(3).generate(text, 2).unwrap();
    assert_eq!(result.quiz.questions.len(), 2);
    assert_eq!(result.coverage, QuizCoverage::Full);

    let definition = result
        .quiz
        .questions
        .iter()
        .find(|q| q.text == "What is Photosynthesis?")
        .expect("expected a definition question");
    assert_eq!(
        definition.options[definition.correct_index],
        "the process by which plants convert sunlight into chemical energy"
    );
}

#[test]
fn rich_lesson_fills_the_request() {
    let result = rule_engine(3).generate(RICH_LESSON, 10).unwrap();
    assert_eq!(result.quiz.questions.len(), 10);
    assert_eq!(result.coverage, QuizCoverage::Full);
}

#[test]
fn every_question_is_well_formed() {
    let result = rule_engine(3).generate(RICH_LESSON, 10).unwrap();
    for q in &result.quiz.questions {
        assert!(q.correct_index < q.options.len(), "{q:?}");
        assert!(!q.text.trim().is_empty());

        let mut lowered: Vec<String> = q.options.iter().map(|o| o.trim().to_lowercase()).collect();
        lowered.sort();
        let before = lowered.len();
        lowered.dedup();
        assert_eq!(lowered.len(), before, "duplicate options in {q:?}");

        match q.question_type {
            QuestionType::TrueFalse => {
                assert_eq!(q.options, vec!["True".to_string(), "False".to_string()]);
            }
            QuestionType::Multiple => {
                assert!(q.options.len() >= 2 && q.options.len() <= 4, "{q:?}");
            }
        }
    }
}

#[test]
fn ratio_holds_on_rich_input() {
    let result = rule_engine(3).generate(RICH_LESSON, 10).unwrap();
    let mc = result
        .quiz
        .questions
        .iter()
        .filter(|q| q.question_type == QuestionType::Multiple)
        .count();
    // 60/40 split, allowing one question of drift for back-fill.
    assert!((5..=7).contains(&mc), "got {mc} multiple-choice of 10");
}

#[test]
fn rich_input_yields_four_option_questions() {
    let result = rule_engine(3).generate(RICH_LESSON, 10).unwrap();
    assert!(result
        .quiz
        .questions
        .iter()
        .filter(|q| q.question_type == QuestionType::Multiple)
        .any(|q| q.options.len() == 4));
}

#[test]
fn sparse_lesson_degrades_to_partial() {
    let result = rule_engine(3).generate(SPARSE_LESSON, 10).unwrap();
    let produced = result.quiz.questions.len();
    assert!(produced >= 1 && produced < 10);
    assert_eq!(
        result.coverage,
        QuizCoverage::Partial {
            requested: 10,
            produced
        }
    );
}

#[test]
fn empty_input_is_the_only_hard_error() {
    for text in ["", "    ", "\n\n\t"] {
        let err = rule_engine(3).generate(text, 5).unwrap_err();
        assert!(matches!(err, QuizError::MissingContent));
    }
}

#[test]
fn rule_only_runs_are_byte_identical() {
    let a = rule_engine(42).generate(RICH_LESSON, 10).unwrap();
    let b = rule_engine(42).generate(RICH_LESSON, 10).unwrap();
    let json_a = serde_json::to_string(&a.quiz.questions).unwrap();
    let json_b = serde_json::to_string(&b.quiz.questions).unwrap();
    assert_eq!(json_a, json_b);
}

#[test]
fn embedder_failure_falls_back_to_rule_only_output() {
    let degraded = hybrid_engine(Arc::new(OfflineEmbedder), 42)
        .generate(RICH_LESSON, 10)
        .unwrap();
    let baseline = rule_engine(42).generate(RICH_LESSON, 10).unwrap();
    assert_eq!(degraded.quiz.questions, baseline.quiz.questions);
}

#[test]
fn hybrid_embedder_still_satisfies_invariants() {
    let result = hybrid_engine(Arc::new(HashedEmbedder), 42)
        .generate(RICH_LESSON, 10)
        .unwrap();
    assert_eq!(result.quiz.mode, GenerationMode::Hybrid);
    assert_eq!(result.quiz.questions.len(), 10);
    for q in &result.quiz.questions {
        assert!(q.correct_index < q.options.len());
        // The correct answer must never leak into the distractor slots twice.
        let correct = q.options[q.correct_index].to_lowercase();
        let dupes = q
            .options
            .iter()
            .filter(|o| o.to_lowercase() == correct)
            .count();
        assert_eq!(dupes, 1);
    }
}

#[test]
fn hybrid_runs_are_deterministic_too() {
    let a = hybrid_engine(Arc::new(HashedEmbedder), 7)
        .generate(RICH_LESSON, 8)
        .unwrap();
    let b = hybrid_engine(Arc::new(HashedEmbedder), 7)
        .generate(RICH_LESSON, 8)
        .unwrap();
    assert_eq!(a.quiz.questions, b.quiz.questions);
}
