//! Core data model types for quizsmith.
//!
//! These are the fundamental types the whole system uses to represent
//! extracted concepts and facts, question candidates, and finished quizzes.
//! Every entity is created fresh per generation call and immutable once
//! produced; persistence is the hosting service's concern.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a concept candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConceptOrigin {
    /// Surface-pattern signals: capitalization, quoting, frequency.
    Rule,
    /// Contributed by the syntactic-analysis capability.
    Syntactic,
}

/// A candidate key term extracted from lesson text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Concept {
    /// The concept text, cleaned and capitalized.
    pub text: String,
    /// Additive signal score; higher means more quiz-worthy.
    pub score: f64,
    /// Which extractor first proposed this concept.
    pub origin: ConceptOrigin,
    /// Index of the first sentence mentioning the concept, if known.
    pub first_sentence: Option<usize>,
}

impl Concept {
    /// Normalization key used for deduplication.
    pub fn normalized_key(text: &str) -> String {
        text.trim().to_lowercase()
    }
}

/// The relation kinds a fact can express.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationKind {
    Definition,
    Relationship,
    CauseEffect,
}

impl RelationKind {
    /// Fixed per-kind confidence weight. These are rule weights, not
    /// probabilities derived from corpus statistics.
    pub fn confidence(self) -> f64 {
        match self {
            RelationKind::Definition => 0.9,
            RelationKind::CauseEffect => 0.8,
            RelationKind::Relationship => 0.7,
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationKind::Definition => write!(f, "definition"),
            RelationKind::Relationship => write!(f, "relationship"),
            RelationKind::CauseEffect => write!(f, "cause-effect"),
        }
    }
}

/// A structured (subject, relation, object) triple derived from one sentence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fact {
    /// The subject term, cleaned.
    pub subject: String,
    /// The relation kind this fact expresses.
    pub relation: RelationKind,
    /// The object clause (definition body, related term, or effect).
    pub object: String,
    /// The sentence the fact was derived from, verbatim.
    pub source_sentence: String,
    /// Index of the source sentence within the normalized text.
    pub sentence_index: usize,
    /// Fixed rule weight for the matching pattern kind.
    pub confidence: f64,
}

/// Question stem categories produced by the template engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionCategory {
    Definition,
    Relationship,
    Factual,
    TruefalseStatement,
}

impl QuestionCategory {
    /// Categories eligible for the optional stem rewriting step.
    pub fn rewritable(self) -> bool {
        matches!(
            self,
            QuestionCategory::Definition | QuestionCategory::Relationship
        )
    }
}

/// An intermediate question produced by the template engine, before
/// distractor generation and assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionCandidate {
    /// Stem category.
    pub category: QuestionCategory,
    /// The templated question stem.
    pub stem_text: String,
    /// The correct answer text for this stem.
    pub correct_answer_text: String,
    /// The fact backing this candidate, if it came from one.
    pub supporting_fact: Option<Fact>,
    /// For true/false statements: whether the statement is actually true.
    pub truth: Option<bool>,
    /// Index of the sentence this candidate is anchored to.
    pub sentence_index: usize,
}

/// A deliberately incorrect answer option.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Distractor {
    /// The distractor text.
    pub text: String,
    /// Heuristic or cosine-similarity-derived plausibility score.
    pub rank_score: f64,
}

/// Finished question types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Multiple,
    TrueFalse,
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::Multiple => write!(f, "multiple"),
            QuestionType::TrueFalse => write!(f, "truefalse"),
        }
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "multiple" | "mc" => Ok(QuestionType::Multiple),
            "truefalse" | "tf" => Ok(QuestionType::TrueFalse),
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

/// A finished, gradable question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique, stable identifier.
    pub id: Uuid,
    /// Question type.
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// The question text shown to the learner.
    #[serde(rename = "question")]
    pub text: String,
    /// Ordered answer options, 2–4 entries, unique case-insensitively.
    pub options: Vec<String>,
    /// Index of the correct option.
    pub correct_index: usize,
}

/// Which pipeline configuration produced a quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationMode {
    /// Only deterministic pattern-based logic ran.
    RuleOnly,
    /// Optional ML-backed steps were enabled (and used when available).
    Hybrid,
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationMode::RuleOnly => write!(f, "rule-only"),
            GenerationMode::Hybrid => write!(f, "hybrid"),
        }
    }
}

/// A complete generated quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
    /// The questions, in final order.
    pub questions: Vec<Question>,
    /// Pipeline configuration that produced this quiz.
    pub mode: GenerationMode,
    /// When the quiz was generated.
    pub generated_at: DateTime<Utc>,
}

impl Quiz {
    /// Save the quiz as pretty-printed JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize quiz")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write quiz to {}", path.display()))?;
        Ok(())
    }

    /// Load a quiz from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read quiz from {}", path.display()))?;
        let quiz: Quiz = serde_json::from_str(&content).context("failed to parse quiz JSON")?;
        Ok(quiz)
    }
}

/// Advisory signal distinguishing full from best-effort results.
///
/// A short quiz is not an error; callers that care can branch on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "coverage")]
pub enum QuizCoverage {
    /// The quiz has exactly as many questions as requested.
    Full,
    /// Extraction yielded fewer distinct candidates than requested.
    Partial { requested: usize, produced: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_type_display_and_parse() {
        assert_eq!(QuestionType::Multiple.to_string(), "multiple");
        assert_eq!(QuestionType::TrueFalse.to_string(), "truefalse");
        assert_eq!(
            "multiple".parse::<QuestionType>().unwrap(),
            QuestionType::Multiple
        );
        assert_eq!("TF".parse::<QuestionType>().unwrap(), QuestionType::TrueFalse);
        assert!("essay".parse::<QuestionType>().is_err());
    }

    #[test]
    fn relation_confidence_ordering() {
        assert!(RelationKind::Definition.confidence() > RelationKind::CauseEffect.confidence());
        assert!(RelationKind::CauseEffect.confidence() > RelationKind::Relationship.confidence());
    }

    #[test]
    fn question_serde_shape() {
        let q = Question {
            id: Uuid::nil(),
            question_type: QuestionType::TrueFalse,
            text: "True or False: Water boils at 100 degrees Celsius?".into(),
            options: vec!["True".into(), "False".into()],
            correct_index: 0,
        };
        let json = serde_json::to_value(&q).unwrap();
        // Wire field names follow the external contract, not the Rust names.
        assert_eq!(json["type"], "truefalse");
        assert!(json["question"].as_str().unwrap().starts_with("True or False"));
        assert_eq!(json["correct_index"], 0);

        let back: Question = serde_json::from_value(json).unwrap();
        assert_eq!(back, q);
    }

    #[test]
    fn quiz_json_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quiz.json");
        let quiz = Quiz {
            questions: vec![Question {
                id: Uuid::nil(),
                question_type: QuestionType::TrueFalse,
                text: "True or False: The mitochondria is the powerhouse of the cell?".into(),
                options: vec!["True".into(), "False".into()],
                correct_index: 0,
            }],
            mode: GenerationMode::RuleOnly,
            generated_at: Utc::now(),
        };
        quiz.save_json(&path).unwrap();
        let back = Quiz::load_json(&path).unwrap();
        assert_eq!(back.questions, quiz.questions);
        assert_eq!(back.mode, quiz.mode);
    }

    #[test]
    fn concept_key_normalization() {
        assert_eq!(Concept::normalized_key("  Photosynthesis "), "photosynthesis");
        assert_eq!(
            Concept::normalized_key("Solar System"),
            Concept::normalized_key("solar system")
        );
    }
}
