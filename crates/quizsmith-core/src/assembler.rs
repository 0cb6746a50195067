//! Quiz assembly: ratio selection, option shuffling, and final validation.
//!
//! The assembler is the last gate before a quiz leaves the engine. Every
//! question is validated against the output invariants; anything malformed
//! is dropped rather than repaired, and the quiz is never padded with
//! duplicate or invalid questions to hit the requested count.

use rand::prelude::*;
use uuid::Uuid;

use crate::model::{
    Distractor, Question, QuestionCandidate, QuestionCategory, QuestionType,
};

/// Share of a quiz that should be multiple-choice.
const MULTIPLE_CHOICE_RATIO: f64 = 0.6;

/// A candidate paired with its ranked distractors, ready for assembly.
#[derive(Debug, Clone)]
pub struct AssemblyItem {
    pub candidate: QuestionCandidate,
    pub distractors: Vec<Distractor>,
}

/// Check a finished question against the output invariants.
///
/// Returns a list of violations; empty means the question is valid.
pub fn validate_question(question: &Question) -> Vec<String> {
    let mut violations = Vec::new();

    if question.correct_index >= question.options.len() {
        violations.push(format!(
            "correct_index {} out of range for {} options",
            question.correct_index,
            question.options.len()
        ));
    }

    if question.options.len() < 2 || question.options.len() > 4 {
        violations.push(format!("{} options, expected 2-4", question.options.len()));
    }

    let mut seen = std::collections::HashSet::new();
    for option in &question.options {
        if !seen.insert(option.trim().to_lowercase()) {
            violations.push(format!("duplicate option: {option}"));
        }
    }

    match question.question_type {
        QuestionType::TrueFalse => {
            if question.options != ["True", "False"] {
                violations.push("true/false options must be exactly [True, False]".into());
            }
        }
        QuestionType::Multiple => {
            if question.text.trim().is_empty() || !question.text.ends_with('?') {
                violations.push("multiple-choice stem must be a question".into());
            }
        }
    }

    violations
}

fn next_id<R: Rng>(rng: &mut R) -> Uuid {
    Uuid::from_u128(rng.gen())
}

fn build_multiple<R: Rng>(item: &AssemblyItem, rng: &mut R) -> Option<Question> {
    if item.distractors.is_empty() {
        return None;
    }

    let mut options: Vec<String> = Vec::with_capacity(4);
    options.push(item.candidate.correct_answer_text.clone());
    for d in item.distractors.iter().take(3) {
        options.push(d.text.clone());
    }

    options.shuffle(rng);
    let correct_index = options
        .iter()
        .position(|o| o == &item.candidate.correct_answer_text)?;

    let question = Question {
        id: next_id(rng),
        question_type: QuestionType::Multiple,
        text: item.candidate.stem_text.clone(),
        options,
        correct_index,
    };

    validate_question(&question).is_empty().then_some(question)
}

fn build_truefalse<R: Rng>(item: &AssemblyItem, rng: &mut R) -> Option<Question> {
    let truth = item.candidate.truth?;
    let question = Question {
        id: next_id(rng),
        question_type: QuestionType::TrueFalse,
        text: item.candidate.stem_text.clone(),
        // Fixed option order; only the correct index moves.
        options: vec!["True".into(), "False".into()],
        correct_index: usize::from(!truth),
    };

    validate_question(&question).is_empty().then_some(question)
}

/// Assemble a final question list from candidates and their distractors.
///
/// Honors the 60/40 multiple/true-false split, back-fills from the other
/// category when one runs short, shuffles options and question order, and
/// returns at most `num_questions` validated questions.
pub fn assemble<R: Rng>(
    items: &[AssemblyItem],
    num_questions: usize,
    rng: &mut R,
) -> Vec<Question> {
    if num_questions == 0 {
        return Vec::new();
    }

    let target_mc = ((num_questions as f64) * MULTIPLE_CHOICE_RATIO).round() as usize;
    let target_tf = num_questions - target_mc;

    let mut multiple: Vec<Question> = Vec::new();
    let mut truefalse: Vec<Question> = Vec::new();

    for item in items {
        match item.candidate.category {
            QuestionCategory::TruefalseStatement => {
                if let Some(q) = build_truefalse(item, rng) {
                    truefalse.push(q);
                }
            }
            _ => {
                if let Some(q) = build_multiple(item, rng) {
                    multiple.push(q);
                }
            }
        }
    }

    let mut questions: Vec<Question> = Vec::with_capacity(num_questions);
    let mut mc_iter = multiple.into_iter();
    let mut tf_iter = truefalse.into_iter();

    for q in mc_iter.by_ref().take(target_mc) {
        questions.push(q);
    }
    for q in tf_iter.by_ref().take(target_tf) {
        questions.push(q);
    }

    // Back-fill the shortfall from whichever category still has supply.
    while questions.len() < num_questions {
        if let Some(q) = mc_iter.next() {
            questions.push(q);
        } else if let Some(q) = tf_iter.next() {
            questions.push(q);
        } else {
            break;
        }
    }

    questions.shuffle(rng);
    questions
}
