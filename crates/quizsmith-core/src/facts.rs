//! Fact extraction: surface patterns over normalized sentences.
//!
//! Patterns are evaluated in a fixed order (definition, then relationship,
//! then cause-effect) and the first match per sentence wins. Confidence is a
//! fixed per-kind rule weight; a sentence matching nothing yields no fact.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::concepts::{clean_subject, is_valid_subject};
use crate::model::{Fact, RelationKind};
use crate::normalize::NormalizedText;

static DEFINITION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Z][\w'-]*(?:\s+[\w'-]+){0,5})\s+(?:is|are)\s+(.{8,250}?)[.!?]*$").unwrap()
});
static RELATIONSHIP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(.{2,60}?)\s+(?:relates? to|causes?|affects?|depends? on|produces?|has|have|includes?|contains?|consists? of)\s+(.{4,250}?)[.!?]*$",
    )
    .unwrap()
});
static CAUSE_EFFECT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(.{2,60}?)\s+(?:leads? to|results? in|gives? rise to)\s+(.{4,250}?)[.!?]*$")
        .unwrap()
});

/// Pattern table in evaluation order.
static PATTERNS: Lazy<Vec<(RelationKind, &'static Regex)>> = Lazy::new(|| {
    vec![
        (RelationKind::Definition, &*DEFINITION),
        (RelationKind::Relationship, &*RELATIONSHIP),
        (RelationKind::CauseEffect, &*CAUSE_EFFECT),
    ]
});

/// Minimum size for an object clause to make a gradable answer.
fn is_usable_object(object: &str) -> bool {
    object.split_whitespace().count() >= 3 && object.len() >= 12
}

/// Extract structured facts from normalized lesson text.
pub fn extract_facts(normalized: &NormalizedText) -> Vec<Fact> {
    let mut facts = Vec::new();

    for sentence in &normalized.sentences {
        for (kind, pattern) in PATTERNS.iter() {
            let Some(caps) = pattern.captures(&sentence.text) else {
                continue;
            };
            let subject = clean_subject(caps[1].trim());
            let object = caps[2].trim().trim_end_matches(['.', ',', ';']).to_string();

            if !is_valid_subject(&subject) || !is_usable_object(&object) {
                // Unusable capture; the next pattern kind may still match.
                continue;
            }

            facts.push(Fact {
                subject,
                relation: *kind,
                object,
                source_sentence: sentence.text.clone(),
                sentence_index: sentence.index,
                confidence: kind.confidence(),
            });
            break;
        }
    }

    facts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;

    fn facts_for(text: &str) -> Vec<Fact> {
        extract_facts(&normalize(text).unwrap())
    }

    #[test]
    fn definition_pattern() {
        let facts = facts_for(
            "Photosynthesis is the process by which plants convert sunlight into energy.",
        );
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].relation, RelationKind::Definition);
        assert_eq!(facts[0].subject, "Photosynthesis");
        assert_eq!(
            facts[0].object,
            "the process by which plants convert sunlight into energy"
        );
        assert_eq!(facts[0].confidence, RelationKind::Definition.confidence());
    }

    #[test]
    fn relationship_pattern() {
        let facts = facts_for("The ocean affects weather patterns across the planet.");
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].relation, RelationKind::Relationship);
        assert_eq!(facts[0].subject, "Ocean");
        assert!(facts[0].object.starts_with("weather patterns"));
    }

    #[test]
    fn cause_effect_pattern() {
        let facts = facts_for("Deforestation leads to soil erosion and habitat loss.");
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].relation, RelationKind::CauseEffect);
        assert_eq!(facts[0].subject, "Deforestation");
        assert_eq!(facts[0].object, "soil erosion and habitat loss");
    }

    #[test]
    fn definition_wins_over_relationship() {
        // "is" and "contains" both appear; definition is evaluated first.
        let facts =
            facts_for("Blood is a fluid that contains red cells and white cells together.");
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].relation, RelationKind::Definition);
    }

    #[test]
    fn one_fact_per_sentence() {
        let facts = facts_for(
            "Gravity is the force that pulls objects toward each other. \
             Friction causes moving objects to slow down over time.",
        );
        assert_eq!(facts.len(), 2);
        assert_eq!(facts[0].sentence_index, 0);
        assert_eq!(facts[1].sentence_index, 1);
        assert_eq!(facts[1].relation, RelationKind::Relationship);
    }

    #[test]
    fn unmatched_sentences_yield_nothing() {
        let facts = facts_for("Look at the sky tonight!");
        assert!(facts.is_empty());
    }

    #[test]
    fn pronoun_subjects_rejected() {
        let facts = facts_for("It is a very common misconception about science.");
        assert!(facts.is_empty());
    }

    #[test]
    fn tiny_objects_rejected() {
        // Object clause too short to grade against distractors.
        let facts = facts_for("Water is wet.");
        assert!(facts.is_empty());
    }
}
