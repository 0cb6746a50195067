//! The `quizsmith inspect` command.
//!
//! Shows what the extraction stages see in a lesson, for debugging model
//! files and lesson authoring.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use quizsmith_core::concepts::extract_concepts;
use quizsmith_core::facts::extract_facts;
use quizsmith_core::normalize::normalize;
use quizsmith_providers::{load_config_from, resolve_capabilities};

pub fn execute(lesson: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let text = std::fs::read_to_string(&lesson)
        .with_context(|| format!("failed to read lesson: {}", lesson.display()))?;
    let config = load_config_from(config_path.as_deref())?;
    let capabilities = resolve_capabilities(&config);

    let normalized = normalize(&text)
        .with_context(|| format!("failed to analyze lesson: {}", lesson.display()))?;
    let concepts = extract_concepts(&normalized, capabilities.syntactic.as_deref());
    let facts = extract_facts(&normalized);

    println!(
        "{} sentences across {} paragraph(s)\n",
        normalized.sentences.len(),
        normalized
            .sentences
            .iter()
            .map(|s| s.paragraph)
            .max()
            .map_or(0, |p| p + 1)
    );

    let mut concept_table = Table::new();
    concept_table.set_header(vec!["Concept", "Score", "Origin"]);
    for concept in &concepts {
        concept_table.add_row(vec![
            Cell::new(&concept.text),
            Cell::new(format!("{:.1}", concept.score)),
            Cell::new(format!("{:?}", concept.origin)),
        ]);
    }
    println!("Concepts ({}):\n{concept_table}\n", concepts.len());

    let mut fact_table = Table::new();
    fact_table.set_header(vec!["Subject", "Relation", "Object", "Confidence"]);
    for fact in &facts {
        fact_table.add_row(vec![
            Cell::new(&fact.subject),
            Cell::new(fact.relation),
            Cell::new(&fact.object),
            Cell::new(format!("{:.1}", fact.confidence)),
        ]);
    }
    println!("Facts ({}):\n{fact_table}", facts.len());

    Ok(())
}
