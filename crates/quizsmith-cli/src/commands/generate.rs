//! The `quizsmith generate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use quizsmith_core::engine::{GeneratorConfig, QuizEngine};
use quizsmith_core::model::{Quiz, QuizCoverage};
use quizsmith_core::traits::Capabilities;
use quizsmith_providers::{load_config_from, resolve_capabilities};

#[allow(clippy::too_many_arguments)]
pub fn execute(
    lesson: PathBuf,
    num_questions: Option<usize>,
    rule_only: bool,
    rewrite: bool,
    seed: Option<u64>,
    output: Option<PathBuf>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let text = std::fs::read_to_string(&lesson)
        .with_context(|| format!("failed to read lesson: {}", lesson.display()))?;
    let config = load_config_from(config_path.as_deref())?;
    let num_questions = num_questions.unwrap_or(config.default_num_questions);

    let capabilities = if rule_only {
        Capabilities::none()
    } else {
        resolve_capabilities(&config)
    };
    let engine = QuizEngine::new(
        GeneratorConfig {
            use_ml: !rule_only,
            rewrite_stems: rewrite,
            seed,
        },
        capabilities,
    );

    let result = engine
        .generate(&text, num_questions)
        .with_context(|| format!("failed to generate quiz from {}", lesson.display()))?;

    if let QuizCoverage::Partial {
        requested,
        produced,
    } = result.coverage
    {
        tracing::warn!(requested, produced, "lesson supported fewer questions than requested");
    }

    if let Some(path) = output {
        result.quiz.save_json(&path)?;
        println!(
            "Wrote {} questions to {}",
            result.quiz.questions.len(),
            path.display()
        );
        return Ok(());
    }

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&result.quiz)?),
        "table" => print_table(&result.quiz),
        other => anyhow::bail!("unknown format: {other} (expected json or table)"),
    }

    Ok(())
}

fn print_table(quiz: &Quiz) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["#", "Type", "Question", "Options"]);

    for (i, q) in quiz.questions.iter().enumerate() {
        let options = q
            .options
            .iter()
            .enumerate()
            .map(|(j, option)| {
                if j == q.correct_index {
                    format!("* {option}")
                } else {
                    format!("  {option}")
                }
            })
            .collect::<Vec<_>>()
            .join("\n");
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(q.question_type),
            Cell::new(&q.text),
            Cell::new(options),
        ]);
    }

    println!("{table}");
    println!("({} questions, {} mode)", quiz.questions.len(), quiz.mode);
}
