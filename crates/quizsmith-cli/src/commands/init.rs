//! The `quizsmith init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create quizsmith.toml
    if std::path::Path::new("quizsmith.toml").exists() {
        println!("quizsmith.toml already exists, skipping.");
    } else {
        std::fs::write("quizsmith.toml", SAMPLE_CONFIG)?;
        println!("Created quizsmith.toml");
    }

    // Create example lesson
    std::fs::create_dir_all("lessons")?;
    let example_path = std::path::Path::new("lessons/example.txt");
    if example_path.exists() {
        println!("lessons/example.txt already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_LESSON)?;
        println!("Created lessons/example.txt");
    }

    println!("\nNext steps:");
    println!("  1. Run: quizsmith inspect lessons/example.txt");
    println!("  2. Run: quizsmith generate lessons/example.txt --format table");
    println!("  3. Drop model files into ./models to enable hybrid mode");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizsmith configuration

# Directory holding the optional model files:
#   lexicon.json        word -> part-of-speech tags
#   vocab.json          token -> idf weight
#   rewrite_rules.json  stem rewrite rules
# Paths may reference environment variables, e.g. "${HOME}/quizsmith/models".
models_dir = "./models"

default_num_questions = 10
"#;

const EXAMPLE_LESSON: &str = "\
Photosynthesis is the process by which plants convert sunlight into chemical energy.
Chlorophyll is the green pigment that captures light inside plant cells.
Respiration causes plants to release stored energy during the night.
Deforestation leads to soil erosion and habitat loss in many regions.

The water cycle is the continuous movement of water through the environment.
Evaporation causes surface water to rise into the atmosphere as vapor.
Precipitation is the process that returns water to the surface as rain or snow.
";
