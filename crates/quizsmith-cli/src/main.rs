//! quizsmith CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "quizsmith", version, about = "Quiz generation from lesson text")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a quiz from a lesson text file
    Generate {
        /// Path to the lesson text file
        lesson: PathBuf,

        /// Number of questions to generate (default from config)
        #[arg(long, short = 'n')]
        num_questions: Option<usize>,

        /// Skip ML-backed steps even when models are available
        #[arg(long)]
        rule_only: bool,

        /// Rewrite question stems through the rewriting model
        #[arg(long)]
        rewrite: bool,

        /// RNG seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Write the quiz JSON to this path instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Output format: json, table
        #[arg(long, default_value = "json")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show the concepts and facts extracted from a lesson
    Inspect {
        /// Path to the lesson text file
        lesson: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config and example lesson
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizsmith=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            lesson,
            num_questions,
            rule_only,
            rewrite,
            seed,
            output,
            format,
            config,
        } => commands::generate::execute(
            lesson,
            num_questions,
            rule_only,
            rewrite,
            seed,
            output,
            format,
            config,
        ),
        Commands::Inspect { lesson, config } => commands::inspect::execute(lesson, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
