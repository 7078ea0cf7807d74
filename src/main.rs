#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # marker
//!
//! Grades a free-text student answer against a reference answer: embeds both,
//! gates on their cosine similarity, and runs an LLM rubric evaluation whose
//! response is normalized into a bounded evaluation record.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use bpaf::*;
use colored::Colorize;
use dotenvy::dotenv;
use marker::{
    config,
    embed::{EmbeddingProvider, OpenAiEmbeddings},
    grade::{AnswerGrader, EvaluationRecord, OpenAiEvaluator, SimilarityTier},
    similarity::cosine_similarity,
};
use tabled::{
    Table,
    settings::{Alignment, Modify, Panel, Style, object::Rows},
};
use tracing::{Level, metadata::LevelFilter};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// Top-level CLI commands.
#[derive(Debug, Clone)]
enum Cmd {
    /// Grade a student answer against a reference answer
    Grade {
        /// Path to the question text
        question:  PathBuf,
        /// Path to the reference answer text
        reference: PathBuf,
        /// Path to the student answer text
        answer:    PathBuf,
        /// Optional path to a rubric overriding the built-in one
        rubric:    Option<PathBuf>,
    },
    /// Print the cosine similarity of two texts
    Similarity(PathBuf, PathBuf),
}

/// Parse the command line arguments and return a `Cmd` enum
fn options() -> Cmd {
    /// parses the question file path
    fn question() -> impl Parser<PathBuf> {
        positional("QUESTION").help("Path to the question text")
    }

    /// parses the reference answer file path
    fn reference() -> impl Parser<PathBuf> {
        positional("REFERENCE").help("Path to the reference answer text")
    }

    /// parses the student answer file path
    fn answer() -> impl Parser<PathBuf> {
        positional("ANSWER").help("Path to the student answer text")
    }

    /// parses the optional rubric override
    fn rubric() -> impl Parser<Option<PathBuf>> {
        long("rubric")
            .help("Path to a rubric file; defaults to the built-in general rubric")
            .argument("PATH")
            .optional()
    }

    /// parses the first text file path
    fn left() -> impl Parser<PathBuf> {
        positional("LEFT").help("Path to the first text")
    }

    /// parses the second text file path
    fn right() -> impl Parser<PathBuf> {
        positional("RIGHT").help("Path to the second text")
    }

    let grade = construct!(Cmd::Grade {
        rubric(),
        question(),
        reference(),
        answer(),
    })
    .to_options()
    .command("grade")
    .help("Grade a student answer");

    let similarity = construct!(Cmd::Similarity(left(), right()))
        .to_options()
        .command("similarity")
        .help("Print the cosine similarity of two texts");

    let cmd = construct!([grade, similarity]);

    cmd.to_options().descr("Answer grading for short free-text responses").run()
}

/// Embeds both texts and returns their cosine similarity.
async fn embedded_similarity(
    embeddings: &OpenAiEmbeddings,
    reference: &str,
    student: &str,
) -> Result<f64> {
    let reference_vector = embeddings.embed(reference).await?;
    let student_vector = embeddings.embed(student).await?;
    let similarity = cosine_similarity(&reference_vector, &student_vector);
    tracing::info!(similarity, "computed answer similarity");
    Ok(similarity)
}

/// Renders the evaluation record as a table plus verdict and feedback lines.
fn show_record(record: &EvaluationRecord) {
    let table = Table::new([record])
        .with(Panel::header("Evaluation"))
        .with(Modify::new(Rows::new(1..)).with(Alignment::center()))
        .with(Style::modern())
        .to_string();
    println!("{table}");

    let verdict = if record.is_correct {
        "correct".green().bold()
    } else {
        "incorrect".red().bold()
    };
    println!("\nVerdict: {verdict}");

    if !record.feedback.is_empty() {
        println!("\nFeedback:\n{}", record.feedback);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false);
    let filter_layer = LevelFilter::from_level(Level::INFO);
    tracing_subscriber::registry()
        .with(fmt)
        .with(filter_layer)
        .init();

    let cmd = options();

    match cmd {
        Cmd::Grade {
            question,
            reference,
            answer,
            rubric,
        } => {
            let question_text = fs::read_to_string(&question)
                .with_context(|| format!("Could not read question from {}", question.display()))?;
            let reference_text = fs::read_to_string(&reference).with_context(|| {
                format!("Could not read reference answer from {}", reference.display())
            })?;
            let answer_text = fs::read_to_string(&answer).with_context(|| {
                format!("Could not read student answer from {}", answer.display())
            })?;
            let rubric_text = match rubric {
                Some(path) => fs::read_to_string(&path)
                    .with_context(|| format!("Could not read rubric from {}", path.display()))?,
                None => config::prompts().general_rubric().to_string(),
            };

            let embeddings = OpenAiEmbeddings::from_env()?;
            let similarity =
                embedded_similarity(&embeddings, &reference_text, &answer_text).await?;

            let evaluator = OpenAiEvaluator::from_env()?;
            let record = AnswerGrader::builder()
                .similarity(similarity)
                .rubric(rubric_text)
                .question(question_text)
                .reference_answer(reference_text)
                .student_answer(answer_text)
                .build()
                .run(&evaluator)
                .await?;

            show_record(&record);
        }
        Cmd::Similarity(left, right) => {
            let left_text = fs::read_to_string(&left)
                .with_context(|| format!("Could not read {}", left.display()))?;
            let right_text = fs::read_to_string(&right)
                .with_context(|| format!("Could not read {}", right.display()))?;

            let embeddings = OpenAiEmbeddings::from_env()?;
            let similarity = embedded_similarity(&embeddings, &left_text, &right_text).await?;

            println!("similarity: {similarity:.4}");
            println!("tier: {:?}", SimilarityTier::classify(similarity));
        }
    };

    Ok(())
}
