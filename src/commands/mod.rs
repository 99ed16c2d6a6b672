use anyhow::*;
use clap::{Args, Parser, Subcommand};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

use crate::quiz::row::{QuizRow, QUESTION_FIELD};
use crate::quiz::table::{RowWarning, SourceTable};
use crate::settings::Settings;

pub mod generate;
pub mod upload;


const QUESTION_PLACEHOLDER: &str = "{}";

#[derive(Debug, Parser)]
#[command(
    name = "quiz-loader",
    version,
    about = "Generate multiple-choice options for quiz CSV files and upload them to a document collection"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add generated wrong options to a question/answer CSV file
    Generate(generate::GenerateArgs),
    /// Write quiz questions to a document collection
    Upload(upload::UploadArgs),
}

#[derive(Args, Debug)]
pub struct SourceArgs {
    /// CSV file with at least `question` and `correct` columns
    pub input: PathBuf,

    /// Rewrites every question, `{}` stands for the original text
    #[arg(long)]
    pub question_template: Option<String>,

    /// Seed for reproducible option generation
    #[arg(long)]
    pub seed: Option<u64>,
}

pub struct Source {
    pub table: SourceTable,
    pub rows: Vec<QuizRow>,
    pub warnings: Vec<RowWarning>,
}

impl SourceArgs {
    /// Reads the input table. Tables about to get generated options are
    /// normalized first: lowercase headers and no duplicate records.
    fn load(&self, for_synthesis: bool) -> Result<Source> {
        let mut table = SourceTable::open(&self.input)?;

        if for_synthesis {
            table.lowercase_headers();
            let duplicates = table.dedup();
            if duplicates > 0 {
                info!("Dropped {} duplicate rows", duplicates);
            }
        }

        if let Some(template) = &self.question_template {
            if !template.contains(QUESTION_PLACEHOLDER) {
                return Err(anyhow!(
                    "Question template must contain `{}`",
                    QUESTION_PLACEHOLDER
                ));
            }
            table.map_column(QUESTION_FIELD, |question| {
                template.replace(QUESTION_PLACEHOLDER, question)
            })?;
        }

        let (rows, warnings) = if for_synthesis {
            table.questions()?
        } else {
            table.rows()?
        };
        info!("Loaded {} questions from {:?}", rows.len(), self.input);
        Ok(Source {
            table,
            rows,
            warnings,
        })
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

pub fn run(cli: Cli, settings: &Settings) -> Result<()> {
    match cli.command {
        Command::Generate(args) => generate::run(&args, settings),
        Command::Upload(args) => upload::run(&args, settings),
    }
}
