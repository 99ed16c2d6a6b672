use anyhow::*;
use clap::Args;
use std::path::PathBuf;

use crate::commands::SourceArgs;
use crate::quiz::synthesis::synthesize;
use crate::settings::Settings;

#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Number of wrong options per question
    #[arg(short = 'n', long)]
    pub wrong_options: Option<usize>,

    /// Destination CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &GenerateArgs, settings: &Settings) -> Result<()> {
    let source = args.source.load(true)?;
    let wrong_option_count = args.wrong_options.unwrap_or(settings.wrong_option_count);

    let rows = synthesize(&source.rows, wrong_option_count, &mut args.source.rng())?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| settings.synthesis_output.clone());
    source.table.save_rows(&rows, &output)?;

    println!(
        "Options generated for {} questions and saved to {:?}",
        rows.len(),
        output
    );
    if !source.warnings.is_empty() {
        println!("{} rows skipped", source.warnings.len());
    }
    Ok(())
}
