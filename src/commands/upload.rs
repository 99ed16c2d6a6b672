use anyhow::*;
use clap::{Args, ValueEnum};
use log::info;
use std::path::PathBuf;

use crate::commands::SourceArgs;
use crate::quiz::synthesis::synthesize;
use crate::quiz::upsert::{self, WriteMode};
use crate::settings::Settings;
use crate::store::*;

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum StoreKind {
    /// Cloud Firestore over its REST API
    Firestore,
    /// Local JSON file
    Json,
    /// Nothing is persisted
    Memory,
}

#[derive(Args, Debug)]
pub struct UploadArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Generate this many wrong options before uploading
    #[arg(short = 'n', long)]
    pub wrong_options: Option<usize>,

    #[arg(long, value_enum, default_value_t = StoreKind::Firestore)]
    pub store: StoreKind,

    /// Collection name
    #[arg(long)]
    pub collection: Option<String>,

    /// Add every row as a new document instead of updating the matching question
    #[arg(long)]
    pub insert_only: bool,

    /// File used by the `json` store
    #[arg(long)]
    pub json_path: Option<PathBuf>,

    #[arg(long, env = "FIRESTORE_PROJECT_ID")]
    pub project_id: Option<String>,

    #[arg(long, env = "FIRESTORE_DATABASE", default_value = "(default)")]
    pub database: String,

    #[arg(long, env = "FIRESTORE_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,
}

fn open_collection(args: &UploadArgs, settings: &Settings) -> Result<Box<dyn Collection>> {
    let name = args
        .collection
        .clone()
        .unwrap_or_else(|| settings.collection_name.clone());

    let collection: Box<dyn Collection> = match args.store {
        StoreKind::Firestore => {
            let config = FirestoreConfig {
                project_id: args
                    .project_id
                    .clone()
                    .context("Missing project id, set FIRESTORE_PROJECT_ID or pass --project-id")?,
                database: args.database.clone(),
                collection: name,
                access_token: args
                    .access_token
                    .clone()
                    .context("Missing access token, set FIRESTORE_ACCESS_TOKEN or pass --access-token")?,
                timeout: settings.request_timeout,
            };
            Box::new(FirestoreCollection::connect(config)?)
        }
        StoreKind::Json => {
            let path = match &args.json_path {
                Some(path) => path.clone(),
                None => JsonFileCollection::default_path(&name)?,
            };
            Box::new(JsonFileCollection::open(&path)?)
        }
        StoreKind::Memory => Box::new(MemoryCollection::new()),
    };
    Ok(collection)
}

pub fn run(args: &UploadArgs, settings: &Settings) -> Result<()> {
    let source = args.source.load(args.wrong_options.is_some())?;

    let rows = match args.wrong_options {
        Some(wrong_option_count) => {
            synthesize(&source.rows, wrong_option_count, &mut args.source.rng())?
        }
        None => {
            if !source.table.has_option_columns() {
                return Err(anyhow!(
                    "{:?} has no option_<n> columns, pass --wrong-options to generate them",
                    args.source.input
                ));
            }
            source.rows
        }
    };

    let mut collection = open_collection(args, settings)?;
    info!("Writing {} questions", rows.len());
    let report = if args.insert_only {
        upsert::write(&rows, collection.as_mut(), WriteMode::Insert)
    } else {
        upsert::upsert(&rows, collection.as_mut())
    };
    collection.close().context("Could not close collection")?;

    println!("{}", report);
    if !source.warnings.is_empty() {
        println!("{} rows skipped", source.warnings.len());
    }
    if !report.is_success() {
        return Err(anyhow!(
            "{} of {} questions could not be written",
            report.failures.len(),
            rows.len()
        ));
    }
    Ok(())
}
