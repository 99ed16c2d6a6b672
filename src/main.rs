use clap::Parser;
use log::LevelFilter;
use std::env;

mod commands;
mod quiz;
mod settings;
mod store;

use crate::commands::Cli;
use crate::settings::Settings;

fn init_logging() {
    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(LevelFilter::Info);
    if let Some(filters) = env::var("RUST_LOG").ok() {
        builder.parse_filters(&filters);
    }
    builder.init();
}

fn main() {
    // Credentials may live in a .env file next to the data
    dotenv::dotenv().ok();
    init_logging();

    let cli = Cli::parse();
    let settings = Settings::default();
    if let Err(e) = commands::run(cli, &settings) {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}
