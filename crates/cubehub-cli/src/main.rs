//! CubeHub CLI
//!
//! Command-line interface for building and inspecting versioned cubes

use std::error::Error as _;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use cubehub_core::logging_facility::{init, Profile};
use cubehub_engine::catalog::DEFAULT_SCRYFALL_BASE_URL;
use cubehub_engine::manifest::DEFAULT_CUBECOBRA_BASE_URL;

mod commands;
mod config;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "cubehub")]
#[command(about = "CubeHub - versioned cube snapshots", long_about = None)]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, default_value = ".cubehub/cubes.db")]
    db: PathBuf,

    /// Timeout for each external request
    #[arg(long, global = true, default_value_t = 10)]
    timeout_secs: u64,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    #[arg(long, global = true, default_value = DEFAULT_SCRYFALL_BASE_URL)]
    scryfall_url: String,

    #[arg(long, global = true, default_value = DEFAULT_CUBECOBRA_BASE_URL)]
    cubecobra_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build a cube from its manifest and commit a new version if it changed
    Load(commands::load::LoadArgs),
    /// Print a stored cube version
    Show(commands::show::ShowArgs),
    /// Classify a custom card image and print it as JSON
    ReadCard(commands::read_card::ReadCardArgs),
    /// Recognise a deck photo against a cube version and record it
    ReadDeck(commands::read_deck::ReadDeckArgs),
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init(match cli.log_format {
        LogFormat::Pretty => Profile::Development,
        LogFormat::Json => Profile::Production,
    });

    let config = config::Config::new(
        cli.db,
        cli.timeout_secs,
        cli.scryfall_url,
        cli.cubecobra_url,
    );

    let result = match cli.command {
        Commands::Load(args) => commands::load::execute(args, &config),
        Commands::Show(args) => commands::show::execute(args, &config),
        Commands::ReadCard(args) => commands::read_card::execute(args, &config),
        Commands::ReadDeck(args) => commands::read_deck::execute(args, &config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        let mut cause = e.source();
        while let Some(inner) = cause {
            eprintln!("  caused by: {}", inner);
            cause = inner.source();
        }
        std::process::exit(1);
    }
}
