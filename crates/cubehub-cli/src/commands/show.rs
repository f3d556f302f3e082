//! Print a stored cube version

use clap::Args;
use cubehub_engine::commands::{
    apply_engine_command, CubeSummary, EngineCommand, EngineCommandResult, EngineDeps,
};

use super::{open_store, CliResult};
use crate::config::Config;

#[derive(Debug, Args)]
pub struct ShowArgs {
    pub cube_id: String,

    /// Version number; defaults to the latest
    #[arg(long)]
    pub version: Option<u32>,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: ShowArgs, config: &Config) -> CliResult {
    let store = open_store(config)?;
    let deps = EngineDeps {
        storage: Some(&store),
        ..EngineDeps::default()
    };
    let result = apply_engine_command(
        EngineCommand::ShowCube {
            cube_id: args.cube_id,
            version: args.version,
        },
        &deps,
    )?;

    if let EngineCommandResult::Cube(summary) = result {
        if args.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            print_summary(&summary);
        }
    }
    Ok(())
}

fn print_summary(summary: &CubeSummary) {
    println!("{} ({})", summary.name, summary.id);
    println!("  version: {}", summary.version);
    println!("  date: {}", summary.date.to_rfc3339());
    println!(
        "  cards: {} distinct, {} total",
        summary.distinct, summary.total
    );
    for card in &summary.cards {
        println!("  {}x {} [{}]", card.count, card.name, card.id);
    }
}
