//! Build a cube from its manifest

use clap::Args;
use cubehub_core::loaders::{CustomCardReader, NoopCustomCardReader};
use cubehub_engine::catalog::{CatalogCardLoader, ScryfallHttpCatalog};
use cubehub_engine::commands::{
    apply_engine_command, BuildOutcome, CubeSnapshotBuilder, EngineCommand, EngineCommandResult,
    EngineDeps,
};
use cubehub_engine::custom::LlmCustomCardReader;
use cubehub_engine::manifest::CubeCobraHttpSource;
use cubehub_engine::openai::OpenAiImageReader;

use super::{open_store, CliResult};
use crate::config::Config;

#[derive(Debug, Args)]
pub struct LoadArgs {
    /// Cube id on CubeCobra
    pub cube_id: String,
}

/// Without an OpenAI key custom cards cannot be classified; builds that
/// reach a new custom image fail with `ERR_EXTERNAL_SERVICE`.
pub fn execute(args: LoadArgs, config: &Config) -> CliResult {
    let store = open_store(config)?;
    let catalog = ScryfallHttpCatalog::with_base_url(config.scryfall_url.as_str(), config.timeout)?;
    let manifests =
        CubeCobraHttpSource::with_base_url(config.cubecobra_url.as_str(), config.timeout)?;
    let image_reader = match &config.openai {
        Some(openai) => Some(OpenAiImageReader::new(openai.clone())?),
        None => None,
    };

    let llm_reader;
    let reader: &dyn CustomCardReader = match &image_reader {
        Some(image_reader) => {
            llm_reader = LlmCustomCardReader::new(image_reader);
            &llm_reader
        }
        None => {
            tracing::debug!("No classifier configured");
            &NoopCustomCardReader
        }
    };

    let loader = CatalogCardLoader::new(&catalog, &store);
    let builder = CubeSnapshotBuilder::new(&manifests, &loader, reader, &store);
    let deps = EngineDeps {
        storage: Some(&store),
        builder: Some(&builder),
        ..EngineDeps::default()
    };

    let cube_id = args.cube_id;
    let result = apply_engine_command(
        EngineCommand::BuildCube {
            cube_id: cube_id.clone(),
        },
        &deps,
    )?;

    if let EngineCommandResult::Build(outcome) = result {
        match outcome {
            BuildOutcome::Committed {
                version,
                distinct,
                total,
            } => {
                println!("Cube {} committed:", cube_id);
                println!("  version: {}", version);
                println!("  distinct cards: {}", distinct);
                println!("  total cards: {}", total);
            }
            BuildOutcome::Unchanged { version } => {
                println!("Cube {} unchanged at version {}", cube_id, version);
            }
        }
    }
    Ok(())
}
