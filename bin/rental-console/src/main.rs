//! # rental-console
//!
//! Command-line host for the catalog core: loads a catalog snapshot, filters
//! it, and replays scripted social interactions against it.

mod telemetry;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use configs::Settings;
use rc_catalog_json::JsonCatalogSource;
use rc_core::{
    CatalogBounds, CatalogSource, FilterCriteria, Interaction, SocialInteractionStore,
    StorePolicy, VehicleId, VehicleRecord,
};
use serde::Serialize;

#[derive(Parser)]
#[command(author, version, about = "Vehicle catalog filtering and social interactions", long_about = None)]
struct Cli {
    /// Settings file (defaults to rental-console.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Catalog snapshot, overriding the configured path
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the vehicles matching a criteria file (or the seeded defaults)
    Filter {
        #[arg(long)]
        criteria: Option<PathBuf>,
    },
    /// Apply a JSON list of interactions in order and print each outcome
    Replay {
        #[arg(long)]
        script: PathBuf,
    },
    /// Print the catalog's observed numeric bounds
    Bounds,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplayOutcome {
    step: usize,
    vehicle_id: VehicleId,
    #[serde(skip_serializing_if = "Option::is_none")]
    record: Option<VehicleRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
    .context("loading settings")?;
    telemetry::init_logging(&settings.log).context("initializing logging")?;

    let catalog_path = cli.catalog.clone().unwrap_or_else(|| settings.catalog.path.clone());
    let source = JsonCatalogSource::new(catalog_path);
    let catalog = source.fetch_catalog().await?;

    match cli.command {
        Commands::Filter { criteria } => {
            let criteria = match criteria {
                Some(path) => read_json::<FilterCriteria>(&path).await?,
                None => FilterCriteria::seeded_from(&catalog),
            };
            criteria.validate()?;
            tracing::info!(active = ?criteria.active_dimensions(), "applying criteria");

            let store = SocialInteractionStore::new(catalog, store_policy(&settings));
            print_json(&store.filtered(&criteria))?;
        }
        Commands::Replay { script } => {
            let script: Vec<Interaction> = read_json(&script).await?;
            let mut store = SocialInteractionStore::new(catalog, store_policy(&settings));

            print_json(&replay(&mut store, &script))?;
        }
        Commands::Bounds => {
            print_json(&CatalogBounds::observe(&catalog))?;
        }
    }

    Ok(())
}

/// Applies every interaction in order. A failed step is reported in its
/// outcome and the remaining steps still run.
fn replay(store: &mut SocialInteractionStore, script: &[Interaction]) -> Vec<ReplayOutcome> {
    script
        .iter()
        .enumerate()
        .map(|(step, interaction)| match store.dispatch(interaction) {
            Ok(record) => ReplayOutcome {
                step,
                vehicle_id: interaction.vehicle_id(),
                record: Some(record),
                error: None,
            },
            Err(err) => {
                tracing::warn!(step, error = %err, "interaction failed");
                ReplayOutcome {
                    step,
                    vehicle_id: interaction.vehicle_id(),
                    record: None,
                    error: Some(err.to_string()),
                }
            }
        })
        .collect()
}

fn store_policy(settings: &Settings) -> StorePolicy {
    StorePolicy::new(settings.social.viewer_id.as_str())
        .with_max_comment_len(settings.social.max_comment_len)
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
