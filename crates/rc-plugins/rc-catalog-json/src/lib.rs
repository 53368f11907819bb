//! # rc-catalog-json
//!
//! `CatalogSource` implementations backed by data the console ships with:
//! a JSON snapshot on disk and an in-memory snapshot.
//!
//! Snapshots are checked against the data-model invariants before they are
//! handed to the core, so a bad demo file fails loudly at load time.

use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use rc_core::models::{validate_catalog, VehicleRecord};
use rc_core::traits::CatalogSource;
use tokio::fs;

/// Reads a JSON array of vehicle records from disk on every fetch.
pub struct JsonCatalogSource {
    path: PathBuf,
}

impl JsonCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Parses and validates a snapshot.
pub fn parse_catalog(raw: &str) -> anyhow::Result<Vec<VehicleRecord>> {
    let catalog: Vec<VehicleRecord> =
        serde_json::from_str(raw).context("catalog is not a JSON array of vehicles")?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

#[async_trait]
impl CatalogSource for JsonCatalogSource {
    async fn fetch_catalog(&self) -> anyhow::Result<Vec<VehicleRecord>> {
        let raw = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("reading catalog {}", self.path.display()))?;
        let catalog = parse_catalog(&raw)
            .with_context(|| format!("loading catalog {}", self.path.display()))?;

        tracing::info!(path = %self.path.display(), vehicles = catalog.len(), "catalog loaded");
        Ok(catalog)
    }
}

/// Serves a fixed snapshot. Used for demo data and by hosts that already
/// hold a catalog in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalogSource {
    catalog: Vec<VehicleRecord>,
}

impl StaticCatalogSource {
    pub fn new(catalog: Vec<VehicleRecord>) -> anyhow::Result<Self> {
        validate_catalog(&catalog)?;
        Ok(Self { catalog })
    }
}

#[async_trait]
impl CatalogSource for StaticCatalogSource {
    async fn fetch_catalog(&self) -> anyhow::Result<Vec<VehicleRecord>> {
        Ok(self.catalog.clone())
    }
}
