//! # Core Traits (Ports)
//!
//! Collaborators the core talks to without knowing how they are built.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::VehicleRecord;

/// Supplies catalog snapshots: the initial load and every refetch.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Returns the full, ordered catalog.
    async fn fetch_catalog(&self) -> anyhow::Result<Vec<VehicleRecord>>;
}

/// Time source for comment timestamps.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
