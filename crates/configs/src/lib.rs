//! # configs
//!
//! Layered settings for the rental console binary.
//!
//! Sources, lowest priority first:
//! 1. built-in defaults
//! 2. an optional TOML file (`rental-console.toml` unless overridden)
//! 3. `RENTAL__<SECTION>__<KEY>` environment variables (a `.env` file is read first)

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "rental-console.toml";
pub const ENV_PREFIX: &str = "RENTAL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid setting: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Human,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// `EnvFilter` directive, e.g. `info` or `rc_core=debug,info`
    pub filter: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSettings {
    /// JSON snapshot served as the console's catalog
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SocialSettings {
    pub viewer_id: String,
    pub max_comment_len: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub log: LogSettings,
    pub catalog: CatalogSettings,
    pub social: SocialSettings,
}

impl Settings {
    /// Loads `.env`, then the default file (if present), then the environment.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), ".env loaded");
        }
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE))
    }

    /// Like [`Settings::load`] with an explicit file; a missing file is not an error.
    pub fn load_from(file: &Path) -> Result<Self, ConfigError> {
        let settings: Settings = Config::builder()
            .set_default("log.filter", "info")?
            .set_default("log.format", "human")?
            .set_default("catalog.path", "data/catalog.json")?
            .set_default("social.viewer_id", "owner")?
            .set_default("social.max_comment_len", 1000)?
            .add_source(File::from(file).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.social.viewer_id.trim().is_empty() {
            return Err(ConfigError::Invalid("social.viewer_id must not be empty".into()));
        }
        if self.social.max_comment_len == 0 {
            return Err(ConfigError::Invalid(
                "social.max_comment_len must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
