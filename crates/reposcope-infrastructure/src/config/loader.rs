//! Configuration loader - environment-based, mirroring the teacher's
//! `ConfigLoader` (YAML + figment) but reading this spec's flat env-var
//! table (`spec.md` §6) directly instead of a Loco-style `settings:` YAML
//! block.

use figment::providers::Env;
use figment::Figment;
use reposcope_domain::error::{Error, Result};

use super::data::AppConfig;
use super::validation::validate_app_config;

/// Loads and validates [`AppConfig`] from the process environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader;

impl ConfigLoader {
    /// Build a loader with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Load configuration from the environment, validating it before
    /// returning.
    ///
    /// # Errors
    /// Returns [`Error::ConfigMissing`]/[`Error::ConfigInvalid`] if a
    /// required key is absent, a value fails to parse, or a section
    /// validator rejects the result.
    pub fn load(&self) -> Result<AppConfig> {
        let config: AppConfig = Figment::new()
            .merge(Env::raw())
            .extract()
            .map_err(|err| Error::ConfigInvalid {
                key: "environment".to_owned(),
                message: err.to_string(),
            })?;
        validate_app_config(&config)?;
        tracing::info!(port = config.port, env = ?config.node_env, "configuration loaded");
        Ok(config)
    }
}
