//! Config loader: builds an [`AiricConfig`] from the layered sources.

use super::sources::{env_vars, global_file};
use super::AiricConfig;
use crate::error::ApiError;
use config::Config;
use std::path::Path;
use tracing::debug;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults, then the global config file (if any), then AIRIC_* environment variables.
    pub fn load() -> Result<AiricConfig, ApiError> {
        let builder = global_file::add_to_builder(Config::builder())?;
        let builder = env_vars::add_to_builder(builder);
        let config: AiricConfig = builder.build()?.try_deserialize()?;
        debug!(provider = %config.agent.provider, "Loaded application config");
        Ok(config)
    }

    /// Load from an explicit file, still honoring environment overrides.
    pub fn load_from_file(path: &Path) -> Result<AiricConfig, ApiError> {
        if !path.exists() {
            return Err(ApiError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let builder = global_file::add_file(Config::builder(), path);
        let builder = env_vars::add_to_builder(builder);
        Ok(builder.build()?.try_deserialize()?)
    }
}
