//! Configuration loading using figment
//!
//! Sources, later ones overriding earlier ones:
//! 1. The YAML file named by `CONDUCTOR_CONFIG`, or the platform default
//! 2. `CONDUCTOR_PROVIDER`, which replaces `default_provider`
//!
//! Configuration is read fresh on every call.

use crate::error::{ConfigError, ConfigResult};
use crate::types::ConductorConfig;
use figment::{
    providers::{Env, Format, Yaml},
    Figment,
};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Names the configuration file
pub const CONFIG_ENV: &str = "CONDUCTOR_CONFIG";

/// Overrides `default_provider`
pub const PROVIDER_ENV: &str = "CONDUCTOR_PROVIDER";

/// Overrides the server log level
pub const LOG_LEVEL_ENV: &str = "CONDUCTOR_LOG_LEVEL";

/// Environment variables that change Conductor behaviour
pub const ENV_OVERRIDES: &[&str] = &[
    CONFIG_ENV,
    PROVIDER_ENV,
    LOG_LEVEL_ENV,
    "CONDUCTOR_ALLOWED_PATHS",
    "ANTHROPIC_API_KEY",
    "OPENAI_API_KEY",
];

/// Resolve the configuration file path
pub fn config_path() -> ConfigResult<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    dirs::config_dir()
        .map(|dir| dir.join("conductor").join("config.yaml"))
        .ok_or(ConfigError::ConfigDirNotFound)
}

/// Load the configuration file at `path`
///
/// A missing file is an error; figment alone would treat it as empty.
pub fn load_config(path: &Path) -> ConfigResult<ConductorConfig> {
    if !path.is_file() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }

    debug!("Loading configuration from {}", path.display());
    Figment::new()
        .merge(Yaml::file(path))
        .merge(
            Env::raw()
                .only(&[PROVIDER_ENV])
                .map(|_| "default_provider".into()),
        )
        .extract::<ConductorConfig>()
        .map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: Box::new(e),
        })
}

/// Recognised override variables that are currently set, by name only
pub fn active_env_overrides() -> Vec<&'static str> {
    ENV_OVERRIDES
        .iter()
        .copied()
        .filter(|name| std::env::var_os(name).is_some_and(|v| !v.is_empty()))
        .collect()
}
