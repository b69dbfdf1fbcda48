//! Configuration for Conductor
//!
//! Provider settings live in a YAML file. Only the health check reads it; the
//! tool server itself runs without one.

mod error;
mod loader;
mod types;

pub use error::{ConfigError, ConfigResult};
pub use loader::{
    active_env_overrides, config_path, load_config, CONFIG_ENV, ENV_OVERRIDES, LOG_LEVEL_ENV,
    PROVIDER_ENV,
};
pub use types::{ConductorConfig, ProviderConfig};
