//! Error types for the configuration system

use conductor_common::ConductorError;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Configuration parsing failed
    #[error("failed to parse configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<figment::Error>,
    },

    /// No platform configuration directory
    #[error("unable to determine the configuration directory; set CONDUCTOR_CONFIG")]
    ConfigDirNotFound,
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

impl From<ConfigError> for ConductorError {
    fn from(error: ConfigError) -> Self {
        ConductorError::invalid_argument(error.to_string())
    }
}
