//! Log level parsing and subscriber setup
//!
//! Standard output carries the tool protocol, so every log line goes to
//! standard error.

use crate::{ConductorError, Result};
use std::fmt;
use std::str::FromStr;
use tracing_subscriber::{fmt as tracing_fmt, prelude::*, registry, EnvFilter};

/// Levels accepted by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// One line per dispatch and more
    Debug,
    /// Lifecycle events
    #[default]
    Info,
    /// Denials and degraded checks
    Warn,
    /// Failures only
    Error,
}

impl LogLevel {
    /// Lowercase name as used in filters
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = ConductorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(ConductorError::invalid_argument(format!(
                "invalid log level '{other}'; expected one of debug, info, warn, error"
            ))),
        }
    }
}

/// Filter directive for `level`, keeping the transport library quiet
pub fn filter_directive(level: LogLevel) -> String {
    format!("rmcp=warn,{level}")
}

/// Install the global stderr subscriber
///
/// `RUST_LOG` takes precedence over `level` when set. Returns false if a
/// subscriber was already installed.
pub fn init_logging(level: LogLevel) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(level)));

    registry()
        .with(filter)
        .with(
            tracing_fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_levels() {
        assert_eq!("debug".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!("INFO".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert_eq!("warn".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("error".parse::<LogLevel>().unwrap(), LogLevel::Error);
    }

    #[test]
    fn test_invalid_level_is_invalid_argument() {
        let err = "verbose".parse::<LogLevel>().unwrap_err();
        assert_eq!(err.kind(), "invalid-argument");
        assert!(err.to_string().contains("verbose"));
    }

    #[test]
    fn test_default_is_info() {
        assert_eq!(LogLevel::default(), LogLevel::Info);
        assert_eq!(filter_directive(LogLevel::default()), "rmcp=warn,info");
    }
}
