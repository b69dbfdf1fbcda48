//! # Conductor Common
//!
//! Foundational types shared across the Conductor crates.
//!
//! ## Modules
//!
//! - [`error`] - The shared error type and severity classification
//! - [`rate_limiter`] - Call and run token buckets
//! - [`path_validator`] - Confinement of user supplied paths
//! - [`sanitize`] - Credential scrubbing for diagnostic text
//! - [`health`] - Health check records
//! - [`logging`] - Log levels and the stderr subscriber

pub mod error;
pub mod health;
pub mod logging;
pub mod path_validator;
pub mod rate_limiter;
pub mod sanitize;

pub use error::{ConductorError, ErrorSeverity, Result, Severity};
pub use health::{HealthCheck, HealthReport, HealthStatus};
pub use logging::{init_logging, LogLevel};
pub use path_validator::{validate_path, PathValidator, ALLOWED_PATHS_ENV};
pub use rate_limiter::{
    RateLimitChecker, RateLimiter, RateLimiterConfig, TokenBucket, DEFAULT_CALL_LIMIT,
    DEFAULT_RUN_LIMIT,
};
pub use sanitize::sanitize_message;
