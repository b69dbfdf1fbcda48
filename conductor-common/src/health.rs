//! Health check records
//!
//! A health run produces an ordered list of [`HealthCheck`]s. The run is
//! healthy unless one of them has [`HealthStatus::Fail`]; warnings never change
//! that.

use serde::{Deserialize, Serialize};

/// Status of a health check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Check passed
    Pass,
    /// Check passed with warnings
    Warn,
    /// Check failed
    Fail,
}

/// Result of a health check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthCheck {
    /// Name of the check
    pub name: String,
    /// Status of the check
    pub status: HealthStatus,
    /// Human-readable message describing the check result
    pub message: String,
    /// Optional suggestion for fixing the issue
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl HealthCheck {
    /// Create a passing check
    pub fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: HealthStatus::Pass,
            message: message.into(),
            remediation: None,
        }
    }

    /// Create a warning check
    pub fn warn(
        name: impl Into<String>,
        message: impl Into<String>,
        remediation: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            status: HealthStatus::Warn,
            message: message.into(),
            remediation,
        }
    }

    /// Create a failing check
    pub fn fail(
        name: impl Into<String>,
        message: impl Into<String>,
        remediation: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            status: HealthStatus::Fail,
            message: message.into(),
            remediation: Some(remediation.into()),
        }
    }

    /// True if this check failed
    pub fn is_fail(&self) -> bool {
        self.status == HealthStatus::Fail
    }
}

/// Outcome of a full health run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    /// False iff any check failed
    pub healthy: bool,
    /// Server version
    pub version: String,
    /// Checks in run order
    pub checks: Vec<HealthCheck>,
}

impl HealthReport {
    /// Build a report, deriving `healthy` from the checks
    pub fn new(version: impl Into<String>, checks: Vec<HealthCheck>) -> Self {
        Self {
            healthy: !checks.iter().any(HealthCheck::is_fail),
            version: version.into(),
            checks,
        }
    }
}
