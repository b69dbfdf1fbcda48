//! Error types shared by every Conductor crate
//!
//! Each variant of [`ConductorError`] corresponds to one failure class a tool
//! call can end in. The stable [`ConductorError::kind`] code is what callers on
//! the other side of the tool protocol see, so it must never change.

use std::fmt;
use std::io;
use thiserror::Error as ThisError;

/// Severity levels for error classification
///
/// - **Warning**: Potential issue but operation can proceed.
/// - **Error**: Operation failed but the server keeps serving.
/// - **Critical**: Indicates a build or programming defect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Potential issue but operation can proceed
    Warning,
    /// Operation failed but system can continue
    Error,
    /// System invariant broken, requires immediate attention
    Critical,
}

/// Trait for error types that have severity levels
///
/// ```rust
/// use conductor_common::{ErrorSeverity, Severity};
///
/// #[derive(Debug)]
/// enum MyError {
///     Corrupted,
///     Missing,
/// }
///
/// impl Severity for MyError {
///     fn severity(&self) -> ErrorSeverity {
///         match self {
///             MyError::Corrupted => ErrorSeverity::Critical,
///             MyError::Missing => ErrorSeverity::Error,
///         }
///     }
/// }
///
/// assert_eq!(MyError::Corrupted.severity(), ErrorSeverity::Critical);
/// ```
pub trait Severity {
    /// Get the severity level of this error
    fn severity(&self) -> ErrorSeverity;
}

/// Result type alias for Conductor operations
pub type Result<T> = std::result::Result<T, ConductorError>;

/// Common error type for Conductor operations
///
/// Domain crates define their own error enums and convert into this one at
/// the tool boundary.
#[derive(Debug, ThisError)]
#[non_exhaustive]
pub enum ConductorError {
    /// Missing or mistyped argument, size limit exceeded
    #[error("{message}")]
    InvalidArgument {
        /// Human readable description, including a hint when one exists
        message: String,
    },

    /// A user supplied path broke one of the confinement rules
    #[error("{rule}")]
    InvalidPath {
        /// The rule that was violated
        rule: String,
    },

    /// A token bucket was empty
    #[error("Rate limit exceeded for {class}: {message}")]
    RateLimited {
        /// The limit class, e.g. "tool calls" or "workflow runs"
        class: String,
        /// Guidance for the caller
        message: String,
    },

    /// File could not be read or written
    #[error("{context}: {source}")]
    Io {
        /// What was being attempted
        context: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A handler deadline elapsed or the request was cancelled
    #[error("{message}")]
    Timeout {
        /// Description of the deadline that fired
        message: String,
    },

    /// Embedded resource failure or broken invariant
    #[error("{message}")]
    Internal {
        /// Details, logged but never returned to callers verbatim
        message: String,
    },
}

impl ConductorError {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an invalid path error naming the violated rule
    pub fn invalid_path(rule: impl Into<String>) -> Self {
        Self::InvalidPath { rule: rule.into() }
    }

    /// Create a rate limit error for a limit class
    pub fn rate_limited(class: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RateLimited {
            class: class.into(),
            message: message.into(),
        }
    }

    /// Wrap an I/O error with context
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a deadline error
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Stable kebab-case code for this error class
    pub fn kind(&self) -> &'static str {
        match self {
            ConductorError::InvalidArgument { .. } => "invalid-argument",
            ConductorError::InvalidPath { .. } => "invalid-path",
            ConductorError::RateLimited { .. } => "rate-limited",
            ConductorError::Io { .. } => "io-error",
            ConductorError::Timeout { .. } => "timeout",
            ConductorError::Internal { .. } => "internal",
        }
    }

    /// Message suitable for returning to a tool caller
    ///
    /// Internal errors are replaced by a generic message; the details only go
    /// to the log.
    pub fn user_message(&self) -> String {
        match self {
            ConductorError::Internal { .. } => {
                format!("{}: an internal error occurred", self.kind())
            }
            other => format!("{}: {}", other.kind(), other),
        }
    }
}

impl Severity for ConductorError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            ConductorError::Internal { .. } => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}
