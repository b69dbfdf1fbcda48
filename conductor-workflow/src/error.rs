use conductor_common::{ConductorError, ErrorSeverity, Severity};
use thiserror::Error as ThisError;

/// Workflow-specific errors
#[derive(Debug, ThisError)]
#[non_exhaustive]
pub enum WorkflowError {
    /// YAML could not be decoded into a workflow
    #[error("failed to parse workflow: {message}")]
    Parse {
        /// Parser message
        message: String,
    },

    /// Invalid workflow definition
    #[error("invalid workflow '{name}': {}", problems.join("; "))]
    Invalid {
        /// The name of the invalid workflow
        name: String,
        /// Every cross-field rule that failed
        problems: Vec<String>,
    },

    /// Document exceeds the size limit
    #[error("workflow is {size} bytes; the limit is {limit} bytes")]
    TooLarge {
        /// Actual size in bytes
        size: usize,
        /// Limit in bytes
        limit: usize,
    },

    /// The embedded schema is unusable
    #[error("embedded workflow schema is invalid: {message}")]
    Schema {
        /// Details
        message: String,
    },
}

/// Result type for workflow operations
pub type WorkflowResult<T> = Result<T, WorkflowError>;

impl Severity for WorkflowError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            // A broken embedded schema is a build defect
            WorkflowError::Schema { .. } => ErrorSeverity::Critical,
            WorkflowError::Parse { .. } => ErrorSeverity::Error,
            WorkflowError::Invalid { .. } => ErrorSeverity::Error,
            WorkflowError::TooLarge { .. } => ErrorSeverity::Error,
        }
    }
}

impl From<WorkflowError> for ConductorError {
    fn from(error: WorkflowError) -> Self {
        match error {
            WorkflowError::Schema { message } => ConductorError::internal(message),
            other => ConductorError::invalid_argument(other.to_string()),
        }
    }
}
