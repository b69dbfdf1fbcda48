use conductor_common::ConductorError;
use thiserror::Error;

/// Template errors
#[derive(Debug, Error)]
pub enum TemplatingError {
    /// Template name failed the security checks
    #[error("invalid template name: {0}")]
    InvalidName(String),

    /// No built-in template with this name
    #[error("template '{0}' not found")]
    NotFound(String),

    /// Missing, unknown or mistyped parameter
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Template source failed to parse
    #[error("template parse error: {0}")]
    Parse(String),

    /// Rendering failed
    #[error("template render error: {0}")]
    Render(String),

    /// Rendered output is not a valid workflow
    #[error("rendered workflow failed validation: {}", .0.join("; "))]
    InvalidOutput(Vec<String>),
}

/// Result type for templating operations
pub type Result<T> = std::result::Result<T, TemplatingError>;

impl From<TemplatingError> for ConductorError {
    fn from(error: TemplatingError) -> Self {
        match error {
            TemplatingError::Parse(_) | TemplatingError::Render(_) => {
                ConductorError::internal(error.to_string())
            }
            other => ConductorError::invalid_argument(other.to_string()),
        }
    }
}
