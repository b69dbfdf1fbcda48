//! Security validation for template lookups
//!
//! Template names are checked before they reach the store, even though the
//! store only holds embedded templates.

use crate::error::{Result, TemplatingError};

/// Longest accepted template name
pub const MAX_TEMPLATE_NAME_LEN: usize = 64;

/// Reject names that look like paths
pub fn validate_template_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(TemplatingError::InvalidName(
            "template name must not be empty".to_string(),
        ));
    }
    if name.contains("..") || name.contains('/') || name.contains('\\') {
        return Err(TemplatingError::InvalidName(
            "template name must not contain '..', '/' or '\\'".to_string(),
        ));
    }
    if name.len() > MAX_TEMPLATE_NAME_LEN {
        return Err(TemplatingError::InvalidName(format!(
            "template name is longer than {MAX_TEMPLATE_NAME_LEN} characters"
        )));
    }
    Ok(())
}
