//! The workflow JSON Schema, compiled into the binary

use crate::error::{WorkflowError, WorkflowResult};
use jsonschema::Validator;
use serde_json::Value;
use std::sync::OnceLock;

/// Raw schema document
pub const WORKFLOW_SCHEMA: &str = include_str!("../schema/workflow.schema.json");

/// Parse the embedded schema into a JSON value
pub fn workflow_schema() -> WorkflowResult<Value> {
    serde_json::from_str(WORKFLOW_SCHEMA).map_err(|e| WorkflowError::Schema {
        message: e.to_string(),
    })
}

/// Compiled schema validator, built on first use
pub fn schema_validator() -> WorkflowResult<&'static Validator> {
    static VALIDATOR: OnceLock<Result<Validator, String>> = OnceLock::new();
    let compiled = VALIDATOR.get_or_init(|| {
        let schema = workflow_schema().map_err(|e| e.to_string())?;
        jsonschema::validator_for(&schema).map_err(|e| e.to_string())
    });
    compiled.as_ref().map_err(|message| WorkflowError::Schema {
        message: message.clone(),
    })
}
