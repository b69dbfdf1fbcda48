//! Workflow validation tool

use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use async_trait::async_trait;
use conductor_common::ConductorError;
use conductor_workflow::{validate_workflow, MAX_WORKFLOW_SIZE};
use rmcp::model::CallToolResult;
use rmcp::ErrorData as McpError;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ValidateRequest {
    workflow_yaml: String,
}

/// Tool validating workflow YAML
#[derive(Default)]
pub struct ValidateWorkflowTool;

impl ValidateWorkflowTool {
    /// Creates a new instance of the ValidateWorkflowTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for ValidateWorkflowTool {
    fn name(&self) -> &'static str {
        "workflow_validate"
    }

    fn description(&self) -> &'static str {
        include_str!("description.md")
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "workflow_yaml": {
                    "type": "string",
                    "description": "Workflow document in YAML"
                }
            },
            "required": ["workflow_yaml"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        _context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request: ValidateRequest = BaseToolImpl::parse_arguments(arguments)?;

        if request.workflow_yaml.len() > MAX_WORKFLOW_SIZE {
            return Ok(BaseToolImpl::create_error_response(
                &ConductorError::invalid_argument(format!(
                    "workflow_yaml is {} bytes; the limit is {MAX_WORKFLOW_SIZE} bytes",
                    request.workflow_yaml.len()
                )),
            ));
        }

        let outcome = validate_workflow(&request.workflow_yaml);
        tracing::debug!(
            valid = outcome.valid,
            errors = outcome.errors.len(),
            warnings = outcome.warnings.len(),
            "validated workflow"
        );
        Ok(BaseToolImpl::create_json_response(&outcome))
    }
}
