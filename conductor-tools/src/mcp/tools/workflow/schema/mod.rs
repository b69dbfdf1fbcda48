//! Workflow schema tool

use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use async_trait::async_trait;
use conductor_common::ConductorError;
use conductor_workflow::workflow_schema;
use rmcp::model::CallToolResult;
use rmcp::ErrorData as McpError;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct SchemaResponse {
    schema: serde_json::Value,
    version: String,
}

/// Tool returning the embedded workflow JSON Schema
#[derive(Default)]
pub struct WorkflowSchemaTool;

impl WorkflowSchemaTool {
    /// Creates a new instance of the WorkflowSchemaTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for WorkflowSchemaTool {
    fn name(&self) -> &'static str {
        "workflow_schema"
    }

    fn description(&self) -> &'static str {
        include_str!("description.md")
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(
        &self,
        _arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        match workflow_schema() {
            Ok(schema) => Ok(BaseToolImpl::create_json_response(&SchemaResponse {
                schema,
                version: context.version.clone(),
            })),
            Err(e) => Ok(BaseToolImpl::create_error_response(&ConductorError::from(e))),
        }
    }
}
