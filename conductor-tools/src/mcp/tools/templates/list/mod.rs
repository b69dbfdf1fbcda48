//! Template listing tool

use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use async_trait::async_trait;
use conductor_templating::TemplateDescriptor;
use rmcp::model::CallToolResult;
use rmcp::ErrorData as McpError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
struct ListRequest {
    #[serde(default)]
    category: Option<String>,
}

#[derive(Debug, Serialize)]
struct ListResponse {
    templates: Vec<TemplateDescriptor>,
}

/// Tool listing built-in templates
#[derive(Default)]
pub struct ListTemplatesTool;

impl ListTemplatesTool {
    /// Creates a new instance of the ListTemplatesTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for ListTemplatesTool {
    fn name(&self) -> &'static str {
        "list_templates"
    }

    fn description(&self) -> &'static str {
        include_str!("description.md")
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "category": {
                    "type": "string",
                    "description": "Only list templates in this category"
                }
            }
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request: ListRequest = BaseToolImpl::parse_arguments(arguments)?;
        let templates = context.templates.list(request.category.as_deref());
        Ok(BaseToolImpl::create_json_response(&ListResponse { templates }))
    }
}
