//! Scaffold tool: render a template into a new workflow

use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use async_trait::async_trait;
use conductor_common::{ConductorError, PathValidator};
use rmcp::model::CallToolResult;
use rmcp::ErrorData as McpError;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::Path;
use tokio::io::{AsyncWrite, AsyncWriteExt};

#[derive(Debug, Deserialize)]
struct ScaffoldRequest {
    template: String,
    name: String,
    #[serde(default)]
    parameters: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    output_path: Option<String>,
}

#[derive(Debug, Serialize)]
struct ScaffoldResponse {
    workflow_yaml: String,
    files_created: Vec<String>,
}

/// Tool creating a workflow from a template
#[derive(Default)]
pub struct ScaffoldTool;

impl ScaffoldTool {
    /// Creates a new instance of the ScaffoldTool
    pub fn new() -> Self {
        Self
    }

    async fn scaffold(
        request: ScaffoldRequest,
        context: &ToolContext,
    ) -> conductor_common::Result<ScaffoldResponse> {
        let workflow_yaml = context
            .templates
            .render_with(&request.template, &request.name, &request.parameters)?;

        let mut files_created = Vec::new();
        if let Some(output_path) = &request.output_path {
            let path = PathValidator::from_env()?.validate(output_path)?;
            write_new_file(&path, &workflow_yaml).await?;
            tracing::info!(template = %request.template, path = %path.display(), "scaffolded workflow");
            files_created.push(path.display().to_string());
        }

        Ok(ScaffoldResponse {
            workflow_yaml,
            files_created,
        })
    }
}

async fn write_new_file(path: &Path, contents: &str) -> conductor_common::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| ConductorError::io("failed to create output directory", e))?;
    }

    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
        .map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => ConductorError::invalid_argument(
                "output_path already exists; choose a new file name",
            ),
            _ => ConductorError::io("failed to create output file", e),
        })?;
    write_or_remove(path, &mut file, contents).await
}

/// Write `contents`; on failure remove the file this call created
async fn write_or_remove<W>(
    path: &Path,
    writer: &mut W,
    contents: &str,
) -> conductor_common::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let written = match writer.write_all(contents.as_bytes()).await {
        Ok(()) => writer.flush().await,
        Err(e) => Err(e),
    };
    if let Err(e) = written {
        if let Err(remove) = tokio::fs::remove_file(path).await {
            tracing::warn!(
                path = %path.display(),
                "failed to remove partial output file: {remove}"
            );
        }
        return Err(ConductorError::io("failed to write output file", e));
    }
    Ok(())
}

#[async_trait]
impl McpTool for ScaffoldTool {
    fn name(&self) -> &'static str {
        "scaffold"
    }

    fn description(&self) -> &'static str {
        include_str!("description.md")
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "template": {
                    "type": "string",
                    "description": "Template name"
                },
                "name": {
                    "type": "string",
                    "description": "Name of the new workflow"
                },
                "parameters": {
                    "type": "object",
                    "description": "Extra template parameters",
                    "additionalProperties": true
                },
                "output_path": {
                    "type": "string",
                    "description": "Write the workflow to this new file"
                }
            },
            "required": ["template", "name"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request: ScaffoldRequest = BaseToolImpl::parse_arguments(arguments)?;

        match Self::scaffold(request, context).await {
            Ok(response) => Ok(BaseToolImpl::create_json_response(&response)),
            Err(e) => Ok(BaseToolImpl::create_error_response(&e)),
        }
    }
}
