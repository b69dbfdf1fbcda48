//! Workflow run tool
//!
//! Only dry runs produce a plan. A non-dry call still passes the path check
//! and consumes a run token, then reports that execution belongs to the CLI.

use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use async_trait::async_trait;
use conductor_common::{ConductorError, PathValidator};
use conductor_workflow::{parse_workflow, plan_dry_run, RunResult};
use rmcp::model::CallToolResult;
use rmcp::ErrorData as McpError;
use serde::Deserialize;
use std::future::Future;
use std::path::Path;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Deadline for a dry run
pub const DRY_RUN_DEADLINE: Duration = Duration::from_secs(5 * 60);

/// Deadline for an executed run
pub const EXECUTE_DEADLINE: Duration = Duration::from_secs(30 * 60);

fn default_dry_run() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct RunRequest {
    workflow_path: String,
    #[serde(default)]
    inputs: serde_json::Map<String, serde_json::Value>,
    #[serde(default = "default_dry_run")]
    dry_run: bool,
}

/// Tool planning a workflow file
#[derive(Default)]
pub struct RunWorkflowTool;

impl RunWorkflowTool {
    /// Creates a new instance of the RunWorkflowTool
    pub fn new() -> Self {
        Self
    }

    async fn run(request: RunRequest, context: &ToolContext) -> conductor_common::Result<RunResult> {
        let path = PathValidator::from_env()?.validate(&request.workflow_path)?;

        if !request.dry_run {
            context.rate_limiter.check_run()?;
        }

        let deadline = if request.dry_run {
            DRY_RUN_DEADLINE
        } else {
            EXECUTE_DEADLINE
        };

        within_deadline(deadline, &context.cancellation, Self::plan(&path, &request)).await
    }

    async fn plan(path: &Path, request: &RunRequest) -> conductor_common::Result<RunResult> {
        let yaml = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ConductorError::io("failed to read workflow file", e))?;
        let workflow = parse_workflow(&yaml)
            .map_err(|e| ConductorError::invalid_argument(format!("invalid workflow: {e}")))?;

        if request.dry_run {
            let result = plan_dry_run(&workflow, &request.inputs);
            tracing::debug!(
                workflow = %workflow.name,
                steps = result.plan.len(),
                success = result.success,
                "planned dry run"
            );
            Ok(result)
        } else {
            tracing::info!(workflow = %workflow.name, "refused non-dry run");
            Ok(RunResult::not_executed(&workflow))
        }
    }
}

/// Run `work` unless the request is cancelled or `deadline` elapses first
async fn within_deadline<T, F>(
    deadline: Duration,
    cancellation: &CancellationToken,
    work: F,
) -> conductor_common::Result<T>
where
    F: Future<Output = conductor_common::Result<T>>,
{
    tokio::select! {
        biased;
        _ = cancellation.cancelled() => {
            Err(ConductorError::timeout("request cancelled"))
        }
        result = tokio::time::timeout(deadline, work) => {
            result.map_err(|_| {
                ConductorError::timeout(format!(
                    "deadline exceeded after {}s",
                    deadline.as_secs()
                ))
            })?
        }
    }
}

#[async_trait]
impl McpTool for RunWorkflowTool {
    fn name(&self) -> &'static str {
        "workflow_run"
    }

    fn description(&self) -> &'static str {
        include_str!("description.md")
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "workflow_path": {
                    "type": "string",
                    "description": "Path to the workflow YAML file"
                },
                "inputs": {
                    "type": "object",
                    "description": "Input values by name",
                    "additionalProperties": true
                },
                "dry_run": {
                    "type": "boolean",
                    "description": "Plan without executing",
                    "default": true
                }
            },
            "required": ["workflow_path"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request: RunRequest = BaseToolImpl::parse_arguments(arguments)?;

        match Self::run(request, context).await {
            Ok(result) => Ok(BaseToolImpl::create_json_response(&result)),
            Err(e) => Ok(BaseToolImpl::create_error_response(&e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{result_json, result_text, test_context};
    use serial_test::serial;
    use tempfile::TempDir;

    const WORKFLOW: &str = r#"
name: release
inputs:
  - name: version
    required: true
steps:
  - id: build
    type: shell
    command: make
  - id: announce
    type: http
    url: https://example.com/hook
    condition:
      expression: "inputs.notify"
"#;

    fn args(path: &str, extra: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
        let mut map = serde_json::Map::new();
        map.insert("workflow_path".to_string(), path.into());
        if let serde_json::Value::Object(extra) = extra {
            map.extend(extra);
        }
        map
    }

    fn write_workflow(dir: &TempDir, body: &str) -> String {
        let path = dir.path().join("release.yaml");
        std::fs::write(&path, body).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_schema_defaults_to_dry_run() {
        let schema = RunWorkflowTool::new().schema();
        assert_eq!(schema["properties"]["dry_run"]["default"], true);
    }

    #[tokio::test]
    #[serial]
    async fn test_dry_run_plans_steps() {
        let dir = TempDir::new().unwrap();
        let path = write_workflow(&dir, WORKFLOW);
        std::env::set_var("CONDUCTOR_ALLOWED_PATHS", dir.path());

        let result = RunWorkflowTool::new()
            .execute(
                args(&path, serde_json::json!({"inputs": {"version": "1.0"}})),
                &test_context(),
            )
            .await
            .unwrap();
        std::env::remove_var("CONDUCTOR_ALLOWED_PATHS");

        let body = result_json(&result);
        assert_eq!(body["success"], true);
        assert_eq!(body["mode"], "dry_run");
        assert_eq!(body["plan"][0]["status"], "pending");
        assert_eq!(body["plan"][1]["status"], "conditional");
        assert_eq!(body["plan"][1]["condition"], "inputs.notify");
    }

    #[tokio::test]
    #[serial]
    async fn test_non_dry_run_not_executed() {
        let dir = TempDir::new().unwrap();
        let path = write_workflow(&dir, WORKFLOW);
        std::env::set_var("CONDUCTOR_ALLOWED_PATHS", dir.path());

        let result = RunWorkflowTool::new()
            .execute(
                args(&path, serde_json::json!({"dry_run": false})),
                &test_context(),
            )
            .await
            .unwrap();
        std::env::remove_var("CONDUCTOR_ALLOWED_PATHS");

        let body = result_json(&result);
        assert_eq!(body["success"], false);
        assert_eq!(body["mode"], "executed");
        assert!(body["error"].as_str().unwrap().contains("use the CLI"));
    }

    #[tokio::test]
    #[serial]
    async fn test_invalid_workflow_file() {
        let dir = TempDir::new().unwrap();
        let path = write_workflow(&dir, "name: broken\nsteps:\n  - id: a\n    type: shell\n");
        std::env::set_var("CONDUCTOR_ALLOWED_PATHS", dir.path());

        let result = RunWorkflowTool::new()
            .execute(args(&path, serde_json::json!({})), &test_context())
            .await
            .unwrap();
        std::env::remove_var("CONDUCTOR_ALLOWED_PATHS");

        assert_eq!(result.is_error, Some(true));
        assert!(result_text(&result).starts_with("invalid-argument: invalid workflow:"));
    }

    #[tokio::test]
    #[serial]
    async fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        std::env::set_var("CONDUCTOR_ALLOWED_PATHS", dir.path());
        let path = dir.path().join("absent.yaml");

        let result = RunWorkflowTool::new()
            .execute(
                args(&path.to_string_lossy(), serde_json::json!({})),
                &test_context(),
            )
            .await
            .unwrap();
        std::env::remove_var("CONDUCTOR_ALLOWED_PATHS");

        assert!(result_text(&result).starts_with("io-error:"));
    }

    #[tokio::test]
    #[serial]
    async fn test_cancelled_request() {
        let dir = TempDir::new().unwrap();
        let path = write_workflow(&dir, WORKFLOW);
        std::env::set_var("CONDUCTOR_ALLOWED_PATHS", dir.path());

        let token = CancellationToken::new();
        token.cancel();
        let context = test_context().for_request(&token);
        let result = RunWorkflowTool::new()
            .execute(args(&path, serde_json::json!({})), &context)
            .await
            .unwrap();
        std::env::remove_var("CONDUCTOR_ALLOWED_PATHS");

        assert_eq!(result_text(&result), "timeout: request cancelled");
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_exceeded() {
        let result: conductor_common::Result<()> = within_deadline(
            DRY_RUN_DEADLINE,
            &CancellationToken::new(),
            std::future::pending(),
        )
        .await;

        let err = result.unwrap_err();
        assert_eq!(err.kind(), "timeout");
        assert_eq!(err.user_message(), "timeout: deadline exceeded after 300s");
    }

    #[tokio::test(start_paused = true)]
    async fn test_execute_deadline_is_longer() {
        let started = tokio::time::Instant::now();
        let result: conductor_common::Result<()> = within_deadline(
            EXECUTE_DEADLINE,
            &CancellationToken::new(),
            std::future::pending(),
        )
        .await;

        assert!(result
            .unwrap_err()
            .user_message()
            .ends_with("deadline exceeded after 1800s"));
        assert!(started.elapsed() >= EXECUTE_DEADLINE);
    }

    #[tokio::test(start_paused = true)]
    async fn test_work_inside_deadline() {
        let result = within_deadline(DRY_RUN_DEADLINE, &CancellationToken::new(), async {
            tokio::time::sleep(DRY_RUN_DEADLINE - Duration::from_secs(1)).await;
            Ok(7)
        })
        .await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_traversal_rejected() {
        let result = RunWorkflowTool::new()
            .execute(args("../etc/passwd", serde_json::json!({})), &test_context())
            .await
            .unwrap();
        assert!(result_text(&result).starts_with("invalid-path:"));
    }
}
