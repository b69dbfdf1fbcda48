//! Health check tool

use crate::health::{run_health_checks, HEALTH_DEADLINE};
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use async_trait::async_trait;
use conductor_common::HealthReport;
use rmcp::model::CallToolResult;
use rmcp::ErrorData as McpError;
use tokio::time::Instant;

/// Tool reporting whether Conductor is ready to run workflows
#[derive(Default)]
pub struct HealthTool;

impl HealthTool {
    /// Creates a new instance of the HealthTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for HealthTool {
    fn name(&self) -> &'static str {
        "health"
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
        let config_path = match &context.config_path {
            Some(path) => Ok(path.clone()),
            None => conductor_config::config_path(),
        };

        let deadline = Instant::now() + HEALTH_DEADLINE;
        let checks = run_health_checks(
            config_path.as_deref(),
            &context.providers,
            deadline,
            &context.cancellation,
        )
        .await;

        let report = HealthReport::new(context.version.clone(), checks);
        tracing::debug!(
            healthy = report.healthy,
            checks = report.checks.len(),
            "health check complete"
        );
        Ok(BaseToolImpl::create_json_response(&report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{result_json, test_context};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_reports_configured_provider() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "default_provider: gpt\nproviders:\n  gpt:\n    type: openai\n",
        )
        .unwrap();

        let context = test_context().with_config_path(&path);
        let result = HealthTool::new()
            .execute(serde_json::Map::new(), &context)
            .await
            .unwrap();
        let report = result_json(&result);

        assert_eq!(report["healthy"], true);
        assert_eq!(report["version"], "test");
        assert_eq!(report["checks"].as_array().unwrap().len(), 4);
        assert_eq!(report["checks"][2]["status"], "warn");
    }
}
