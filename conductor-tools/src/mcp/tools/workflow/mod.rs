//! Workflow tools: validation, schema and dry-run planning

pub mod run;
pub mod schema;
pub mod validate;

use crate::mcp::tool_registry::ToolRegistry;

/// Register all workflow-related MCP tools
pub fn register_workflow_tools(registry: &mut ToolRegistry) {
    registry.register(validate::ValidateWorkflowTool::new());
    registry.register(schema::WorkflowSchemaTool::new());
    registry.register(run::RunWorkflowTool::new());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_workflow_tools() {
        let mut registry = ToolRegistry::new();
        register_workflow_tools(&mut registry);

        assert_eq!(registry.len(), 3);
        assert!(registry.get_tool("workflow_validate").is_some());
        assert!(registry.get_tool("workflow_schema").is_some());
        assert!(registry.get_tool("workflow_run").is_some());
    }
}
