//! Template tools: listing and scaffolding

pub mod list;
pub mod scaffold;

use crate::mcp::tool_registry::ToolRegistry;

/// Register all template-related MCP tools
pub fn register_template_tools(registry: &mut ToolRegistry) {
    registry.register(list::ListTemplatesTool::new());
    registry.register(scaffold::ScaffoldTool::new());
}
