//! Health tools

pub mod check;

use crate::mcp::tool_registry::ToolRegistry;

/// Register the health tool
pub fn register_health_tools(registry: &mut ToolRegistry) {
    registry.register(check::HealthTool::new());
}
