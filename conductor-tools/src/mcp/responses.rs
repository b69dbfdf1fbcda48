//! Response creation utilities for MCP operations

use rmcp::model::{CallToolResult, Content};

/// Create a success response for MCP tool calls
pub fn create_success_response(message: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(message.into())])
}

/// Create an error response for MCP tool calls
pub fn create_error_response(message: impl Into<String>) -> CallToolResult {
    CallToolResult::error(vec![Content::text(message.into())])
}
