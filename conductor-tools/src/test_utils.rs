//! Helpers for tool tests

use crate::mcp::ToolContext;
use rmcp::model::{CallToolResult, RawContent};

/// A tool context reporting version "test"
pub fn test_context() -> ToolContext {
    ToolContext::new("test").unwrap()
}

/// Text of the first content block
pub fn result_text(result: &CallToolResult) -> String {
    match &result.content[0].raw {
        RawContent::Text(text) => text.text.clone(),
        other => panic!("expected text content, got {other:?}"),
    }
}

/// First content block parsed as JSON
pub fn result_json(result: &CallToolResult) -> serde_json::Value {
    serde_json::from_str(&result_text(result)).unwrap()
}
