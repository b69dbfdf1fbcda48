//! MCP tool implementations, grouped by category

pub mod health;
pub mod templates;
pub mod workflow;
