//! # Conductor Tools
//!
//! The MCP tool server for Conductor. It exposes workflow validation, schema
//! introspection, template scaffolding, dry-run planning and health checks to
//! AI assistants over stdio.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use conductor_tools::{serve_stdio, ServerConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> conductor_common::Result<()> {
//! serve_stdio(ServerConfig::default(), CancellationToken::new()).await
//! # }
//! ```

#![warn(missing_docs)]

/// Layered health checks and provider probes
pub mod health;

/// Model Context Protocol (MCP) server and tools
pub mod mcp;

#[cfg(test)]
mod test_utils;

pub use mcp::{
    serve_stdio, serve_transport, McpServer, ServerConfig, ToolContext, ToolRegistry,
    SHUTDOWN_TIMEOUT,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
