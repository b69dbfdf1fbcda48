//! Model Context Protocol (MCP) server support
//!
//! ## Architecture
//!
//! 1. **Server Layer**: [`McpServer`] implements the rmcp handler and owns dispatch
//! 2. **Registry Layer**: [`ToolRegistry`] maps tool names to implementations
//! 3. **Tool Layer**: one module per tool under [`tools`]
//!
//! ## Registering Tools
//!
//! ```rust
//! use conductor_tools::mcp::{register_workflow_tools, ToolRegistry};
//!
//! let mut registry = ToolRegistry::new();
//! register_workflow_tools(&mut registry);
//! assert_eq!(registry.len(), 3);
//! ```

pub mod responses;
pub mod server;
pub mod stdio_server;
pub mod tool_registry;
pub mod tools;

pub use server::{McpServer, ServerConfig};
pub use stdio_server::{serve_stdio, serve_transport, SHUTDOWN_TIMEOUT};
pub use tool_registry::{BaseToolImpl, McpTool, ToolContext, ToolRegistry};
pub use tools::health::register_health_tools;
pub use tools::templates::register_template_tools;
pub use tools::workflow::register_workflow_tools;
