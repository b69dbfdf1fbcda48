//! MCP server: tool registry, dispatch and the rmcp handler

use super::responses::create_error_response;
use super::tool_registry::{BaseToolImpl, ToolContext, ToolRegistry};
use super::tools::{
    health::register_health_tools, templates::register_template_tools,
    workflow::register_workflow_tools,
};
use conductor_common::{ConductorError, LogLevel};
use rmcp::{
    model::*, service::RequestContext, ErrorData as McpError, RoleServer, ServerHandler,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

const SERVER_INSTRUCTIONS: &str = "Conductor validates, scaffolds and plans workflows. \
Start with list_templates and scaffold, check documents with workflow_validate, and \
preview execution with workflow_run (dry run by default). Use health to diagnose setup problems.";

/// Server identity and logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Name advertised to clients
    pub name: String,
    /// Version advertised to clients and reported by tools
    pub version: String,
    /// Minimum level written to stderr
    pub log_level: LogLevel,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "conductor".to_string(),
            version: "dev".to_string(),
            log_level: LogLevel::Info,
        }
    }
}

impl ServerConfig {
    /// Build a configuration, parsing `log_level`
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        log_level: &str,
    ) -> conductor_common::Result<Self> {
        Ok(Self {
            name: name.into(),
            version: version.into(),
            log_level: log_level.parse()?,
        })
    }
}

/// The Conductor MCP server
///
/// The registry is built before the server is returned and is never mutated
/// afterwards, so it is shared without a lock.
#[derive(Clone)]
pub struct McpServer {
    config: ServerConfig,
    registry: Arc<ToolRegistry>,
    context: ToolContext,
}

impl McpServer {
    /// Create a server with the default tool context
    pub fn new(config: ServerConfig) -> conductor_common::Result<Self> {
        let context = ToolContext::new(config.version.clone())?;
        Ok(Self::with_context(config, context))
    }

    /// Create a server around an existing tool context
    pub fn with_context(config: ServerConfig, context: ToolContext) -> Self {
        let mut registry = ToolRegistry::new();
        register_workflow_tools(&mut registry);
        register_template_tools(&mut registry);
        register_health_tools(&mut registry);
        tracing::debug!(tools = registry.len(), "registered tools");

        Self {
            config,
            registry: Arc::new(registry),
            context,
        }
    }

    /// Server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Descriptors of all tools, sorted by name
    pub fn list_tools(&self) -> Vec<Tool> {
        self.registry.list_tools()
    }

    /// Route one call to its tool
    ///
    /// Always produces exactly one result. Rate limiting, unknown tools and
    /// malformed arguments all come back as error results.
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
        cancellation: &CancellationToken,
    ) -> CallToolResult {
        if let Err(e) = self.context.rate_limiter.check_call() {
            tracing::warn!(tool = name, "rate limit exceeded");
            return BaseToolImpl::create_error_response(&e);
        }

        let Some(tool) = self.registry.get_tool(name) else {
            tracing::debug!(tool = name, outcome = "unknown-tool", "dispatch");
            return BaseToolImpl::create_error_response(&ConductorError::invalid_argument(
                format!("unknown tool '{name}'"),
            ));
        };

        let context = self.context.for_request(cancellation);
        let result = match tool.execute(arguments.unwrap_or_default(), &context).await {
            Ok(result) => result,
            Err(e) => create_error_response(format!("invalid-argument: {}", e.message)),
        };

        tracing::debug!(
            tool = name,
            outcome = if result.is_error == Some(true) { "error" } else { "ok" },
            "dispatch"
        );
        result
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability::default()),
                ..Default::default()
            },
            server_info: Implementation {
                name: self.config.name.clone(),
                title: None,
                version: self.config.version.clone(),
                icons: None,
                website_url: None,
            },
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        async move {
            Ok(ListToolsResult {
                tools: self.registry.list_tools(),
                next_cursor: None,
            })
        }
    }

    fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move {
            Ok(self
                .dispatch(&request.name, request.arguments, &context.ct)
                .await)
        }
    }
}
