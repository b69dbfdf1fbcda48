//! Tool registry for MCP operations
//!
//! Every tool is a value implementing [`McpTool`]. Tools are registered once
//! into a [`ToolRegistry`] before the server accepts requests and are looked up
//! by exact name at dispatch time.
//!
//! # Creating New Tools
//!
//! 1. Create a struct implementing the `McpTool` trait
//! 2. Put the description in a `description.md` next to it
//! 3. Define the argument schema and a `Deserialize` request type
//! 4. Register the tool from the category's `register_*_tools` function
//!
//! ```rust,ignore
//! #[derive(Default)]
//! pub struct MyTool;
//!
//! #[async_trait]
//! impl McpTool for MyTool {
//!     fn name(&self) -> &'static str {
//!         "my_tool"
//!     }
//!
//!     fn description(&self) -> &'static str {
//!         include_str!("description.md")
//!     }
//!
//!     fn schema(&self) -> serde_json::Value {
//!         serde_json::json!({"type": "object", "properties": {}})
//!     }
//!
//!     async fn execute(
//!         &self,
//!         arguments: serde_json::Map<String, serde_json::Value>,
//!         context: &ToolContext,
//!     ) -> std::result::Result<CallToolResult, McpError> {
//!         let request: MyRequest = BaseToolImpl::parse_arguments(arguments)?;
//!         Ok(BaseToolImpl::create_json_response(&request))
//!     }
//! }
//! ```

use crate::health::ProviderRegistry;
use conductor_common::{ConductorError, RateLimitChecker, RateLimiter};
use conductor_templating::TemplateStore;
use rmcp::model::{CallToolResult, Tool};
use rmcp::ErrorData as McpError;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::responses::{create_error_response, create_success_response};

/// Context shared by all tools during execution
///
/// The server holds one long-lived context. Each call receives a copy whose
/// `cancellation` token is tied to that request.
#[derive(Clone)]
pub struct ToolContext {
    /// Call and run token buckets
    pub rate_limiter: Arc<dyn RateLimitChecker>,

    /// Server version reported by `workflow_schema` and `health`
    pub version: String,

    /// Configuration file to use instead of the discovered one
    pub config_path: Option<PathBuf>,

    /// Provider implementations by type tag
    pub providers: Arc<ProviderRegistry>,

    /// Built-in workflow templates
    pub templates: Arc<TemplateStore>,

    /// Cancelled when the request is cancelled or the server shuts down
    pub cancellation: CancellationToken,
}

impl ToolContext {
    /// Create a context with the default rate limits and built-in providers
    pub fn new(version: impl Into<String>) -> conductor_common::Result<Self> {
        let templates = TemplateStore::new().map_err(ConductorError::from)?;
        Ok(Self {
            rate_limiter: Arc::new(RateLimiter::new()),
            version: version.into(),
            config_path: None,
            providers: Arc::new(ProviderRegistry::with_builtins()),
            templates: Arc::new(templates),
            cancellation: CancellationToken::new(),
        })
    }

    /// Replace the rate limiter
    pub fn with_rate_limiter(mut self, rate_limiter: Arc<dyn RateLimitChecker>) -> Self {
        self.rate_limiter = rate_limiter;
        self
    }

    /// Read provider configuration from `path`
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Replace the provider registry
    pub fn with_providers(mut self, providers: ProviderRegistry) -> Self {
        self.providers = Arc::new(providers);
        self
    }

    /// Copy of this context for one request
    ///
    /// The transport derives request tokens from its own service token, so
    /// server shutdown reaches the request through `request` as well.
    pub fn for_request(&self, request: &CancellationToken) -> Self {
        Self {
            cancellation: request.child_token(),
            ..self.clone()
        }
    }
}

/// Trait defining the interface for all MCP tools
#[async_trait::async_trait]
pub trait McpTool: Send + Sync {
    /// Unique tool name; stable across versions
    fn name(&self) -> &'static str;

    /// Human readable description, loaded from `description.md`
    fn description(&self) -> &'static str;

    /// JSON Schema for the tool's arguments
    fn schema(&self) -> serde_json::Value;

    /// Execute the tool
    ///
    /// Domain failures are returned as error results; `Err` is reserved for
    /// arguments that do not match the schema.
    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError>;
}

/// Registry of tools, keyed by name
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn McpTool>>,
}

impl ToolRegistry {
    /// Create a new empty tool registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool in the registry
    pub fn register<T: McpTool + 'static>(&mut self, tool: T) {
        let name = tool.name().to_string();
        self.tools.insert(name, Box::new(tool));
    }

    /// Get a tool by name
    pub fn get_tool(&self, name: &str) -> Option<&dyn McpTool> {
        self.tools.get(name).map(|tool| tool.as_ref())
    }

    /// All registered tool names, sorted
    pub fn list_tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Tool descriptors for the `tools/list` response, sorted by name
    pub fn list_tools(&self) -> Vec<Tool> {
        let mut tools: Vec<Tool> = self
            .tools
            .values()
            .map(|tool| {
                let schema_map = match tool.schema() {
                    serde_json::Value::Object(map) => map,
                    _ => serde_json::Map::new(),
                };
                Tool::new(tool.name(), tool.description(), Arc::new(schema_map))
            })
            .collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Helpers shared by tool implementations
pub struct BaseToolImpl;

impl BaseToolImpl {
    /// Parse tool arguments into a typed request
    pub fn parse_arguments<T: serde::de::DeserializeOwned>(
        arguments: serde_json::Map<String, serde_json::Value>,
    ) -> std::result::Result<T, McpError> {
        serde_json::from_value(serde_json::Value::Object(arguments))
            .map_err(|e| McpError::invalid_params(format!("invalid arguments: {e}"), None))
    }

    /// Success result carrying `value` as pretty JSON text
    pub fn create_json_response<T: serde::Serialize>(value: &T) -> CallToolResult {
        match serde_json::to_string_pretty(value) {
            Ok(text) => create_success_response(text),
            Err(e) => Self::create_error_response(&ConductorError::internal(format!(
                "failed to serialize tool output: {e}"
            ))),
        }
    }

    /// Error result for a domain error
    ///
    /// Internal errors are logged with their details and returned generically.
    pub fn create_error_response(error: &ConductorError) -> CallToolResult {
        if let ConductorError::Internal { message } = error {
            tracing::error!("internal error: {message}");
        }
        create_error_response(error.user_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;

    struct MockTool {
        name: &'static str,
    }

    #[async_trait::async_trait]
    impl McpTool for MockTool {
        fn name(&self) -> &'static str {
            self.name
        }

        fn description(&self) -> &'static str {
            "A mock tool"
        }

        fn schema(&self) -> serde_json::Value {
            serde_json::json!({"type": "object", "properties": {}})
        }

        async fn execute(
            &self,
            _arguments: serde_json::Map<String, serde_json::Value>,
            _context: &ToolContext,
        ) -> std::result::Result<CallToolResult, McpError> {
            Ok(create_success_response(format!("{} executed", self.name)))
        }
    }

    fn text_of(result: &CallToolResult) -> String {
        match &result.content[0].raw {
            RawContent::Text(text) => text.text.clone(),
            _ => panic!("expected text content"),
        }
    }

    #[test]
    fn test_tool_registry_creation() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_tool_registration_and_lookup() {
        let mut registry = ToolRegistry::new();
        registry.register(MockTool { name: "test_tool" });

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get_tool("test_tool").unwrap().name(), "test_tool");
        assert!(registry.get_tool("nonexistent").is_none());
    }

    #[test]
    fn test_list_tools_sorted() {
        let mut registry = ToolRegistry::new();
        for name in ["zeta", "alpha", "mid"] {
            registry.register(MockTool { name });
        }

        let names: Vec<String> = registry
            .list_tools()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
        assert_eq!(registry.list_tool_names(), names);
    }

    #[test]
    fn test_parse_arguments_reports_mismatch() {
        #[derive(serde::Deserialize, Debug)]
        #[allow(dead_code)]
        struct Request {
            count: u32,
        }

        let mut arguments = serde_json::Map::new();
        arguments.insert("count".to_string(), serde_json::json!("three"));
        let err = BaseToolImpl::parse_arguments::<Request>(arguments).unwrap_err();
        assert!(err.message.contains("invalid arguments"));
    }

    #[test]
    fn test_internal_errors_are_generic() {
        let result =
            BaseToolImpl::create_error_response(&ConductorError::internal("secret detail"));
        assert_eq!(result.is_error, Some(true));
        let text = text_of(&result);
        assert!(text.starts_with("internal:"));
        assert!(!text.contains("secret detail"));
    }

    #[tokio::test]
    async fn test_request_context_follows_request_token() {
        let context = ToolContext::new("test").unwrap();
        let request = CancellationToken::new();
        let scoped = context.for_request(&request);

        assert!(!scoped.cancellation.is_cancelled());
        request.cancel();
        assert!(scoped.cancellation.is_cancelled());
        assert!(!context.cancellation.is_cancelled());
    }

    #[tokio::test]
    async fn test_mock_tool_executes() {
        let context = ToolContext::new("test").unwrap();
        let tool = MockTool { name: "mock" };
        let result = tool.execute(serde_json::Map::new(), &context).await.unwrap();
        assert_eq!(text_of(&result), "mock executed");
    }
}
