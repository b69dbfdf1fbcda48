//! Provider implementations known to the health check
//!
//! Only the liveness summary crosses this boundary. Providers never hand back
//! credentials, and any free-form text they do return is sanitised before it
//! reaches a check message.

use async_trait::async_trait;
use conductor_config::ProviderConfig;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

/// Liveness summary reported by a provider
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderHealth {
    /// The provider's runtime or binary is present
    pub installed: bool,
    /// Credentials are available
    pub authenticated: bool,
    /// A trivial request succeeded
    pub working: bool,
    /// Version string, if the provider reports one
    pub version: Option<String>,
    /// Free-form detail for a failed probe
    pub detail: Option<String>,
}

/// Capability to check a provider's liveness
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// Probe the provider, returning promptly once `cancel` fires
    async fn probe(&self, cancel: &CancellationToken) -> ProviderHealth;
}

/// A configured provider
pub trait Provider: Send + Sync {
    /// Type tag of this provider
    fn name(&self) -> &str;

    /// Liveness probe, when the provider supports one
    fn health_probe(&self) -> Option<&dyn HealthProbe> {
        None
    }
}

/// Builds a provider from its configuration
pub type ProviderFactory = fn(&ProviderConfig) -> Box<dyn Provider>;

/// Provider constructors keyed by type tag
#[derive(Default)]
pub struct ProviderRegistry {
    factories: BTreeMap<String, ProviderFactory>,
}

impl ProviderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in `claude-code`, `anthropic` and `openai` providers
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(ClaudeCodeProvider::TYPE, |config| {
            Box::new(ClaudeCodeProvider::from_config(config))
        });
        registry.register("anthropic", |_| Box::new(ApiProvider::new("anthropic")));
        registry.register("openai", |_| Box::new(ApiProvider::new("openai")));
        registry
    }

    /// Register a constructor for `provider_type`
    pub fn register(&mut self, provider_type: impl Into<String>, factory: ProviderFactory) {
        self.factories.insert(provider_type.into(), factory);
    }

    /// Instantiate the provider described by `config`
    pub fn create(&self, config: &ProviderConfig) -> Option<Box<dyn Provider>> {
        self.factories
            .get(&config.provider_type)
            .map(|factory| factory(config))
    }

    /// Known type tags, sorted
    pub fn types(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }
}

/// The Claude Code CLI
#[derive(Debug, Clone)]
pub struct ClaudeCodeProvider {
    binary: String,
}

impl ClaudeCodeProvider {
    /// Type tag
    pub const TYPE: &'static str = "claude-code";

    /// Executable looked up on `PATH` unless overridden
    pub const DEFAULT_BINARY: &'static str = "claude";

    /// Create a provider using `binary`
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn from_config(config: &ProviderConfig) -> Self {
        Self::new(
            config
                .binary
                .clone()
                .unwrap_or_else(|| Self::DEFAULT_BINARY.to_string()),
        )
    }

    fn locate(&self) -> Option<PathBuf> {
        which::which(&self.binary).ok()
    }
}

impl Provider for ClaudeCodeProvider {
    fn name(&self) -> &str {
        Self::TYPE
    }

    fn health_probe(&self) -> Option<&dyn HealthProbe> {
        Some(self)
    }
}

#[async_trait]
impl HealthProbe for ClaudeCodeProvider {
    async fn probe(&self, cancel: &CancellationToken) -> ProviderHealth {
        let Some(path) = self.locate() else {
            return ProviderHealth {
                detail: Some(format!("'{}' was not found on PATH", self.binary)),
                ..Default::default()
            };
        };

        // The CLI keeps its own login; presence is the best signal available.
        let mut health = ProviderHealth {
            installed: true,
            authenticated: true,
            ..Default::default()
        };

        let output = Command::new(&path)
            .arg("--version")
            .kill_on_drop(true)
            .output();

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                health.detail = Some("probe cancelled".to_string());
            }
            result = output => match result {
                Ok(output) if output.status.success() => {
                    health.working = true;
                    let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
                    health.version = (!version.is_empty()).then_some(version);
                }
                Ok(output) => {
                    health.detail = Some(format!("--version exited with {}", output.status));
                }
                Err(e) => {
                    health.detail = Some(format!("failed to run --version: {e}"));
                }
            }
        }

        health
    }
}

/// An HTTP API provider; these have no liveness probe
#[derive(Debug, Clone)]
pub struct ApiProvider {
    name: &'static str,
}

impl ApiProvider {
    /// Create an API provider with type tag `name`
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl Provider for ApiProvider {
    fn name(&self) -> &str {
        self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(provider_type: &str) -> ProviderConfig {
        ProviderConfig {
            provider_type: provider_type.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_builtin_types() {
        let registry = ProviderRegistry::with_builtins();
        assert_eq!(registry.types(), vec!["anthropic", "claude-code", "openai"]);
    }

    #[test]
    fn test_create_known_and_unknown() {
        let registry = ProviderRegistry::with_builtins();

        let provider = registry.create(&config("claude-code")).unwrap();
        assert_eq!(provider.name(), "claude-code");
        assert!(provider.health_probe().is_some());

        let provider = registry.create(&config("openai")).unwrap();
        assert!(provider.health_probe().is_none());

        assert!(registry.create(&config("mystery")).is_none());
    }

    #[tokio::test]
    async fn test_missing_binary_is_not_installed() {
        let provider = ClaudeCodeProvider::new("conductor-test-no-such-binary-9f3a");
        let health = provider.probe(&CancellationToken::new()).await;
        assert!(!health.installed);
        assert!(!health.working);
        assert!(health.detail.unwrap().contains("not found"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_probe_runs_binary() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::TempDir::new().unwrap();
        let script = dir.path().join("fake-claude");
        std::fs::write(&script, "#!/bin/sh\necho 1.2.3\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let provider = ClaudeCodeProvider::new(script.to_string_lossy());
        let health = provider.probe(&CancellationToken::new()).await;
        assert!(health.installed);
        assert!(health.working);
        assert_eq!(health.version.as_deref(), Some("1.2.3"));
    }

    #[cfg(unix)]
    fn hanging_binary(dir: &tempfile::TempDir) -> String {
        use std::os::unix::fs::PermissionsExt;

        let script = dir.path().join("hanging-claude");
        std::fs::write(&script, "#!/bin/sh\nexec sleep 60\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        script.to_string_lossy().into_owned()
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_pre_cancelled_version_query_returns_promptly() {
        let dir = tempfile::TempDir::new().unwrap();
        let provider = ClaudeCodeProvider::new(hanging_binary(&dir));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let started = std::time::Instant::now();
        let health = provider.probe(&cancel).await;

        assert!(started.elapsed() < std::time::Duration::from_secs(5));
        assert!(health.installed);
        assert!(!health.working);
        assert_eq!(health.detail.as_deref(), Some("probe cancelled"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_version_query_cancelled_while_running() {
        let dir = tempfile::TempDir::new().unwrap();
        let provider = ClaudeCodeProvider::new(hanging_binary(&dir));
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            trigger.cancel();
        });
        let health = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            provider.probe(&cancel),
        )
        .await
        .expect("probe ignored cancellation");

        assert!(!health.working);
        assert_eq!(health.detail.as_deref(), Some("probe cancelled"));
    }
}
