//! Layered health checks
//!
//! Checks run in a fixed order: configuration, provider selection, provider
//! liveness, environment overrides. A failure in either of the first two
//! stops the chain because nothing after them can run meaningfully.

mod providers;

pub use providers::{
    ApiProvider, ClaudeCodeProvider, HealthProbe, Provider, ProviderFactory, ProviderHealth,
    ProviderRegistry,
};

use conductor_common::{sanitize_message, HealthCheck};
use conductor_config::{active_env_overrides, load_config, ConductorConfig, ConfigError};
use std::path::Path;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Upper bound for a full health run
pub const HEALTH_DEADLINE: Duration = Duration::from_secs(30);

/// Configuration file present and parseable
pub const CHECK_CONFIG: &str = "config";
/// A default provider is configured
pub const CHECK_PROVIDER: &str = "provider";
/// The default provider responds
pub const CHECK_PROVIDER_HEALTH: &str = "provider-health";
/// Recognised environment overrides
pub const CHECK_ENVIRONMENT: &str = "environment";

/// Run every check against the configuration at `config_path`
pub async fn run_health_checks(
    config_path: Result<&Path, &ConfigError>,
    registry: &ProviderRegistry,
    deadline: Instant,
    cancel: &CancellationToken,
) -> Vec<HealthCheck> {
    let mut checks = Vec::new();

    let config = match config_path {
        Ok(path) => check_config(path, &mut checks),
        Err(e) => {
            checks.push(HealthCheck::fail(
                CHECK_CONFIG,
                e.to_string(),
                "Set CONDUCTOR_CONFIG or run `conductor setup` to create a configuration",
            ));
            None
        }
    };
    let Some(config) = config else {
        return checks;
    };

    let provider = check_provider(&config, &mut checks);
    let Some((name, provider_config)) = provider else {
        return checks;
    };

    checks.push(check_provider_health(name, provider_config, registry, deadline, cancel).await);
    checks.push(check_environment());

    checks
}

fn check_config(path: &Path, checks: &mut Vec<HealthCheck>) -> Option<ConductorConfig> {
    match load_config(path) {
        Ok(config) => {
            checks.push(HealthCheck::pass(
                CHECK_CONFIG,
                format!("configuration loaded from {}", path.display()),
            ));
            Some(config)
        }
        Err(e @ ConfigError::NotFound { .. }) => {
            checks.push(HealthCheck::fail(
                CHECK_CONFIG,
                e.to_string(),
                "Run `conductor setup` to create a configuration",
            ));
            None
        }
        Err(e) => {
            checks.push(HealthCheck::fail(
                CHECK_CONFIG,
                sanitize_message(&e.to_string()),
                "Fix the configuration file or recreate it with `conductor setup`",
            ));
            None
        }
    }
}

fn check_provider<'a>(
    config: &'a ConductorConfig,
    checks: &mut Vec<HealthCheck>,
) -> Option<(&'a str, &'a conductor_config::ProviderConfig)> {
    match config.primary_provider() {
        Some((name, provider)) => {
            checks.push(HealthCheck::pass(
                CHECK_PROVIDER,
                format!("default provider '{name}' ({})", provider.provider_type),
            ));
            Some((name, provider))
        }
        None => {
            let message = match &config.default_provider {
                Some(name) => format!("default provider '{name}' is not configured"),
                None => "no default provider configured".to_string(),
            };
            checks.push(HealthCheck::fail(
                CHECK_PROVIDER,
                message,
                "Add an entry under `providers` and name it in `default_provider`",
            ));
            None
        }
    }
}

async fn check_provider_health(
    name: &str,
    config: &conductor_config::ProviderConfig,
    registry: &ProviderRegistry,
    deadline: Instant,
    cancel: &CancellationToken,
) -> HealthCheck {
    let Some(provider) = registry.create(config) else {
        return HealthCheck::fail(
            CHECK_PROVIDER_HEALTH,
            format!("unknown provider type '{}'", config.provider_type),
            format!(
                "Use one of the supported provider types: {}",
                registry.types().join(", ")
            ),
        );
    };

    let Some(probe) = provider.health_probe() else {
        return HealthCheck::warn(
            CHECK_PROVIDER_HEALTH,
            format!(
                "health probe not supported for provider '{name}' ({})",
                provider.name()
            ),
            None,
        );
    };

    let health = match tokio::time::timeout_at(deadline, probe.probe(cancel)).await {
        Ok(health) => health,
        Err(_) => {
            tracing::warn!(provider = name, "provider health probe timed out");
            return HealthCheck::warn(
                CHECK_PROVIDER_HEALTH,
                format!("provider '{name}' did not respond before the deadline"),
                Some("Check that the provider responds to a version query".to_string()),
            );
        }
    };

    health_to_check(name, &health)
}

/// Map a probe result onto a check; remediation follows installed, then
/// authenticated, then working
pub fn health_to_check(name: &str, health: &ProviderHealth) -> HealthCheck {
    let detail = health
        .detail
        .as_deref()
        .map(|d| format!(": {}", sanitize_message(d)))
        .unwrap_or_default();

    if !health.installed {
        HealthCheck::fail(
            CHECK_PROVIDER_HEALTH,
            format!("provider '{name}' is not installed{detail}"),
            "Install the provider and make sure it is on PATH",
        )
    } else if !health.authenticated {
        HealthCheck::fail(
            CHECK_PROVIDER_HEALTH,
            format!("provider '{name}' is not authenticated{detail}"),
            "Log in to the provider or set its API key",
        )
    } else if !health.working {
        HealthCheck::warn(
            CHECK_PROVIDER_HEALTH,
            format!("provider '{name}' is installed but not responding{detail}"),
            Some("Run the provider manually to diagnose the problem".to_string()),
        )
    } else {
        let version = health
            .version
            .as_deref()
            .map(|v| format!(" (version {})", sanitize_message(v)))
            .unwrap_or_default();
        HealthCheck::pass(
            CHECK_PROVIDER_HEALTH,
            format!("provider '{name}' is working{version}"),
        )
    }
}

fn check_environment() -> HealthCheck {
    let active = active_env_overrides();
    let message = if active.is_empty() {
        "no environment overrides set".to_string()
    } else {
        format!(
            "{} environment override(s) set: {}",
            active.len(),
            active.join(", ")
        )
    };
    HealthCheck::pass(CHECK_ENVIRONMENT, message)
}
