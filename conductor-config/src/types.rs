use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Contents of the Conductor configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConductorConfig {
    /// Key into `providers` used when a workflow does not pick one
    #[serde(default)]
    pub default_provider: Option<String>,
    /// Configured providers by name
    #[serde(default)]
    pub providers: BTreeMap<String, ProviderConfig>,
}

impl ConductorConfig {
    /// The default provider's name and settings, if it is configured
    pub fn primary_provider(&self) -> Option<(&str, &ProviderConfig)> {
        let name = self.default_provider.as_deref()?;
        self.providers
            .get_key_value(name)
            .map(|(name, config)| (name.as_str(), config))
    }
}

/// A configured provider
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type tag selecting the implementation
    #[serde(rename = "type")]
    pub provider_type: String,
    /// Credential; never logged or echoed
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// Executable override for CLI providers
    #[serde(default)]
    pub binary: Option<String>,
    /// Default model
    #[serde(default)]
    pub model: Option<String>,
}

impl ProviderConfig {
    /// True if a non-empty credential is present
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider_type", &self.provider_type)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("binary", &self.binary)
            .field("model", &self.model)
            .finish()
    }
}
