//! Infrastructure locations and their secret-provider configuration.

use serde::{Deserialize, Serialize};

use super::id::LocationId;

/// Secret provider configured on a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecretProviderConfiguration {
    /// Name of the secret-provider plugin.
    pub plugin_name: String,
    /// Provider-specific settings, opaque to the runtime.
    #[serde(default)]
    pub configuration: serde_json::Value,
}

impl SecretProviderConfiguration {
    pub fn new(plugin_name: impl Into<String>, configuration: serde_json::Value) -> Self {
        Self {
            plugin_name: plugin_name.into(),
            configuration,
        }
    }
}

/// An infrastructure location a topology can be placed on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    pub infrastructure_type: String,
    #[serde(default)]
    pub secret_provider: Option<SecretProviderConfiguration>,
}

impl Location {
    pub fn new(
        id: impl Into<LocationId>,
        name: impl Into<String>,
        infrastructure_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            infrastructure_type: infrastructure_type.into(),
            secret_provider: None,
        }
    }

    #[must_use]
    pub fn with_secret_provider(mut self, secret_provider: SecretProviderConfiguration) -> Self {
        self.secret_provider = Some(secret_provider);
        self
    }

    /// Name of the configured secret-provider plugin, if any.
    #[must_use]
    pub fn secret_provider_name(&self) -> Option<&str> {
        self.secret_provider
            .as_ref()
            .map(|provider| provider.plugin_name.as_str())
    }
}
