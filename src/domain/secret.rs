//! Request-scoped secret-provider configuration and credentials.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::location::SecretProviderConfiguration;

/// A matched location's secret-provider configuration combined with the
/// credentials supplied by the caller.
///
/// Never persisted or cached; lives for the duration of one request.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct SecretProviderConfigurationAndCredentials {
    pub secret_provider_configuration: SecretProviderConfiguration,
    pub credentials: serde_json::Value,
}

impl SecretProviderConfigurationAndCredentials {
    pub fn new(configuration: SecretProviderConfiguration, credentials: serde_json::Value) -> Self {
        Self {
            secret_provider_configuration: configuration,
            credentials,
        }
    }

    #[must_use]
    pub fn plugin_name(&self) -> &str {
        &self.secret_provider_configuration.plugin_name
    }
}

// Credentials stay out of logs.
impl fmt::Debug for SecretProviderConfigurationAndCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretProviderConfigurationAndCredentials")
            .field(
                "secret_provider_configuration",
                &self.secret_provider_configuration,
            )
            .field("credentials", &"<redacted>")
            .finish()
    }
}

/// Secret provider requested by a caller, with the credentials to hand it.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct SecretRequest {
    pub plugin_name: String,
    #[serde(default)]
    pub credentials: serde_json::Value,
}

impl SecretRequest {
    pub fn new(plugin_name: impl Into<String>, credentials: serde_json::Value) -> Self {
        Self {
            plugin_name: plugin_name.into(),
            credentials,
        }
    }
}

impl fmt::Debug for SecretRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretRequest")
            .field("plugin_name", &self.plugin_name)
            .field("credentials", &"<redacted>")
            .finish()
    }
}
