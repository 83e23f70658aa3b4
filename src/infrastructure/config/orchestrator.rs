//! Orchestrator registry configuration.

use serde::Deserialize;

/// Orchestrators that must resolve as disabled even when a plugin is registered.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OrchestratorsConfig {
    pub disabled: Vec<String>,
}
