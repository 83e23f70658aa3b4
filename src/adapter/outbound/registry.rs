//! Orchestrator plugin registry.

use std::sync::Arc;

use dashmap::{DashMap, DashSet};
use tracing::{info, warn};

use crate::domain::OrchestratorId;
use crate::error::{Error, Result};
use crate::infrastructure::config::orchestrator::OrchestratorsConfig;
use crate::port::outbound::orchestrator::{OrchestratorPlugin, PluginRegistry};

/// Registry of live orchestrator plugins keyed by orchestrator id.
///
/// An orchestrator resolves as disabled when no plugin is registered for it
/// or when it has been explicitly disabled.
#[derive(Default)]
pub struct OrchestratorPluginRegistry {
    plugins: DashMap<OrchestratorId, Arc<dyn OrchestratorPlugin>>,
    disabled: DashSet<OrchestratorId>,
}

impl OrchestratorPluginRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry honouring the configured disabled orchestrators.
    #[must_use]
    pub fn from_config(config: &OrchestratorsConfig) -> Self {
        let registry = Self::new();
        for id in &config.disabled {
            registry.disable(&OrchestratorId::new(id.as_str()));
        }
        registry
    }

    /// Register (or replace) the plugin serving an orchestrator.
    pub fn register(&self, orchestrator_id: impl Into<OrchestratorId>, plugin: Arc<dyn OrchestratorPlugin>) {
        let orchestrator_id = orchestrator_id.into();
        info!(orchestrator_id = %orchestrator_id, "Registered orchestrator plugin");
        self.plugins.insert(orchestrator_id, plugin);
    }

    /// Remove the plugin serving an orchestrator. Returns whether one was registered.
    pub fn unregister(&self, orchestrator_id: &OrchestratorId) -> bool {
        self.plugins.remove(orchestrator_id).is_some()
    }

    pub fn disable(&self, orchestrator_id: &OrchestratorId) {
        self.disabled.insert(orchestrator_id.clone());
    }

    pub fn enable(&self, orchestrator_id: &OrchestratorId) {
        self.disabled.remove(orchestrator_id);
    }

    #[must_use]
    pub fn is_enabled(&self, orchestrator_id: &OrchestratorId) -> bool {
        !self.disabled.contains(orchestrator_id) && self.plugins.contains_key(orchestrator_id)
    }

    /// Number of registered plugins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Check if registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl PluginRegistry for OrchestratorPluginRegistry {
    fn get_or_fail(&self, orchestrator_id: &OrchestratorId) -> Result<Arc<dyn OrchestratorPlugin>> {
        let plugin = if self.disabled.contains(orchestrator_id) {
            None
        } else {
            self.plugins.get(orchestrator_id).map(|entry| Arc::clone(entry.value()))
        };
        plugin.ok_or_else(|| {
            warn!(orchestrator_id = %orchestrator_id, "Orchestrator is disabled or not configured");
            Error::OrchestratorDisabled {
                orchestrator_id: orchestrator_id.clone(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::plugin::RecordingPlugin;

    #[test]
    fn resolves_registered_plugin() {
        let registry = OrchestratorPluginRegistry::new();
        registry.register("mock", Arc::new(RecordingPlugin::new()));
        assert!(registry.get_or_fail(&OrchestratorId::new("mock")).is_ok());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unknown_orchestrator_is_disabled() {
        let registry = OrchestratorPluginRegistry::new();
        assert!(matches!(
            registry.get_or_fail(&OrchestratorId::new("missing")),
            Err(Error::OrchestratorDisabled { .. })
        ));
    }

    #[test]
    fn disabled_orchestrator_does_not_resolve_until_enabled() {
        let config = OrchestratorsConfig {
            disabled: vec!["mock".into()],
        };
        let registry = OrchestratorPluginRegistry::from_config(&config);
        registry.register("mock", Arc::new(RecordingPlugin::new()));
        let id = OrchestratorId::new("mock");

        assert!(!registry.is_enabled(&id));
        assert!(registry.get_or_fail(&id).is_err());

        registry.enable(&id);
        assert!(registry.get_or_fail(&id).is_ok());

        assert!(registry.unregister(&id));
        assert!(registry.get_or_fail(&id).is_err());
    }
}
