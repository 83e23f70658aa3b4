//! Composition root wiring the runtime service from configuration.

use std::sync::Arc;

use tracing::info;

use crate::adapter::outbound::context::{StandardContextBuilder, TrackingTypeContext};
use crate::adapter::outbound::memory::MemoryStore;
use crate::adapter::outbound::registry::OrchestratorPluginRegistry;
use crate::application::runtime::{DeploymentRuntimeService, RuntimeCollaborators};
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::context::TypeContext;

/// Build the plugin registry described by the configuration.
#[must_use]
pub fn build_plugin_registry(config: &Config) -> Arc<OrchestratorPluginRegistry> {
    Arc::new(OrchestratorPluginRegistry::from_config(&config.orchestrators))
}

/// Wire a runtime service over a single in-memory store.
#[must_use]
pub fn build_in_memory_runtime(
    config: &Config,
    store: Arc<MemoryStore>,
    plugins: Arc<OrchestratorPluginRegistry>,
    type_context: Arc<dyn TypeContext>,
) -> DeploymentRuntimeService {
    let collaborators = RuntimeCollaborators {
        deployments: store.clone(),
        runtime_topologies: store.clone(),
        topologies: store.clone(),
        locations: store,
        plugins,
        contexts: Arc::new(StandardContextBuilder),
        type_context,
    };
    info!(
        max_instances = ?config.scaling.max_instances,
        disabled = config.orchestrators.disabled.len(),
        "Deployment runtime ready"
    );
    DeploymentRuntimeService::new(collaborators).with_scaling_limits(config.scaling.limits())
}

/// Wire a runtime service with a fresh store, registry and type context.
#[must_use]
pub fn build_default_runtime(
    config: &Config,
) -> (
    DeploymentRuntimeService,
    Arc<MemoryStore>,
    Arc<OrchestratorPluginRegistry>,
) {
    let store = Arc::new(MemoryStore::new());
    let plugins = build_plugin_registry(config);
    let runtime = build_in_memory_runtime(
        config,
        store.clone(),
        plugins.clone(),
        Arc::new(TrackingTypeContext::new()),
    );
    (runtime, store, plugins)
}
