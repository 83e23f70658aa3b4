//! A runtime service wired over in-memory adapters and a [`RecordingPlugin`].

use std::sync::Arc;

use crate::adapter::outbound::context::TrackingTypeContext;
use crate::adapter::outbound::memory::MemoryStore;
use crate::adapter::outbound::registry::OrchestratorPluginRegistry;
use crate::application::runtime::DeploymentRuntimeService;
use crate::domain::{Deployment, DeploymentId, DeploymentTopology, EnvironmentId, Location};
use crate::infrastructure::bootstrap::{build_in_memory_runtime, build_plugin_registry};
use crate::infrastructure::config::settings::Config;

use super::domain::{DEPLOYMENT, LOCATION};
use super::plugin::RecordingPlugin;

/// Environment of the canned deployment.
pub const ENVIRONMENT: &str = "env-1";

/// Orchestrator serving the canned deployment.
pub const ORCHESTRATOR: &str = "mock-orchestrator";

/// Runtime service plus handles on every collaborator it was wired with.
pub struct RuntimeFixture {
    pub runtime: DeploymentRuntimeService,
    pub store: Arc<MemoryStore>,
    pub registry: Arc<OrchestratorPluginRegistry>,
    pub plugin: Arc<RecordingPlugin>,
    pub type_context: Arc<TrackingTypeContext>,
}

impl RuntimeFixture {
    /// Active deployment of [`ENVIRONMENT`] on [`ORCHESTRATOR`] with `topology`.
    pub fn new(topology: DeploymentTopology) -> Self {
        Self::with_plugin(topology, RecordingPlugin::new(), &Config::default())
    }

    pub fn with_plugin(topology: DeploymentTopology, plugin: RecordingPlugin, config: &Config) -> Self {
        let store = Arc::new(MemoryStore::new());
        store.insert_deployment(Deployment::new(DEPLOYMENT, ENVIRONMENT, ORCHESTRATOR));
        store.insert_topology(topology);
        store.insert_location(Location::new(LOCATION, "Default location", "openstack"));

        let registry = build_plugin_registry(config);
        let plugin = Arc::new(plugin);
        registry.register(ORCHESTRATOR, plugin.clone());

        let type_context = Arc::new(TrackingTypeContext::new());
        let runtime = build_in_memory_runtime(
            config,
            store.clone(),
            registry.clone(),
            type_context.clone(),
        );

        Self {
            runtime,
            store,
            registry,
            plugin,
            type_context,
        }
    }

    #[must_use]
    pub fn environment(&self) -> EnvironmentId {
        EnvironmentId::new(ENVIRONMENT)
    }

    /// Persisted topology of the canned deployment.
    #[must_use]
    pub fn persisted(&self) -> DeploymentTopology {
        self.store
            .topology(&DeploymentId::new(DEPLOYMENT))
            .expect("canned topology is always present")
    }

    /// Persisted `default_instances` of `node_id` on `capability`.
    #[must_use]
    pub fn instances(&self, node_id: &str, capability: &'static str) -> i64 {
        self.persisted()
            .scaling_property(
                node_id,
                capability,
                crate::domain::topology::DEFAULT_INSTANCES,
            )
            .expect("node carries the scaling property")
    }
}
