//! Deployment runtime orchestration.
//!
//! Drives lifecycle operations on running deployments: custom operations,
//! maintenance-mode toggles and scaling. Every entry point resolves the
//! active deployment, its runtime topology and its orchestrator plugin before
//! doing anything else, and fails fast when one of them is missing.
//!
//! # Modules
//!
//! - `operation`: custom operation trigger
//! - `maintenance`: deployment- and instance-wide maintenance switches
//! - [`scale`]: optimistic scale with rollback on plugin failure
//! - [`scope`]: type-resolution scope guard
//! - [`secret`]: secret-provider resolution against deployed locations

mod maintenance;
mod operation;
pub mod scale;
pub mod scope;
pub mod secret;

use std::sync::Arc;

use crate::domain::{
    Deployment, DeploymentTopology, EnvironmentId, OperationExecRequest, OperationOutput,
    SecretProviderConfigurationAndCredentials,
};
use crate::error::{Error, Result};
use crate::port::inbound::runtime::DeploymentRuntime;
use crate::port::outbound::context::{ContextBuilder, TypeContext};
use crate::port::outbound::orchestrator::{OrchestratorPlugin, PaasCallback, PluginRegistry};
use crate::port::outbound::store::{
    DeploymentLookup, LocationLookup, RuntimeTopologySource, TopologyStore,
};

pub use scale::{ScaleOutput, ScalePhase, ScalingLimits};
pub use secret::select_secret_configuration;

/// External collaborators the runtime borrows for each request.
#[derive(Clone)]
pub struct RuntimeCollaborators {
    pub deployments: Arc<dyn DeploymentLookup>,
    pub runtime_topologies: Arc<dyn RuntimeTopologySource>,
    pub topologies: Arc<dyn TopologyStore>,
    pub locations: Arc<dyn LocationLookup>,
    pub plugins: Arc<dyn PluginRegistry>,
    pub contexts: Arc<dyn ContextBuilder>,
    pub type_context: Arc<dyn TypeContext>,
}

/// Operations performed on a running deployment.
pub struct DeploymentRuntimeService {
    collaborators: RuntimeCollaborators,
    limits: ScalingLimits,
}

/// Deployment, runtime topology and plugin resolved for one request.
struct Resolved {
    deployment: Deployment,
    topology: DeploymentTopology,
    plugin: Arc<dyn OrchestratorPlugin>,
}

impl DeploymentRuntimeService {
    #[must_use]
    pub fn new(collaborators: RuntimeCollaborators) -> Self {
        Self {
            collaborators,
            limits: ScalingLimits::default(),
        }
    }

    #[must_use]
    pub fn with_scaling_limits(mut self, limits: ScalingLimits) -> Self {
        self.limits = limits;
        self
    }

    #[must_use]
    pub fn scaling_limits(&self) -> ScalingLimits {
        self.limits
    }

    fn active_deployment(&self, environment_id: &EnvironmentId) -> Result<Deployment> {
        self.collaborators
            .deployments
            .active_deployment(environment_id)?
            .ok_or_else(|| Error::NoActiveDeployment {
                environment_id: environment_id.clone(),
            })
    }

    fn resolve_runtime(&self, environment_id: &EnvironmentId) -> Result<Resolved> {
        let deployment = self.active_deployment(environment_id)?;
        let topology = self
            .collaborators
            .runtime_topologies
            .runtime_topology(&deployment.environment_id)?;
        let plugin = self
            .collaborators
            .plugins
            .get_or_fail(&deployment.orchestrator_id)?;
        Ok(Resolved {
            deployment,
            topology,
            plugin,
        })
    }
}

impl DeploymentRuntime for DeploymentRuntimeService {
    fn trigger_operation(
        &self,
        request: OperationExecRequest,
        callback: PaasCallback<OperationOutput>,
    ) -> Result<()> {
        DeploymentRuntimeService::trigger_operation(self, request, callback)
    }

    fn switch_maintenance_mode(&self, environment_id: &EnvironmentId, on: bool) -> Result<()> {
        DeploymentRuntimeService::switch_maintenance_mode(self, environment_id, on)
    }

    fn switch_instance_maintenance_mode(
        &self,
        environment_id: &EnvironmentId,
        node_id: &str,
        instance_id: &str,
        on: bool,
    ) -> Result<()> {
        DeploymentRuntimeService::switch_instance_maintenance_mode(
            self,
            environment_id,
            node_id,
            instance_id,
            on,
        )
    }

    fn scale(
        &self,
        secrets: Option<SecretProviderConfigurationAndCredentials>,
        environment_id: &EnvironmentId,
        node_id: &str,
        delta: i32,
        callback: PaasCallback<ScaleOutput>,
    ) -> Result<()> {
        DeploymentRuntimeService::scale(self, secrets, environment_id, node_id, delta, callback)
    }
}
