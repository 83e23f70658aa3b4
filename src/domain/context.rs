//! Opaque contexts handed to orchestrator plugins.

use std::collections::BTreeMap;

use super::deployment::Deployment;
use super::id::LocationId;
use super::location::Location;
use super::secret::SecretProviderConfigurationAndCredentials;
use super::topology::DeploymentTopology;

/// Minimal context: the deployment and its runtime topology.
#[derive(Debug, Clone)]
pub struct PaasDeploymentContext {
    pub deployment: Deployment,
    pub topology: DeploymentTopology,
    pub secrets: Option<SecretProviderConfigurationAndCredentials>,
}

impl PaasDeploymentContext {
    pub fn new(
        deployment: Deployment,
        topology: DeploymentTopology,
        secrets: Option<SecretProviderConfigurationAndCredentials>,
    ) -> Self {
        Self {
            deployment,
            topology,
            secrets,
        }
    }

    /// Orchestrator-side identifier of the deployment.
    #[must_use]
    pub fn deployment_paas_id(&self) -> &str {
        self.deployment.id.as_str()
    }
}

/// Full context including the resolved locations of the topology.
#[derive(Debug, Clone)]
pub struct TopologyDeploymentContext {
    pub base: PaasDeploymentContext,
    pub locations: BTreeMap<LocationId, Location>,
}

impl TopologyDeploymentContext {
    #[must_use]
    pub fn deployment(&self) -> &Deployment {
        &self.base.deployment
    }

    #[must_use]
    pub fn topology(&self) -> &DeploymentTopology {
        &self.base.topology
    }

    #[must_use]
    pub fn secrets(&self) -> Option<&SecretProviderConfigurationAndCredentials> {
        self.base.secrets.as_ref()
    }
}
