//! Context assembly and type-resolution ports.

use std::collections::BTreeMap;

use crate::domain::{
    Deployment, DeploymentTopology, Location, LocationId, PaasDeploymentContext,
    SecretProviderConfigurationAndCredentials, TopologyDeploymentContext,
};
use crate::error::Result;

/// Builds the context a plugin needs to act on a deployment.
pub trait ContextBuilder: Send + Sync {
    fn build_topology_context(
        &self,
        secrets: Option<SecretProviderConfigurationAndCredentials>,
        deployment: &Deployment,
        locations: BTreeMap<LocationId, Location>,
        topology: &DeploymentTopology,
    ) -> TopologyDeploymentContext;

    /// Minimal context without locations.
    fn build_paas_context(
        &self,
        secrets: Option<SecretProviderConfigurationAndCredentials>,
        deployment: &Deployment,
        topology: &DeploymentTopology,
    ) -> PaasDeploymentContext {
        PaasDeploymentContext::new(deployment.clone(), topology.clone(), secrets)
    }
}

/// Type-resolution context bound to a topology's declared model.
///
/// Every successful [`enter`](TypeContext::enter) is paired with exactly one
/// [`exit`](TypeContext::exit) on the same archive.
pub trait TypeContext: Send + Sync {
    fn enter(&self, archive_name: &str, archive_version: &str) -> Result<()>;

    fn exit(&self, archive_name: &str, archive_version: &str);
}
