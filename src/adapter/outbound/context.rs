//! Context builder and type-resolution context adapters.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tracing::trace;

use crate::domain::{
    Deployment, DeploymentTopology, Location, LocationId, PaasDeploymentContext,
    SecretProviderConfigurationAndCredentials, TopologyDeploymentContext,
};
use crate::error::{Error, Result};
use crate::port::outbound::context::{ContextBuilder, TypeContext};

/// Assembles plugin contexts from already-resolved inputs.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardContextBuilder;

impl ContextBuilder for StandardContextBuilder {
    fn build_topology_context(
        &self,
        secrets: Option<SecretProviderConfigurationAndCredentials>,
        deployment: &Deployment,
        locations: BTreeMap<LocationId, Location>,
        topology: &DeploymentTopology,
    ) -> TopologyDeploymentContext {
        TopologyDeploymentContext {
            base: PaasDeploymentContext::new(deployment.clone(), topology.clone(), secrets),
            locations,
        }
    }
}

/// Type context that counts scope entries and exits.
///
/// Stands in for a type repository when topologies carry no type
/// definitions the runtime has to resolve.
#[derive(Debug, Default)]
pub struct TrackingTypeContext {
    open: AtomicUsize,
    entered: AtomicUsize,
    fail_enter: AtomicBool,
}

impl TrackingTypeContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scopes entered and not yet exited.
    #[must_use]
    pub fn open_scopes(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }

    /// Total successful entries.
    #[must_use]
    pub fn entered(&self) -> usize {
        self.entered.load(Ordering::SeqCst)
    }

    /// Make subsequent entries fail.
    pub fn fail_enter(&self, fail: bool) {
        self.fail_enter.store(fail, Ordering::SeqCst);
    }
}

impl TypeContext for TrackingTypeContext {
    fn enter(&self, archive_name: &str, archive_version: &str) -> Result<()> {
        if self.fail_enter.load(Ordering::SeqCst) {
            return Err(Error::TypeContext(format!(
                "archive {archive_name}:{archive_version} not found"
            )));
        }
        self.open.fetch_add(1, Ordering::SeqCst);
        self.entered.fetch_add(1, Ordering::SeqCst);
        trace!(archive = %archive_name, version = %archive_version, "Type context opened");
        Ok(())
    }

    fn exit(&self, archive_name: &str, archive_version: &str) {
        self.open.fetch_sub(1, Ordering::SeqCst);
        trace!(archive = %archive_name, version = %archive_version, "Type context closed");
    }
}
