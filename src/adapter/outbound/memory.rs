//! In-memory store implementing every storage port.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::RwLock;

use crate::domain::{
    Deployment, DeploymentId, DeploymentTopology, EnvironmentId, Location, LocationId,
    OrchestratorId,
};
use crate::error::{Error, Result};
use crate::port::outbound::store::{
    DeploymentLookup, LocationLookup, RuntimeTopologySource, TopologyStore,
};

/// In-memory store for deployments, topologies and locations.
#[derive(Debug, Default)]
pub struct MemoryStore {
    deployments: RwLock<HashMap<DeploymentId, Deployment>>,
    topologies: RwLock<HashMap<DeploymentId, DeploymentTopology>>,
    locations: RwLock<HashMap<LocationId, Location>>,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_deployment(&self, deployment: Deployment) {
        self.deployments
            .write()
            .insert(deployment.id.clone(), deployment);
    }

    /// Insert a topology without counting it as a save.
    pub fn insert_topology(&self, topology: DeploymentTopology) {
        self.topologies
            .write()
            .insert(topology.id.clone(), topology);
    }

    pub fn insert_location(&self, location: Location) {
        self.locations.write().insert(location.id.clone(), location);
    }

    /// End the active deployment of an environment.
    pub fn end_deployment(&self, environment_id: &EnvironmentId) -> bool {
        let mut deployments = self.deployments.write();
        let active = deployments
            .values_mut()
            .find(|d| &d.environment_id == environment_id && d.is_active());
        match active {
            Some(deployment) => {
                deployment.end();
                true
            }
            None => false,
        }
    }

    /// Start a new deployment of `topology`, ending the environment's active one.
    ///
    /// The deployment gets a generated id and the topology is rebound to it.
    pub fn deploy(
        &self,
        environment_id: impl Into<EnvironmentId>,
        orchestrator_id: impl Into<OrchestratorId>,
        mut topology: DeploymentTopology,
    ) -> DeploymentId {
        let environment_id = environment_id.into();
        self.end_deployment(&environment_id);

        let deployment = Deployment::new(DeploymentId::generate(), environment_id, orchestrator_id);
        let deployment_id = deployment.id.clone();
        topology.id = deployment_id.clone();
        self.insert_topology(topology);
        self.insert_deployment(deployment);
        deployment_id
    }

    #[must_use]
    pub fn topology(&self, deployment_id: &DeploymentId) -> Option<DeploymentTopology> {
        self.topologies.read().get(deployment_id).cloned()
    }

    /// Number of successful topology saves.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Make every subsequent save fail (or succeed again).
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

impl DeploymentLookup for MemoryStore {
    fn active_deployment(&self, environment_id: &EnvironmentId) -> Result<Option<Deployment>> {
        Ok(self
            .deployments
            .read()
            .values()
            .find(|d| &d.environment_id == environment_id && d.is_active())
            .cloned())
    }
}

impl RuntimeTopologySource for MemoryStore {
    fn runtime_topology(&self, environment_id: &EnvironmentId) -> Result<DeploymentTopology> {
        let deployment = self
            .active_deployment(environment_id)?
            .ok_or_else(|| Error::NoActiveDeployment {
                environment_id: environment_id.clone(),
            })?;
        self.topology(&deployment.id)
            .ok_or(Error::TopologyNotFound {
                deployment_id: deployment.id,
            })
    }
}

impl TopologyStore for MemoryStore {
    fn find(&self, deployment_id: &DeploymentId) -> Result<Option<DeploymentTopology>> {
        Ok(self.topology(deployment_id))
    }

    fn save(&self, topology: &DeploymentTopology) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(Error::Store(format!(
                "failed to save topology {}",
                topology.id
            )));
        }
        self.topologies
            .write()
            .insert(topology.id.clone(), topology.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl LocationLookup for MemoryStore {
    fn locations(&self, ids: &BTreeSet<LocationId>) -> Result<BTreeMap<LocationId, Location>> {
        let locations = self.locations.read();
        Ok(ids
            .iter()
            .filter_map(|id| locations.get(id).map(|l| (id.clone(), l.clone())))
            .collect())
    }
}
