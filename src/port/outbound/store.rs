//! Persistence and lookup ports for deployments, topologies and locations.
//!
//! These are synchronous: the scale rollback writes from inside a plugin
//! completion callback, which may run on any thread.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{
    Deployment, DeploymentId, DeploymentTopology, EnvironmentId, Location, LocationId,
};
use crate::error::Result;

/// Active deployment lookup.
pub trait DeploymentLookup: Send + Sync {
    /// The active deployment of an environment, if any.
    fn active_deployment(&self, environment_id: &EnvironmentId) -> Result<Option<Deployment>>;
}

/// Derived runtime topology view used by the read-mostly entry points.
pub trait RuntimeTopologySource: Send + Sync {
    /// Runtime topology of the environment's active deployment.
    fn runtime_topology(&self, environment_id: &EnvironmentId) -> Result<DeploymentTopology>;
}

/// Authoritative persisted topology record.
pub trait TopologyStore: Send + Sync {
    /// Load the persisted topology of a deployment.
    fn find(&self, deployment_id: &DeploymentId) -> Result<Option<DeploymentTopology>>;

    /// Persist a topology, replacing the previous record.
    fn save(&self, topology: &DeploymentTopology) -> Result<()>;
}

/// Location resolution.
pub trait LocationLookup: Send + Sync {
    /// Resolve location ids to full records. Unknown ids are skipped.
    fn locations(&self, ids: &BTreeSet<LocationId>) -> Result<BTreeMap<LocationId, Location>>;

    /// Locations referenced by a topology.
    fn locations_of(&self, topology: &DeploymentTopology) -> Result<BTreeMap<LocationId, Location>> {
        self.locations(&topology.location_ids())
    }
}
