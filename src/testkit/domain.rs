//! Builders for domain primitives used across tests.

use serde_json::json;

use crate::domain::topology::{CLUSTER_CONTROLLER, DEFAULT_INSTANCES, SCALABLE};
use crate::domain::{
    Capability, DeploymentTopology, Location, NodeTemplate, SecretProviderConfiguration,
};

/// Deployment id used by the canned fixtures.
pub const DEPLOYMENT: &str = "dep-1";

/// Location every canned topology is placed on.
pub const LOCATION: &str = "loc-1";

/// Compute node with a scalable capability at `instances`.
pub fn scalable_node(name: &str, instances: i64) -> NodeTemplate {
    NodeTemplate::new(name, "tosca.nodes.Compute").with_capability(
        "scalable",
        Capability::new(SCALABLE).with_property(DEFAULT_INSTANCES, instances),
    )
}

/// Self-managed cluster node with a cluster-controller capability at `instances`.
pub fn cluster_controller_node(name: &str, instances: i64) -> NodeTemplate {
    NodeTemplate::new(name, "org.alien4cloud.nodes.Cluster").with_capability(
        "cluster_controller",
        Capability::new(CLUSTER_CONTROLLER).with_property(DEFAULT_INSTANCES, instances),
    )
}

/// Node with neither scaling capability.
pub fn plain_node(name: &str) -> NodeTemplate {
    NodeTemplate::new(name, "tosca.nodes.SoftwareComponent")
}

/// Topology for [`DEPLOYMENT`] holding `nodes`, placed on [`LOCATION`].
pub fn topology(nodes: Vec<NodeTemplate>) -> DeploymentTopology {
    nodes.into_iter().fold(
        DeploymentTopology::new(DEPLOYMENT, "app-topology", "1.0.0-SNAPSHOT")
            .with_placement("_A4C_ALL", LOCATION),
        DeploymentTopology::with_node,
    )
}

/// Location configured with a secret provider named `provider`.
pub fn location_with_secret_provider(id: &str, provider: &str) -> Location {
    Location::new(id, format!("Location {id}"), "openstack").with_secret_provider(
        SecretProviderConfiguration::new(provider, json!({ "url": format!("https://{provider}.local") })),
    )
}
