//! Storage-agnostic domain types: deployments, topologies, locations, requests.
//!
//! The runtime borrows these for one request. It never owns their storage.

pub mod context;
pub mod deployment;
pub mod id;
pub mod location;
pub mod operation;
pub mod secret;
pub mod topology;

pub use context::{PaasDeploymentContext, TopologyDeploymentContext};
pub use deployment::Deployment;
pub use id::{DeploymentId, EnvironmentId, LocationId, OrchestratorId};
pub use location::{Location, SecretProviderConfiguration};
pub use operation::{NodeOperationExecRequest, OperationExecRequest, OperationOutput};
pub use secret::{SecretProviderConfigurationAndCredentials, SecretRequest};
pub use topology::{Capability, DeploymentTopology, NodeTemplate, PropertyValue};
