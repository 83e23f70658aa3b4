//! Scale orchestration.
//!
//! Scaling writes the requested instance count to the persisted topology
//! before the plugin is called, then restores the previous count if the
//! plugin reports failure:
//!
//! ```text
//! Idle ──write──▶ OptimisticWriteApplied ──dispatch──▶ Dispatched
//!                                                        │
//!                           success ◀────────────────────┤
//!                              │                         │ failure
//!                              ▼                         ▼
//!                          Committed                 RolledBack ──callback──▶ Reported
//! ```
//!
//! The store write and the remote call are not atomic. The persisted count
//! converges to either the requested or the original value. Two concurrent
//! scale requests on the same node race on the persisted count (last write
//! wins).

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::scope::TypeScope;
use super::DeploymentRuntimeService;
use crate::domain::topology::{CLUSTER_CONTROLLER, DEFAULT_INSTANCES, SCALABLE};
use crate::domain::{
    Deployment, DeploymentId, DeploymentTopology, EnvironmentId, NodeOperationExecRequest, NodeTemplate,
    OperationOutput, SecretProviderConfigurationAndCredentials,
};
use crate::error::{Error, Result};
use crate::port::outbound::orchestrator::{OrchestratorPlugin, PaasCallback};
use crate::port::outbound::store::TopologyStore;

/// Lifecycle of a single scale request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalePhase {
    Idle,
    OptimisticWriteApplied,
    Dispatched,
    Committed,
    RolledBack,
    Reported,
}

impl ScalePhase {
    /// Whether `next` directly follows this phase.
    #[must_use]
    pub const fn can_advance_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::OptimisticWriteApplied)
                | (Self::OptimisticWriteApplied, Self::Dispatched)
                | (Self::Dispatched, Self::Committed)
                | (Self::Dispatched, Self::RolledBack)
                | (Self::RolledBack, Self::Reported)
        )
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Committed | Self::Reported)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::OptimisticWriteApplied => "optimistic_write_applied",
            Self::Dispatched => "dispatched",
            Self::Committed => "committed",
            Self::RolledBack => "rolled_back",
            Self::Reported => "reported",
        }
    }
}

impl fmt::Display for ScalePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Success payload of a scale request, as returned by the plugin.
#[derive(Debug, Clone, PartialEq)]
pub enum ScaleOutput {
    /// Output of the dedicated scale entry point (plain scalable nodes).
    Node(serde_json::Value),
    /// Output of the cluster-control scale operation.
    Cluster(OperationOutput),
}

/// Bounds on the instance count a scale request may produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScalingLimits {
    /// Upper bound on the resulting count. `None` means unbounded.
    pub max_instances: Option<i64>,
}

impl ScalingLimits {
    /// Instance count after applying `delta` to `current`.
    pub fn target(&self, node_id: &str, current: i64, delta: i32) -> Result<i64> {
        current
            .checked_add(i64::from(delta))
            .filter(|expected| *expected >= 0)
            .filter(|expected| self.max_instances.map_or(true, |max| *expected <= max))
            .ok_or_else(|| Error::InvalidScale {
                node_id: node_id.to_string(),
                current,
                delta,
            })
    }
}

/// Scaling strategy selected by the node's capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScaleTarget {
    ClusterController,
    Scalable,
}

impl ScaleTarget {
    /// The cluster-controller capability takes precedence.
    fn of(node: &NodeTemplate) -> Option<Self> {
        if node.has_capability(CLUSTER_CONTROLLER) {
            Some(Self::ClusterController)
        } else if node.has_capability(SCALABLE) {
            Some(Self::Scalable)
        } else {
            None
        }
    }

    const fn capability(self) -> &'static str {
        match self {
            Self::ClusterController => CLUSTER_CONTROLLER,
            Self::Scalable => SCALABLE,
        }
    }
}

struct ScaleTracker {
    node_id: String,
    phase: ScalePhase,
}

impl ScaleTracker {
    fn new(node_id: &str) -> Self {
        Self {
            node_id: node_id.to_string(),
            phase: ScalePhase::Idle,
        }
    }

    fn advance(&mut self, next: ScalePhase) -> Result<()> {
        if !self.phase.can_advance_to(next) {
            return Err(Error::IllegalState(format!(
                "scale of {} cannot move from {} to {}",
                self.node_id, self.phase, next
            )));
        }
        debug!(node_id = %self.node_id, from = %self.phase, to = %next, "Scale phase");
        self.phase = next;
        Ok(())
    }

    /// Advance from inside a completion callback, where there is no caller to
    /// return an error to.
    fn record(&mut self, next: ScalePhase) {
        if let Err(err) = self.advance(next) {
            warn!(error = %err, "Unexpected scale phase transition");
        }
    }
}

/// Compensating write restoring the pre-dispatch instance count.
///
/// Reloads the persisted record and resets only the scaled node's count.
struct Rollback {
    store: Arc<dyn TopologyStore>,
    deployment_id: DeploymentId,
    node_id: String,
    capability: &'static str,
    previous: i64,
    expected: i64,
}

impl Rollback {
    fn apply(self) {
        info!(
            deployment_id = %self.deployment_id,
            node_id = %self.node_id,
            from = self.expected,
            to = self.previous,
            "Failed to scale node, rolling back to {}",
            self.previous
        );
        if let Err(err) = self.restore() {
            warn!(
                node_id = %self.node_id,
                error = %err,
                "Rollback write failed, persisted instance count left at {}",
                self.expected
            );
        }
    }

    fn restore(&self) -> Result<()> {
        let mut topology =
            self.store
                .find(&self.deployment_id)?
                .ok_or_else(|| Error::TopologyNotFound {
                    deployment_id: self.deployment_id.clone(),
                })?;
        topology.set_scaling_property(
            &self.node_id,
            self.capability,
            DEFAULT_INSTANCES,
            self.previous,
        )?;
        self.store.save(&topology)
    }
}

/// Wrap the caller's callback with commit/rollback handling.
fn settle<T: Send + 'static>(
    mut tracker: ScaleTracker,
    rollback: Rollback,
    callback: PaasCallback<ScaleOutput>,
    wrap: fn(T) -> ScaleOutput,
) -> PaasCallback<T> {
    PaasCallback::new(move |result| match result {
        Ok(data) => {
            tracker.record(ScalePhase::Committed);
            callback.on_success(wrap(data));
        }
        Err(err) => {
            rollback.apply();
            tracker.record(ScalePhase::RolledBack);
            tracker.record(ScalePhase::Reported);
            callback.on_failure(err);
        }
    })
}

impl DeploymentRuntimeService {
    /// Scale a node of the environment's active deployment by `delta` instances.
    ///
    /// Reads and writes the persisted topology record. Every resolution
    /// failure is returned before anything is written. Once the plugin has
    /// been called the outcome only reaches `callback`; on failure the
    /// previous instance count of this node is persisted before `callback`
    /// sees the plugin's error.
    ///
    /// A delta that would take the count below zero, or above the configured
    /// `max_instances`, fails with [`Error::InvalidScale`] before any write
    /// and the plugin is never called.
    pub fn scale(
        &self,
        secrets: Option<SecretProviderConfigurationAndCredentials>,
        environment_id: &EnvironmentId,
        node_id: &str,
        delta: i32,
        callback: PaasCallback<ScaleOutput>,
    ) -> Result<()> {
        let deployment = self.active_deployment(environment_id)?;
        let plugin = self
            .collaborators
            .plugins
            .get_or_fail(&deployment.orchestrator_id)?;
        let topology = self
            .collaborators
            .topologies
            .find(&deployment.id)?
            .ok_or_else(|| Error::TopologyNotFound {
                deployment_id: deployment.id.clone(),
            })?;

        let _scope = TypeScope::enter(self.collaborators.type_context.as_ref(), &topology)?;
        self.do_scale(plugin, &deployment, topology, secrets, node_id, delta, callback)
    }

    #[allow(clippy::too_many_arguments)]
    fn do_scale(
        &self,
        plugin: Arc<dyn OrchestratorPlugin>,
        deployment: &Deployment,
        mut topology: DeploymentTopology,
        secrets: Option<SecretProviderConfigurationAndCredentials>,
        node_id: &str,
        delta: i32,
        callback: PaasCallback<ScaleOutput>,
    ) -> Result<()> {
        let node = topology
            .node_template(node_id)
            .ok_or_else(|| Error::NodeNotFound {
                node_id: node_id.to_string(),
            })?;
        let target = ScaleTarget::of(node).ok_or_else(|| Error::CapabilityMissing {
            node_id: node_id.to_string(),
            capability: SCALABLE,
        })?;
        let capability = target.capability();

        let current = topology.scaling_property(node_id, capability, DEFAULT_INSTANCES)?;
        let expected = self.limits.target(node_id, current, delta)?;
        let locations = match target {
            ScaleTarget::ClusterController => {
                self.collaborators.locations.locations_of(&topology)?
            }
            ScaleTarget::Scalable => BTreeMap::new(),
        };

        let mut tracker = ScaleTracker::new(node_id);
        info!(
            deployment_id = %deployment.id,
            node_id = %node_id,
            from = current,
            to = expected,
            "Scaling node, updating runtime topology"
        );
        topology.set_scaling_property(node_id, capability, DEFAULT_INSTANCES, expected)?;
        self.collaborators.topologies.save(&topology)?;
        tracker.advance(ScalePhase::OptimisticWriteApplied)?;

        let rollback = Rollback {
            store: Arc::clone(&self.collaborators.topologies),
            deployment_id: deployment.id.clone(),
            node_id: node_id.to_string(),
            capability,
            previous: current,
            expected,
        };
        tracker.advance(ScalePhase::Dispatched)?;

        match target {
            ScaleTarget::ClusterController => {
                let request = NodeOperationExecRequest::cluster_scale(node_id, delta, expected);
                let context = self.collaborators.contexts.build_topology_context(
                    secrets,
                    deployment,
                    locations,
                    &topology,
                );
                plugin.execute_operation(
                    &context,
                    &request,
                    settle(tracker, rollback, callback, ScaleOutput::Cluster),
                );
            }
            ScaleTarget::Scalable => {
                let context =
                    self.collaborators
                        .contexts
                        .build_paas_context(secrets, deployment, &topology);
                plugin.scale(
                    &context,
                    node_id,
                    delta,
                    settle(tracker, rollback, callback, ScaleOutput::Node),
                );
            }
        }
        Ok(())
    }
}
