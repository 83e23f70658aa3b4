//! Scripted orchestrator plugin for testing.
//!
//! [`RecordingPlugin`] records every call it receives and answers with
//! queued outcomes (success by default). Completion can happen inline, on a
//! spawned tokio task, or be held until the test releases it.

use std::collections::VecDeque;
use std::fmt;

use parking_lot::Mutex;

use crate::domain::{
    DeploymentId, DeploymentTopology, NodeOperationExecRequest, OperationOutput,
    PaasDeploymentContext, TopologyDeploymentContext,
};
use crate::error::PluginError;
use crate::port::outbound::orchestrator::{OrchestratorPlugin, PaasCallback};

/// When the plugin completes callbacks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Completion {
    /// Before the dispatching call returns.
    #[default]
    Inline,
    /// On a spawned tokio task. Requires a running runtime.
    Spawned,
    /// Only when the test calls `complete_pending_*`.
    Deferred,
}

/// A call received by the plugin.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    Operation {
        deployment_id: DeploymentId,
        request: NodeOperationExecRequest,
        secret_provider: Option<String>,
        location_count: usize,
        topology: DeploymentTopology,
    },
    Scale {
        deployment_id: DeploymentId,
        node_id: String,
        delta: i32,
        secret_provider: Option<String>,
        topology: DeploymentTopology,
    },
    Maintenance {
        deployment_id: DeploymentId,
        on: bool,
    },
    InstanceMaintenance {
        deployment_id: DeploymentId,
        node_id: String,
        instance_id: String,
        on: bool,
    },
}

type DispatchHook = Box<dyn Fn(&Dispatch) + Send + Sync>;

#[derive(Default)]
struct Script {
    dispatches: Vec<Dispatch>,
    scale_outcomes: VecDeque<Result<serde_json::Value, PluginError>>,
    operation_outcomes: VecDeque<Result<OperationOutput, PluginError>>,
    pending_scales: VecDeque<PaasCallback<serde_json::Value>>,
    pending_operations: VecDeque<PaasCallback<OperationOutput>>,
    maintenance_failure: Option<PluginError>,
}

/// Orchestrator plugin that records dispatches and replays scripted outcomes.
#[derive(Default)]
pub struct RecordingPlugin {
    completion: Completion,
    script: Mutex<Script>,
    on_dispatch: Option<DispatchHook>,
}

impl RecordingPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_completion(mut self, completion: Completion) -> Self {
        self.completion = completion;
        self
    }

    /// Run `hook` on every dispatch, before the outcome is delivered.
    #[must_use]
    pub fn on_dispatch(mut self, hook: impl Fn(&Dispatch) + Send + Sync + 'static) -> Self {
        self.on_dispatch = Some(Box::new(hook));
        self
    }

    pub fn push_scale_outcome(&self, outcome: Result<serde_json::Value, PluginError>) {
        self.script.lock().scale_outcomes.push_back(outcome);
    }

    pub fn push_operation_outcome(&self, outcome: Result<OperationOutput, PluginError>) {
        self.script.lock().operation_outcomes.push_back(outcome);
    }

    /// Make maintenance switches fail with `error` (or succeed with `None`).
    pub fn fail_maintenance(&self, error: Option<PluginError>) {
        self.script.lock().maintenance_failure = error;
    }

    #[must_use]
    pub fn dispatches(&self) -> Vec<Dispatch> {
        self.script.lock().dispatches.clone()
    }

    /// Number of held callbacks.
    #[must_use]
    pub fn pending(&self) -> usize {
        let script = self.script.lock();
        script.pending_scales.len() + script.pending_operations.len()
    }

    /// Complete the oldest held scale callback. Returns whether one was held.
    pub fn complete_pending_scale(&self, outcome: Result<serde_json::Value, PluginError>) -> bool {
        let callback = self.script.lock().pending_scales.pop_front();
        callback.map(|callback| callback.complete(outcome)).is_some()
    }

    /// Complete the oldest held operation callback. Returns whether one was held.
    pub fn complete_pending_operation(&self, outcome: Result<OperationOutput, PluginError>) -> bool {
        let callback = self.script.lock().pending_operations.pop_front();
        callback.map(|callback| callback.complete(outcome)).is_some()
    }

    fn record(&self, dispatch: Dispatch) {
        if let Some(hook) = &self.on_dispatch {
            hook(&dispatch);
        }
        self.script.lock().dispatches.push(dispatch);
    }

    fn deliver<T: Send + 'static>(&self, callback: PaasCallback<T>, outcome: Result<T, PluginError>) {
        match self.completion {
            Completion::Inline => callback.complete(outcome),
            Completion::Spawned => {
                tokio::spawn(async move { callback.complete(outcome) });
            }
            Completion::Deferred => unreachable!("deferred callbacks are held, not delivered"),
        }
    }
}

impl fmt::Debug for RecordingPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingPlugin")
            .field("completion", &self.completion)
            .field("dispatches", &self.script.lock().dispatches.len())
            .finish_non_exhaustive()
    }
}

impl OrchestratorPlugin for RecordingPlugin {
    fn execute_operation(
        &self,
        context: &TopologyDeploymentContext,
        request: &NodeOperationExecRequest,
        callback: PaasCallback<OperationOutput>,
    ) {
        self.record(Dispatch::Operation {
            deployment_id: context.deployment().id.clone(),
            request: request.clone(),
            secret_provider: context.secrets().map(|s| s.plugin_name().to_string()),
            location_count: context.locations.len(),
            topology: context.topology().clone(),
        });

        if self.completion == Completion::Deferred {
            self.script.lock().pending_operations.push_back(callback);
            return;
        }
        let outcome = self
            .script
            .lock()
            .operation_outcomes
            .pop_front()
            .unwrap_or_else(|| Ok(OperationOutput::new()));
        self.deliver(callback, outcome);
    }

    fn scale(
        &self,
        context: &PaasDeploymentContext,
        node_id: &str,
        delta: i32,
        callback: PaasCallback<serde_json::Value>,
    ) {
        self.record(Dispatch::Scale {
            deployment_id: context.deployment.id.clone(),
            node_id: node_id.to_string(),
            delta,
            secret_provider: context.secrets.as_ref().map(|s| s.plugin_name().to_string()),
            topology: context.topology.clone(),
        });

        if self.completion == Completion::Deferred {
            self.script.lock().pending_scales.push_back(callback);
            return;
        }
        let outcome = self
            .script
            .lock()
            .scale_outcomes
            .pop_front()
            .unwrap_or(Ok(serde_json::Value::Null));
        self.deliver(callback, outcome);
    }

    fn switch_maintenance_mode(
        &self,
        context: &PaasDeploymentContext,
        maintenance_mode_on: bool,
    ) -> Result<(), PluginError> {
        self.record(Dispatch::Maintenance {
            deployment_id: context.deployment.id.clone(),
            on: maintenance_mode_on,
        });
        match self.script.lock().maintenance_failure.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn switch_instance_maintenance_mode(
        &self,
        context: &PaasDeploymentContext,
        node_id: &str,
        instance_id: &str,
        maintenance_mode_on: bool,
    ) -> Result<(), PluginError> {
        self.record(Dispatch::InstanceMaintenance {
            deployment_id: context.deployment.id.clone(),
            node_id: node_id.to_string(),
            instance_id: instance_id.to_string(),
            on: maintenance_mode_on,
        });
        match self.script.lock().maintenance_failure.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
