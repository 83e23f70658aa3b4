//! Orchestrator plugin port.
//!
//! Every backend driver implements [`OrchestratorPlugin`]. Long-running
//! operations answer through a [`PaasCallback`] that the plugin may complete
//! on any thread, at any later time. The runtime never blocks on it.

use std::fmt;
use std::sync::Arc;

use tokio::sync::oneshot;

use crate::domain::{
    NodeOperationExecRequest, OperationOutput, OrchestratorId, PaasDeploymentContext,
    TopologyDeploymentContext,
};
use crate::error::{PluginError, Result};

/// Two-outcome continuation for an asynchronous plugin call.
///
/// Consumed on completion, so a plugin can report at most one outcome.
pub struct PaasCallback<T> {
    complete: Box<dyn FnOnce(std::result::Result<T, PluginError>) + Send + 'static>,
}

impl<T: Send + 'static> PaasCallback<T> {
    /// Create a callback from a single completion closure.
    pub fn new(
        complete: impl FnOnce(std::result::Result<T, PluginError>) + Send + 'static,
    ) -> Self {
        Self {
            complete: Box::new(complete),
        }
    }

    /// Create a callback from separate success and failure handlers.
    pub fn from_handlers(
        on_success: impl FnOnce(T) + Send + 'static,
        on_failure: impl FnOnce(PluginError) + Send + 'static,
    ) -> Self {
        Self::new(move |result| match result {
            Ok(data) => on_success(data),
            Err(err) => on_failure(err),
        })
    }

    /// Callback whose outcome can be awaited on the returned receiver.
    ///
    /// The receiver yields an error only if the callback is dropped without
    /// ever being completed.
    #[must_use]
    pub fn channel() -> (Self, oneshot::Receiver<std::result::Result<T, PluginError>>) {
        let (tx, rx) = oneshot::channel();
        let callback = Self::new(move |result| {
            // Receiver dropped: nobody is waiting for the outcome.
            let _ = tx.send(result);
        });
        (callback, rx)
    }

    /// Callback that discards the outcome.
    #[must_use]
    pub fn ignore() -> Self {
        Self::new(|_| {})
    }

    pub fn on_success(self, data: T) {
        (self.complete)(Ok(data));
    }

    pub fn on_failure(self, error: PluginError) {
        (self.complete)(Err(error));
    }

    pub fn complete(self, result: std::result::Result<T, PluginError>) {
        (self.complete)(result);
    }

    /// Adapt this callback to accept a different success payload.
    #[must_use]
    pub fn map<U: Send + 'static>(self, f: impl FnOnce(U) -> T + Send + 'static) -> PaasCallback<U> {
        PaasCallback::new(move |result| self.complete(result.map(f)))
    }
}

impl<T> fmt::Debug for PaasCallback<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaasCallback").finish_non_exhaustive()
    }
}

/// Capability set every orchestrator backend provides.
pub trait OrchestratorPlugin: Send + Sync {
    /// Dispatch a named operation. The outcome arrives through `callback`.
    fn execute_operation(
        &self,
        context: &TopologyDeploymentContext,
        request: &NodeOperationExecRequest,
        callback: PaasCallback<OperationOutput>,
    );

    /// Add (positive `delta`) or remove (negative) instances of a plain scalable node.
    fn scale(
        &self,
        context: &PaasDeploymentContext,
        node_id: &str,
        delta: i32,
        callback: PaasCallback<serde_json::Value>,
    );

    /// Toggle maintenance mode for every instance of the deployment.
    fn switch_maintenance_mode(
        &self,
        context: &PaasDeploymentContext,
        maintenance_mode_on: bool,
    ) -> std::result::Result<(), PluginError>;

    /// Toggle maintenance mode for a single instance.
    fn switch_instance_maintenance_mode(
        &self,
        context: &PaasDeploymentContext,
        node_id: &str,
        instance_id: &str,
        maintenance_mode_on: bool,
    ) -> std::result::Result<(), PluginError>;
}

/// Resolves the live plugin serving an orchestrator.
pub trait PluginRegistry: Send + Sync {
    /// Plugin for `orchestrator_id`, or [`Error::OrchestratorDisabled`](crate::error::Error::OrchestratorDisabled).
    fn get_or_fail(&self, orchestrator_id: &OrchestratorId) -> Result<Arc<dyn OrchestratorPlugin>>;
}
