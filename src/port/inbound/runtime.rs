//! Runtime control port for a running deployment.

use crate::application::runtime::ScaleOutput;
use crate::domain::{
    EnvironmentId, OperationExecRequest, OperationOutput, SecretProviderConfigurationAndCredentials,
};
use crate::error::Result;
use crate::port::outbound::orchestrator::PaasCallback;

/// Lifecycle operations on the active deployment of an environment.
///
/// Every method fails synchronously when a precondition is missing (no
/// deployment, no plugin, no node, no capability). Asynchronous outcomes are
/// delivered through the callback.
pub trait DeploymentRuntime: Send + Sync {
    fn trigger_operation(
        &self,
        request: OperationExecRequest,
        callback: PaasCallback<OperationOutput>,
    ) -> Result<()>;

    fn switch_maintenance_mode(&self, environment_id: &EnvironmentId, on: bool) -> Result<()>;

    fn switch_instance_maintenance_mode(
        &self,
        environment_id: &EnvironmentId,
        node_id: &str,
        instance_id: &str,
        on: bool,
    ) -> Result<()>;

    fn scale(
        &self,
        secrets: Option<SecretProviderConfigurationAndCredentials>,
        environment_id: &EnvironmentId,
        node_id: &str,
        delta: i32,
        callback: PaasCallback<ScaleOutput>,
    ) -> Result<()>;
}
