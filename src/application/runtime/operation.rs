//! Custom operation trigger.

use tracing::info;

use super::{DeploymentRuntimeService, Resolved};
use crate::domain::{OperationExecRequest, OperationOutput};
use crate::error::Result;
use crate::port::outbound::orchestrator::PaasCallback;

use super::secret::select_secret_configuration;

impl DeploymentRuntimeService {
    /// Dispatch a named operation to the deployment's orchestrator.
    ///
    /// Returns once the plugin has accepted the request. The topology is not
    /// touched here; the outcome reaches `callback` later.
    pub fn trigger_operation(
        &self,
        request: OperationExecRequest,
        callback: PaasCallback<OperationOutput>,
    ) -> Result<()> {
        let Resolved {
            deployment,
            topology,
            plugin,
        } = self.resolve_runtime(&request.application_environment_id)?;

        let locations = self.collaborators.locations.locations_of(&topology)?;
        let secrets = request.secret_provider.as_ref().and_then(|secret| {
            select_secret_configuration(&locations, &secret.plugin_name, secret.credentials.clone())
        });

        let context = self.collaborators.contexts.build_topology_context(
            secrets,
            &deployment,
            locations,
            &topology,
        );

        info!(
            deployment_id = %deployment.id,
            orchestrator_id = %deployment.orchestrator_id,
            node_id = %request.operation.node_template_name,
            interface = %request.operation.interface_name,
            operation = %request.operation.operation_name,
            "Triggering operation"
        );
        plugin.execute_operation(&context, &request.operation, callback);
        Ok(())
    }
}
