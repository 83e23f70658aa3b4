//! Maintenance-mode switches.

use tracing::info;

use super::{DeploymentRuntimeService, Resolved};
use crate::domain::EnvironmentId;
use crate::error::Result;

impl DeploymentRuntimeService {
    /// Toggle maintenance mode for the whole deployment.
    pub fn switch_maintenance_mode(&self, environment_id: &EnvironmentId, on: bool) -> Result<()> {
        let Resolved {
            deployment,
            topology,
            plugin,
        } = self.resolve_runtime(environment_id)?;
        let context = self
            .collaborators
            .contexts
            .build_paas_context(None, &deployment, &topology);

        info!(deployment_id = %deployment.id, on, "Switching maintenance mode");
        plugin.switch_maintenance_mode(&context, on)?;
        Ok(())
    }

    /// Toggle maintenance mode for one instance of a node.
    pub fn switch_instance_maintenance_mode(
        &self,
        environment_id: &EnvironmentId,
        node_id: &str,
        instance_id: &str,
        on: bool,
    ) -> Result<()> {
        let Resolved {
            deployment,
            topology,
            plugin,
        } = self.resolve_runtime(environment_id)?;
        let context = self
            .collaborators
            .contexts
            .build_paas_context(None, &deployment, &topology);

        info!(
            deployment_id = %deployment.id,
            node_id = %node_id,
            instance_id = %instance_id,
            on,
            "Switching instance maintenance mode"
        );
        plugin.switch_instance_maintenance_mode(&context, node_id, instance_id, on)?;
        Ok(())
    }
}
