//! Named operation requests dispatched to orchestrator plugins.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::id::EnvironmentId;
use super::secret::SecretRequest;

/// Interface exposing the cluster-controller management operations.
pub const CLUSTER_CONTROL: &str = "org.alien4cloud.management.ClusterControl";

/// Scale operation of the [`CLUSTER_CONTROL`] interface.
pub const CLUSTER_CONTROL_OP_SCALE: &str = "scale";

/// Signed instance delta parameter of the cluster scale operation.
pub const CLUSTER_CONTROL_OP_SCALE_PARAMS_INSTANCES_DELTA: &str = "instances_delta";

/// Expected total instance count parameter of the cluster scale operation.
pub const CLUSTER_CONTROL_OP_SCALE_PARAMS_EXPECTED_INSTANCES: &str = "expected_instances";

/// Output of a named operation, keyed by instance or output name.
pub type OperationOutput = BTreeMap<String, String>;

/// A single named operation targeted at a node (and optionally one instance).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeOperationExecRequest {
    pub node_template_name: String,
    /// `None` targets every instance, or the node itself for cluster controllers.
    #[serde(default)]
    pub instance_id: Option<String>,
    pub interface_name: String,
    pub operation_name: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

impl NodeOperationExecRequest {
    pub fn new(
        node_template_name: impl Into<String>,
        interface_name: impl Into<String>,
        operation_name: impl Into<String>,
    ) -> Self {
        Self {
            node_template_name: node_template_name.into(),
            instance_id: None,
            interface_name: interface_name.into(),
            operation_name: operation_name.into(),
            parameters: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_instance(mut self, instance_id: impl Into<String>) -> Self {
        self.instance_id = Some(instance_id.into());
        self
    }

    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Scale request for a cluster-controller node.
    ///
    /// Carries no instance id: the cluster manages its own instances.
    #[must_use]
    pub fn cluster_scale(node_template_name: impl Into<String>, delta: i32, expected: i64) -> Self {
        Self::new(node_template_name, CLUSTER_CONTROL, CLUSTER_CONTROL_OP_SCALE)
            .with_parameter(
                CLUSTER_CONTROL_OP_SCALE_PARAMS_INSTANCES_DELTA,
                delta.to_string(),
            )
            .with_parameter(
                CLUSTER_CONTROL_OP_SCALE_PARAMS_EXPECTED_INSTANCES,
                expected.to_string(),
            )
    }
}

/// Operation request as submitted by a caller for an environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationExecRequest {
    pub application_environment_id: EnvironmentId,
    #[serde(flatten)]
    pub operation: NodeOperationExecRequest,
    /// Secret provider to resolve against the deployed locations.
    #[serde(default)]
    pub secret_provider: Option<SecretRequest>,
}

impl OperationExecRequest {
    pub fn new(
        application_environment_id: impl Into<EnvironmentId>,
        operation: NodeOperationExecRequest,
    ) -> Self {
        Self {
            application_environment_id: application_environment_id.into(),
            operation,
            secret_provider: None,
        }
    }

    #[must_use]
    pub fn with_secret_provider(mut self, secret_provider: SecretRequest) -> Self {
        self.secret_provider = Some(secret_provider);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cluster_scale_carries_delta_and_expected_total() {
        let request = NodeOperationExecRequest::cluster_scale("cluster1", -2, 3);
        assert_eq!(request.interface_name, CLUSTER_CONTROL);
        assert_eq!(request.operation_name, CLUSTER_CONTROL_OP_SCALE);
        assert_eq!(request.instance_id, None);
        assert_eq!(
            request.parameters[CLUSTER_CONTROL_OP_SCALE_PARAMS_INSTANCES_DELTA],
            "-2"
        );
        assert_eq!(
            request.parameters[CLUSTER_CONTROL_OP_SCALE_PARAMS_EXPECTED_INSTANCES],
            "3"
        );
    }

    #[test]
    fn exec_request_flattens_operation_fields() {
        let json = r#"{
            "application_environment_id": "env-1",
            "node_template_name": "web",
            "instance_id": "0",
            "interface_name": "custom",
            "operation_name": "backup",
            "parameters": { "target": "s3" },
            "secret_provider": { "plugin_name": "vault", "credentials": { "token": "t" } }
        }"#;
        let request: OperationExecRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.application_environment_id.as_str(), "env-1");
        assert_eq!(request.operation.instance_id.as_deref(), Some("0"));
        assert_eq!(request.operation.parameters["target"], "s3");
        assert_eq!(
            request.secret_provider.map(|s| s.plugin_name).as_deref(),
            Some("vault")
        );
    }
}
