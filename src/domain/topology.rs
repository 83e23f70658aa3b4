//! Runtime deployment topology: node templates and their capabilities.
//!
//! The topology is the system of record for desired instance counts. Scaling
//! reads and writes the `default_instances` property of either the generic
//! [`SCALABLE`] capability or the [`CLUSTER_CONTROLLER`] vendor capability.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::id::{DeploymentId, LocationId};
use crate::error::{Error, Result};

/// Normative capability type carrying the desired instance count of a node.
pub const SCALABLE: &str = "tosca.capabilities.Scalable";

/// Vendor capability marking a node as a self-managed sub-cluster.
pub const CLUSTER_CONTROLLER: &str = "org.alien4cloud.capabilities.ClusterController";

/// Scaling property holding the desired instance count.
pub const DEFAULT_INSTANCES: &str = "default_instances";

/// Value of a node or capability property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Scalar value, stored as text the way the type system stores it.
    Scalar(String),
    /// Structured value (lists, maps, function calls).
    Complex(serde_json::Value),
}

impl PropertyValue {
    #[must_use]
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(value) => Some(value),
            Self::Complex(_) => None,
        }
    }

    /// Integer view of the value, accepting numeric text or a JSON number.
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Scalar(value) => value.trim().parse().ok(),
            Self::Complex(value) => value.as_i64(),
        }
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

/// Typed property bag attached to a node template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capability {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyValue>,
}

impl Capability {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            properties: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }
}

/// A node of the topology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeTemplate {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyValue>,
    /// Capabilities keyed by capability name.
    #[serde(default)]
    pub capabilities: BTreeMap<String, Capability>,
}

impl NodeTemplate {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            properties: BTreeMap::new(),
            capabilities: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_capability(mut self, name: impl Into<String>, capability: Capability) -> Self {
        self.capabilities.insert(name.into(), capability);
        self
    }

    /// First capability of the given type.
    #[must_use]
    pub fn capability_by_type(&self, type_name: &str) -> Option<&Capability> {
        self.capabilities
            .values()
            .find(|capability| capability.type_name == type_name)
    }

    fn capability_by_type_mut(&mut self, type_name: &str) -> Option<&mut Capability> {
        self.capabilities
            .values_mut()
            .find(|capability| capability.type_name == type_name)
    }

    #[must_use]
    pub fn has_capability(&self, type_name: &str) -> bool {
        self.capability_by_type(type_name).is_some()
    }
}

/// Runtime copy of an application topology bound to a deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentTopology {
    /// Same identifier as the owning deployment.
    pub id: DeploymentId,
    /// Name of the archive declaring the topology types.
    pub archive_name: String,
    /// Model version the type-resolution scope binds to.
    pub archive_version: String,
    #[serde(default)]
    pub node_templates: BTreeMap<String, NodeTemplate>,
    /// Location placement per node group.
    #[serde(default)]
    pub location_placements: BTreeMap<String, LocationId>,
}

impl DeploymentTopology {
    pub fn new(
        id: impl Into<DeploymentId>,
        archive_name: impl Into<String>,
        archive_version: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            archive_name: archive_name.into(),
            archive_version: archive_version.into(),
            node_templates: BTreeMap::new(),
            location_placements: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_node(mut self, node: NodeTemplate) -> Self {
        self.node_templates.insert(node.name.clone(), node);
        self
    }

    #[must_use]
    pub fn with_placement(mut self, group: impl Into<String>, location: impl Into<LocationId>) -> Self {
        self.location_placements.insert(group.into(), location.into());
        self
    }

    #[must_use]
    pub fn node_template(&self, node_id: &str) -> Option<&NodeTemplate> {
        self.node_templates.get(node_id)
    }

    /// Distinct locations referenced by the topology.
    #[must_use]
    pub fn location_ids(&self) -> BTreeSet<LocationId> {
        self.location_placements.values().cloned().collect()
    }

    /// Read an integer scaling property from the node's capability of the given type.
    pub fn scaling_property(
        &self,
        node_id: &str,
        capability_type: &'static str,
        property: &'static str,
    ) -> Result<i64> {
        let capability = self
            .node_template(node_id)
            .ok_or_else(|| Error::NodeNotFound {
                node_id: node_id.to_string(),
            })?
            .capability_by_type(capability_type)
            .ok_or_else(|| Error::CapabilityMissing {
                node_id: node_id.to_string(),
                capability: capability_type,
            })?;

        let value = capability
            .properties
            .get(property)
            .ok_or_else(|| Error::ScalingProperty {
                node_id: node_id.to_string(),
                property,
                reason: "not set".into(),
            })?;

        value.as_integer().ok_or_else(|| Error::ScalingProperty {
            node_id: node_id.to_string(),
            property,
            reason: format!("not an integer: {value:?}"),
        })
    }

    /// Overwrite an integer scaling property on the node's capability of the given type.
    pub fn set_scaling_property(
        &mut self,
        node_id: &str,
        capability_type: &'static str,
        property: &'static str,
        value: i64,
    ) -> Result<()> {
        let capability = self
            .node_templates
            .get_mut(node_id)
            .ok_or_else(|| Error::NodeNotFound {
                node_id: node_id.to_string(),
            })?
            .capability_by_type_mut(capability_type)
            .ok_or_else(|| Error::CapabilityMissing {
                node_id: node_id.to_string(),
                capability: capability_type,
            })?;
        capability
            .properties
            .insert(property.to_string(), PropertyValue::from(value));
        Ok(())
    }
}
