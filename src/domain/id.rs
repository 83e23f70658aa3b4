//! Domain identifier types with proper encapsulation.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[doc = concat!("Create a new `", stringify!($name), "` from a string.")]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }
    };
}

string_id!(
    /// Application environment identifier.
    EnvironmentId
);

string_id!(
    /// Deployment identifier. Also keys the persisted deployment topology.
    DeploymentId
);

string_id!(
    /// Orchestrator identifier used to resolve the backend plugin.
    OrchestratorId
);

string_id!(
    /// Infrastructure location identifier.
    LocationId
);

impl DeploymentId {
    /// Create a new `DeploymentId` with a generated UUID.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_deployment_ids_are_unique() {
        assert_ne!(DeploymentId::generate(), DeploymentId::generate());
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = OrchestratorId::new("cloudify");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"cloudify\"");
        assert_eq!(id.to_string(), "cloudify");
    }
}
