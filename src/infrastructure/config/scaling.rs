//! Scaling bounds configuration.

use serde::Deserialize;

use crate::application::runtime::ScalingLimits;
use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScalingConfig {
    /// Upper bound on the instance count a scale request may produce.
    pub max_instances: Option<i64>,
}

impl ScalingConfig {
    #[must_use]
    pub fn limits(&self) -> ScalingLimits {
        ScalingLimits {
            max_instances: self.max_instances,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        match self.max_instances {
            Some(max) if max <= 0 => Err(ConfigError::InvalidValue {
                field: "scaling.max_instances",
                reason: format!("must be positive, got {max}"),
            }),
            _ => Ok(()),
        }
    }
}
