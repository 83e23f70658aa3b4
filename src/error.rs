use thiserror::Error;

use crate::domain::id::{DeploymentId, EnvironmentId, OrchestratorId};

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Failure reported by an orchestrator plugin.
///
/// Delivered through a [`PaasCallback`](crate::port::outbound::orchestrator::PaasCallback)
/// or returned by the synchronous maintenance toggles. The runtime forwards
/// it to callers exactly as the plugin produced it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PluginError {
    #[error("operation {interface}.{operation} failed: {message}")]
    OperationExecution {
        interface: String,
        operation: String,
        message: String,
    },

    #[error("scaling failed: {0}")]
    Scaling(String),

    #[error("maintenance mode switch failed: {0}")]
    MaintenanceMode(String),

    #[error("{0}")]
    Backend(String),
}

/// Coarse classification of runtime errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Unavailable,
    CapabilityMissing,
    InvalidRequest,
    RemoteOperation,
    MaintenanceMode,
    Internal,
}

/// Platform error codes surfaced by the upper REST layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    OrchestratorDisabled = 370,
    NodeOperationExecution = 371,
    MaintenanceMode = 373,
    Scaling = 375,
    Uncategorized = 500,
    IllegalParameter = 501,
    NotFound = 504,
    IllegalStateOperation = 505,
}

impl ErrorCode {
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("no active deployment for environment {environment_id}")]
    NoActiveDeployment { environment_id: EnvironmentId },

    #[error("orchestrator {orchestrator_id} is disabled or not configured")]
    OrchestratorDisabled { orchestrator_id: OrchestratorId },

    #[error("node template {node_id} not found in topology")]
    NodeNotFound { node_id: String },

    #[error("node template {node_id} has no {capability} capability")]
    CapabilityMissing {
        node_id: String,
        capability: &'static str,
    },

    #[error("no persisted topology for deployment {deployment_id}")]
    TopologyNotFound { deployment_id: DeploymentId },

    #[error("scaling property {property} on {node_id}: {reason}")]
    ScalingProperty {
        node_id: String,
        property: &'static str,
        reason: String,
    },

    #[error("cannot scale {node_id} from {current} by {delta}")]
    InvalidScale {
        node_id: String,
        current: i64,
        delta: i32,
    },

    #[error("illegal state: {0}")]
    IllegalState(String),

    #[error("type resolution context unavailable: {0}")]
    TypeContext(String),

    #[error("store error: {0}")]
    Store(String),

    #[error(transparent)]
    Plugin(#[from] PluginError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Which precondition or stage failed.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoActiveDeployment { .. }
            | Self::NodeNotFound { .. }
            | Self::TopologyNotFound { .. }
            | Self::ScalingProperty { .. } => ErrorKind::NotFound,
            Self::OrchestratorDisabled { .. } => ErrorKind::Unavailable,
            Self::CapabilityMissing { .. } => ErrorKind::CapabilityMissing,
            Self::InvalidScale { .. } => ErrorKind::InvalidRequest,
            Self::Plugin(PluginError::MaintenanceMode(_)) => ErrorKind::MaintenanceMode,
            Self::Plugin(_) => ErrorKind::RemoteOperation,
            Self::IllegalState(_) | Self::TypeContext(_) | Self::Store(_) | Self::Config(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// Numeric platform error code for this error.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NoActiveDeployment { .. }
            | Self::NodeNotFound { .. }
            | Self::TopologyNotFound { .. }
            | Self::ScalingProperty { .. } => ErrorCode::NotFound,
            Self::OrchestratorDisabled { .. } => ErrorCode::OrchestratorDisabled,
            Self::CapabilityMissing { .. } => ErrorCode::IllegalStateOperation,
            Self::InvalidScale { .. } => ErrorCode::IllegalParameter,
            Self::IllegalState(_) => ErrorCode::IllegalStateOperation,
            Self::Plugin(err) => err.code(),
            Self::TypeContext(_) | Self::Store(_) | Self::Config(_) => ErrorCode::Uncategorized,
        }
    }
}

impl PluginError {
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::OperationExecution { .. } => ErrorCode::NodeOperationExecution,
            Self::Scaling(_) => ErrorCode::Scaling,
            Self::MaintenanceMode(_) => ErrorCode::MaintenanceMode,
            Self::Backend(_) => ErrorCode::Uncategorized,
        }
    }
}
