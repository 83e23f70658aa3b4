//! Deployment: the active binding of an environment to an orchestrator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{DeploymentId, EnvironmentId, LocationId, OrchestratorId};

/// One binding of an application environment to an orchestrator and a set of
/// infrastructure locations.
///
/// A deployment is active until it has an end date. At most one deployment
/// per environment is active at any time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deployment {
    pub id: DeploymentId,
    pub environment_id: EnvironmentId,
    pub orchestrator_id: OrchestratorId,
    #[serde(default)]
    pub location_ids: Vec<LocationId>,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

impl Deployment {
    /// Create an active deployment started now.
    pub fn new(
        id: impl Into<DeploymentId>,
        environment_id: impl Into<EnvironmentId>,
        orchestrator_id: impl Into<OrchestratorId>,
    ) -> Self {
        Self {
            id: id.into(),
            environment_id: environment_id.into(),
            orchestrator_id: orchestrator_id.into(),
            location_ids: Vec::new(),
            start_date: Utc::now(),
            end_date: None,
        }
    }

    #[must_use]
    pub fn with_locations(mut self, location_ids: Vec<LocationId>) -> Self {
        self.location_ids = location_ids;
        self
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.end_date.is_none()
    }

    /// Mark the deployment as ended.
    pub fn end(&mut self) {
        self.end_date = Some(Utc::now());
    }
}
