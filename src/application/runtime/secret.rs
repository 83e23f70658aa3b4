//! Secret credential resolution against the deployed locations.
//!
//! A provider name that no location is configured with is a valid outcome:
//! the caller proceeds without secrets.

use std::collections::BTreeMap;

use tracing::{debug, error};

use super::DeploymentRuntimeService;
use crate::domain::{
    DeploymentTopology, Location, LocationId, SecretProviderConfiguration,
    SecretProviderConfigurationAndCredentials,
};
use crate::error::Result;

/// Pick the first location whose secret provider is `plugin_name` and pair its
/// configuration with `credentials`.
#[must_use]
pub fn select_secret_configuration(
    locations: &BTreeMap<LocationId, Location>,
    plugin_name: &str,
    credentials: serde_json::Value,
) -> Option<SecretProviderConfigurationAndCredentials> {
    let Some(provider) = locations
        .values()
        .filter_map(|location| location.secret_provider.as_ref())
        .find(|provider| provider.plugin_name == plugin_name)
    else {
        error!(
            plugin_name = %plugin_name,
            locations = locations.len(),
            "Secret provider is not configured by any deployed location"
        );
        return None;
    };

    debug!(plugin_name = %plugin_name, "Resolved secret provider configuration");
    Some(SecretProviderConfigurationAndCredentials::new(
        SecretProviderConfiguration::new(plugin_name, provider.configuration.clone()),
        credentials,
    ))
}

impl DeploymentRuntimeService {
    /// Resolve secret-provider configuration for a topology.
    ///
    /// Returns `Ok(None)` when no deployed location uses `plugin_name`.
    pub fn generate_secret_configuration(
        &self,
        topology: &DeploymentTopology,
        plugin_name: &str,
        credentials: serde_json::Value,
    ) -> Result<Option<SecretProviderConfigurationAndCredentials>> {
        let locations = self.collaborators.locations.locations_of(topology)?;
        Ok(select_secret_configuration(
            &locations,
            plugin_name,
            credentials,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn locations(count: usize) -> BTreeMap<LocationId, Location> {
        (1..=count)
            .map(|i| {
                let location = Location::new(format!("loc-{i}"), format!("Location {i}"), "openstack")
                    .with_secret_provider(SecretProviderConfiguration::new(
                        format!("provider-{i}"),
                        json!({ "endpoint": format!("https://secrets-{i}") }),
                    ));
                (location.id.clone(), location)
            })
            .collect()
    }

    #[test]
    fn every_location_provider_is_reachable() {
        let locations = locations(4);
        for i in 1..=4 {
            let name = format!("provider-{i}");
            let resolved =
                select_secret_configuration(&locations, &name, json!({ "user": "ops" })).unwrap();
            assert_eq!(resolved.plugin_name(), name);
            assert_eq!(
                resolved.secret_provider_configuration.configuration,
                json!({ "endpoint": format!("https://secrets-{i}") })
            );
            assert_eq!(resolved.credentials, json!({ "user": "ops" }));
        }
    }

    #[test]
    fn unknown_provider_is_no_match() {
        assert!(select_secret_configuration(&locations(3), "vault", json!(null)).is_none());
    }

    #[test]
    fn locations_without_provider_are_skipped() {
        let mut locations = locations(1);
        let bare = Location::new("loc-0", "Bare", "byon");
        locations.insert(bare.id.clone(), bare);

        let resolved = select_secret_configuration(&locations, "provider-1", json!({}));
        assert!(resolved.is_some());
    }

    #[test]
    fn empty_location_set_is_no_match() {
        assert!(select_secret_configuration(&BTreeMap::new(), "vault", json!({})).is_none());
    }
}
