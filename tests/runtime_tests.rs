use std::collections::BTreeMap;

use serde_json::json;

use deploy_runtime::domain::topology::{DEFAULT_INSTANCES, SCALABLE};
use deploy_runtime::domain::{
    EnvironmentId, NodeOperationExecRequest, OperationExecRequest, OrchestratorId, SecretRequest,
};
use deploy_runtime::error::{Error, ErrorKind, PluginError};
use deploy_runtime::infrastructure::config::settings::Config;
use deploy_runtime::port::inbound::runtime::DeploymentRuntime;
use deploy_runtime::port::outbound::orchestrator::PaasCallback;
use deploy_runtime::testkit::domain::{location_with_secret_provider, scalable_node, topology, LOCATION};
use deploy_runtime::testkit::plugin::{Completion, Dispatch, RecordingPlugin};
use deploy_runtime::testkit::runtime::{RuntimeFixture, ENVIRONMENT, ORCHESTRATOR};

fn restart(node: &str) -> OperationExecRequest {
    OperationExecRequest::new(
        ENVIRONMENT,
        NodeOperationExecRequest::new(node, "custom", "restart").with_parameter("graceful", "true"),
    )
}

fn disabled_config() -> Config {
    Config::parse_toml(&format!("[orchestrators]\ndisabled = [\"{ORCHESTRATOR}\"]\n"))
        .expect("valid config")
}

// --- Operation trigger -----------------------------------------------------

#[tokio::test]
async fn operation_dispatches_with_matching_secret_provider() {
    let fixture = RuntimeFixture::new(topology(vec![scalable_node("web", 2)]));
    fixture
        .store
        .insert_location(location_with_secret_provider(LOCATION, "vault"));

    let mut output = BTreeMap::new();
    output.insert("web:0".to_string(), "restarted".to_string());
    fixture.plugin.push_operation_outcome(Ok(output.clone()));

    let request = restart("web").with_secret_provider(SecretRequest::new("vault", json!({ "token": "t" })));
    let (callback, outcome) = PaasCallback::channel();
    fixture.runtime.trigger_operation(request, callback).unwrap();

    assert_eq!(outcome.await.unwrap(), Ok(output));
    let dispatches = fixture.plugin.dispatches();
    assert_eq!(dispatches.len(), 1);
    match &dispatches[0] {
        Dispatch::Operation {
            deployment_id,
            request,
            secret_provider,
            location_count,
            ..
        } => {
            assert_eq!(deployment_id.as_str(), "dep-1");
            assert_eq!(request.interface_name, "custom");
            assert_eq!(request.operation_name, "restart");
            assert_eq!(request.parameters.get("graceful").map(String::as_str), Some("true"));
            assert_eq!(secret_provider.as_deref(), Some("vault"));
            assert_eq!(*location_count, 1);
        }
        other => panic!("unexpected dispatch: {other:?}"),
    }
}

#[tokio::test]
async fn operation_without_matching_provider_runs_without_secrets() {
    let fixture = RuntimeFixture::new(topology(vec![scalable_node("web", 2)]));
    fixture
        .store
        .insert_location(location_with_secret_provider(LOCATION, "vault"));

    let request = restart("web").with_secret_provider(SecretRequest::new("conjur", json!({})));
    fixture
        .runtime
        .trigger_operation(request, PaasCallback::ignore())
        .unwrap();

    assert!(matches!(
        &fixture.plugin.dispatches()[0],
        Dispatch::Operation { secret_provider: None, .. }
    ));
}

#[tokio::test]
async fn operation_failure_reaches_callback_unchanged() {
    let fixture = RuntimeFixture::new(topology(vec![scalable_node("web", 2)]));
    let failure = PluginError::OperationExecution {
        interface: "custom".into(),
        operation: "restart".into(),
        message: "exit code 2".into(),
    };
    fixture.plugin.push_operation_outcome(Err(failure.clone()));

    let (callback, outcome) = PaasCallback::channel();
    fixture.runtime.trigger_operation(restart("web"), callback).unwrap();

    assert_eq!(outcome.await.unwrap(), Err(failure));
}

#[tokio::test]
async fn operation_trigger_leaves_topology_untouched() {
    let fixture = RuntimeFixture::new(topology(vec![scalable_node("web", 2)]));
    let before = fixture.persisted();

    fixture
        .runtime
        .trigger_operation(restart("web"), PaasCallback::ignore())
        .unwrap();

    assert_eq!(fixture.persisted(), before);
    assert_eq!(fixture.store.save_count(), 0);
}

#[tokio::test]
async fn spawned_operation_completion_is_delivered() {
    let fixture = RuntimeFixture::with_plugin(
        topology(vec![scalable_node("web", 2)]),
        RecordingPlugin::new().with_completion(Completion::Spawned),
        &Config::default(),
    );

    let (callback, outcome) = PaasCallback::channel();
    fixture.runtime.trigger_operation(restart("web"), callback).unwrap();

    assert_eq!(outcome.await.unwrap(), Ok(BTreeMap::new()));
}

// --- Maintenance -----------------------------------------------------------

#[test]
fn deployment_maintenance_is_forwarded() {
    let fixture = RuntimeFixture::new(topology(vec![scalable_node("web", 2)]));

    fixture
        .runtime
        .switch_maintenance_mode(&fixture.environment(), true)
        .unwrap();
    fixture
        .runtime
        .switch_maintenance_mode(&fixture.environment(), false)
        .unwrap();

    let flags: Vec<bool> = fixture
        .plugin
        .dispatches()
        .into_iter()
        .map(|dispatch| match dispatch {
            Dispatch::Maintenance { on, .. } => on,
            other => panic!("unexpected dispatch: {other:?}"),
        })
        .collect();
    assert_eq!(flags, vec![true, false]);
}

#[test]
fn instance_maintenance_is_forwarded() {
    let fixture = RuntimeFixture::new(topology(vec![scalable_node("web", 2)]));

    fixture
        .runtime
        .switch_instance_maintenance_mode(&fixture.environment(), "web", "1", true)
        .unwrap();

    assert_eq!(
        fixture.plugin.dispatches(),
        vec![Dispatch::InstanceMaintenance {
            deployment_id: "dep-1".into(),
            node_id: "web".into(),
            instance_id: "1".into(),
            on: true,
        }]
    );
}

#[test]
fn maintenance_failure_propagates_to_caller() {
    let fixture = RuntimeFixture::new(topology(vec![scalable_node("web", 2)]));
    fixture
        .plugin
        .fail_maintenance(Some(PluginError::MaintenanceMode("agent unreachable".into())));

    let err = fixture
        .runtime
        .switch_maintenance_mode(&fixture.environment(), true)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MaintenanceMode);
    assert_eq!(err.code().as_u16(), 373);

    let err = fixture
        .runtime
        .switch_instance_maintenance_mode(&fixture.environment(), "web", "0", false)
        .unwrap_err();
    assert!(matches!(err, Error::Plugin(PluginError::MaintenanceMode(_))));
}

// --- Resolution failures ---------------------------------------------------

#[test]
fn disabled_orchestrator_fails_every_entry_point_without_side_effects() {
    let fixture = RuntimeFixture::with_plugin(
        topology(vec![scalable_node("web", 2)]),
        RecordingPlugin::new(),
        &disabled_config(),
    );
    let env = fixture.environment();

    let results = [
        fixture.runtime.trigger_operation(restart("web"), PaasCallback::ignore()),
        fixture.runtime.switch_maintenance_mode(&env, true),
        fixture
            .runtime
            .switch_instance_maintenance_mode(&env, "web", "0", true),
        fixture
            .runtime
            .scale(None, &env, "web", 3, PaasCallback::ignore()),
    ];
    for result in results {
        let err = result.unwrap_err();
        assert!(matches!(err, Error::OrchestratorDisabled { .. }), "{err}");
        assert_eq!(err.code().as_u16(), 370);
    }

    assert!(fixture.plugin.dispatches().is_empty());
    assert_eq!(fixture.store.save_count(), 0);
    assert_eq!(fixture.instances("web", SCALABLE), 2);
    assert_eq!(fixture.type_context.entered(), 0);
}

#[test]
fn re_enabled_orchestrator_resolves_again() {
    let fixture = RuntimeFixture::with_plugin(
        topology(vec![scalable_node("web", 2)]),
        RecordingPlugin::new(),
        &disabled_config(),
    );
    fixture.registry.enable(&OrchestratorId::new(ORCHESTRATOR));

    fixture
        .runtime
        .switch_maintenance_mode(&fixture.environment(), true)
        .unwrap();
    assert_eq!(fixture.plugin.dispatches().len(), 1);
}

#[test]
fn ended_deployment_is_not_active() {
    let fixture = RuntimeFixture::new(topology(vec![scalable_node("web", 2)]));
    assert!(fixture.store.end_deployment(&fixture.environment()));
    let env = fixture.environment();

    let results = [
        fixture.runtime.trigger_operation(restart("web"), PaasCallback::ignore()),
        fixture.runtime.switch_maintenance_mode(&env, false),
        fixture
            .runtime
            .switch_instance_maintenance_mode(&env, "web", "0", false),
        fixture
            .runtime
            .scale(None, &env, "web", 1, PaasCallback::ignore()),
    ];
    for result in results {
        assert!(matches!(result, Err(Error::NoActiveDeployment { .. })));
    }
    assert!(fixture.plugin.dispatches().is_empty());
}

#[test]
fn unknown_environment_has_no_active_deployment() {
    let fixture = RuntimeFixture::new(topology(vec![scalable_node("web", 2)]));

    let err = fixture
        .runtime
        .switch_maintenance_mode(&EnvironmentId::new("env-unknown"), true)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.code().as_u16(), 504);
}

#[test]
fn runtime_is_usable_behind_the_inbound_port() {
    let fixture = RuntimeFixture::new(topology(vec![scalable_node("web", 2)]));
    let runtime: &dyn DeploymentRuntime = &fixture.runtime;

    runtime
        .switch_maintenance_mode(&fixture.environment(), true)
        .unwrap();
    runtime
        .scale(None, &fixture.environment(), "web", 1, PaasCallback::ignore())
        .unwrap();

    assert_eq!(fixture.plugin.dispatches().len(), 2);
    assert_eq!(fixture.instances("web", SCALABLE), 3);
}

#[test]
fn secret_configuration_is_generated_from_topology_locations() {
    let fixture = RuntimeFixture::new(topology(vec![scalable_node("web", 2)]));
    fixture
        .store
        .insert_location(location_with_secret_provider(LOCATION, "vault"));
    let topology = fixture.persisted();

    let resolved = fixture
        .runtime
        .generate_secret_configuration(&topology, "vault", json!({ "role": "deployer" }))
        .unwrap()
        .unwrap();
    assert_eq!(resolved.plugin_name(), "vault");
    assert_eq!(resolved.credentials, json!({ "role": "deployer" }));

    assert!(fixture
        .runtime
        .generate_secret_configuration(&topology, "conjur", json!({}))
        .unwrap()
        .is_none());
}

#[test]
fn repeated_resolution_sees_the_same_deployment_state() {
    let fixture = RuntimeFixture::new(topology(vec![scalable_node("web", 2)]));

    for _ in 0..2 {
        fixture
            .runtime
            .trigger_operation(restart("web"), PaasCallback::ignore())
            .unwrap();
    }

    let dispatches = fixture.plugin.dispatches();
    assert_eq!(dispatches.len(), 2);
    assert_eq!(dispatches[0], dispatches[1]);
    match &dispatches[0] {
        Dispatch::Operation { topology, .. } => assert_eq!(*topology, fixture.persisted()),
        other => panic!("unexpected dispatch: {other:?}"),
    }
    assert_eq!(fixture.registry.len(), 1);
    assert!(fixture.registry.is_enabled(&OrchestratorId::new(ORCHESTRATOR)));
    assert_eq!(fixture.store.save_count(), 0);
}

#[test]
fn redeployed_environment_targets_the_new_deployment() {
    let fixture = RuntimeFixture::new(topology(vec![scalable_node("web", 2)]));
    let redeployed = fixture.store.deploy(
        ENVIRONMENT,
        ORCHESTRATOR,
        topology(vec![scalable_node("web", 7)]),
    );

    fixture
        .runtime
        .scale(None, &fixture.environment(), "web", 1, PaasCallback::ignore())
        .unwrap();

    match &fixture.plugin.dispatches()[..] {
        [Dispatch::Scale { deployment_id, .. }] => assert_eq!(*deployment_id, redeployed),
        other => panic!("unexpected dispatches: {other:?}"),
    }
    let persisted = fixture.store.topology(&redeployed).unwrap();
    assert_eq!(
        persisted
            .scaling_property("web", SCALABLE, DEFAULT_INSTANCES)
            .unwrap(),
        8
    );
    // The ended deployment's record is untouched.
    assert_eq!(fixture.instances("web", SCALABLE), 2);
}
