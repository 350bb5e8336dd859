//! Install and upgrade runs.

use super::test_utils::{Call, FakeCache, FakeDaemon};
use std::path::PathBuf;
use trafficctl::error::CliError;
use trafficctl::lifecycle::{ConnectRequest, LifecycleOrchestrator, LifecycleRequest, Operation};

fn install(operation: Operation, value_paths: &[&str]) -> LifecycleRequest {
    LifecycleRequest {
        operation,
        value_paths: value_paths.iter().map(PathBuf::from).collect(),
        value_pairs: vec!["agent.logLevel=debug".to_string()],
        connection: ConnectRequest::default(),
    }
}

#[tokio::test]
async fn test_relative_values_are_sent_absolute() {
    let daemon = FakeDaemon::connected_to("https://k8s", "dev");
    let cache = FakeCache::default();
    let workdir = tempfile::tempdir().unwrap();

    LifecycleOrchestrator::new(&daemon, &cache)
        .with_working_dir(workdir.path())
        .run(
            install(Operation::Install, &["values.yaml", "nested/../prod.yaml"]),
            &mut Vec::new(),
        )
        .await
        .unwrap();

    let requests = daemon.helm_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].value_paths,
        vec![workdir.path().join("values.yaml"), workdir.path().join("prod.yaml")]
    );
    assert!(requests[0].value_paths.iter().all(|p| p.is_absolute()));
    assert_eq!(requests[0].value_pairs, vec!["agent.logLevel=debug"]);
}

#[tokio::test]
async fn test_install_reports_and_keeps_session_state() {
    let daemon = FakeDaemon::connected_to("https://k8s", "dev");
    let cache = FakeCache::with_entries(&["https://k8s/dev"]);
    let mut out = Vec::new();

    let outcome = LifecycleOrchestrator::new(&daemon, &cache)
        .run(install(Operation::Install, &[]), &mut out)
        .await
        .unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "\nTraffic Manager installed successfully\n"
    );
    assert_eq!(outcome.removed_cache_key, None);
    assert_eq!(cache.keys(), vec!["https://k8s/dev".to_string()]);
    assert!(!cache.logged_out());
    assert!(matches!(daemon.calls().last(), Some(Call::Helm(_))));
    assert_eq!(daemon.forced_disconnects(), 0);
}

#[tokio::test]
async fn test_upgrade_message() {
    let daemon = FakeDaemon::not_connected();
    let cache = FakeCache::default();
    let mut out = Vec::new();

    LifecycleOrchestrator::new(&daemon, &cache)
        .run(install(Operation::Upgrade, &[]), &mut out)
        .await
        .unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "\nTraffic Manager upgraded successfully\n"
    );
    assert_eq!(daemon.helm_requests()[0].operation, Operation::Upgrade);
}

#[tokio::test]
async fn test_invalid_values_path_fails_before_any_daemon_call() {
    let daemon = FakeDaemon::connected_to("https://k8s", "dev");
    let cache = FakeCache::default();

    let err = LifecycleOrchestrator::new(&daemon, &cache)
        .run(install(Operation::Install, &["a.yaml", ""]), &mut Vec::new())
        .await
        .unwrap_err();

    assert!(matches!(err, CliError::InvalidValuesPath { .. }));
    assert!(daemon.calls().is_empty());
}
