//! Shared test utilities for integration tests
//!
//! In-memory stand-ins for the user daemon and the on-disk user cache, so lifecycle runs can be
//! observed call by call.

use async_trait::async_trait;
use std::sync::Mutex;
use trafficctl::error::{CacheError, CliError};
use trafficctl::lifecycle::{
    ClusterIdentity, DaemonClient, HelmRequest, Ingresses, OperationResult, UserCache,
};

/// A call the orchestrator made on the daemon
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Status,
    Helm(HelmRequest),
    Disconnect { force: bool },
}

/// Scriptable [`DaemonClient`] that records every call.
pub struct FakeDaemon {
    calls: Mutex<Vec<Call>>,
    status: Result<Option<ClusterIdentity>, String>,
    helm_reply: Result<OperationResult, String>,
    failing_disconnect: Option<bool>,
}

impl FakeDaemon {
    /// Daemon connected to `server`/`context` whose lifecycle calls succeed.
    pub fn connected_to(server: &str, context: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            status: Ok(Some(ClusterIdentity::new(server, context))),
            helm_reply: Ok(OperationResult::success()),
            failing_disconnect: None,
        }
    }

    pub fn not_connected() -> Self {
        Self {
            status: Ok(None),
            ..Self::connected_to("", "")
        }
    }

    pub fn with_status_error(mut self, message: &str) -> Self {
        self.status = Err(message.to_string());
        self
    }

    pub fn with_helm_reply(mut self, reply: OperationResult) -> Self {
        self.helm_reply = Ok(reply);
        self
    }

    pub fn with_helm_transport_error(mut self, message: &str) -> Self {
        self.helm_reply = Err(message.to_string());
        self
    }

    /// Make the disconnect with the given `force` fail.
    pub fn with_failing_disconnect(mut self, force: bool) -> Self {
        self.failing_disconnect = Some(force);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn helm_requests(&self) -> Vec<HelmRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Helm(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    pub fn forced_disconnects(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| **c == Call::Disconnect { force: true })
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl DaemonClient for FakeDaemon {
    async fn status(&self) -> Result<Option<ClusterIdentity>, CliError> {
        self.record(Call::Status);
        self.status.clone().map_err(CliError::Transport)
    }

    async fn helm(&self, request: HelmRequest) -> Result<OperationResult, CliError> {
        self.record(Call::Helm(request));
        self.helm_reply.clone().map_err(CliError::Transport)
    }

    async fn disconnect(&self, force: bool) -> Result<(), CliError> {
        self.record(Call::Disconnect { force });
        if self.failing_disconnect == Some(force) {
            return Err(CliError::Transport(format!("disconnect(force={}) failed", force)));
        }
        Ok(())
    }
}

/// In-memory [`UserCache`].
#[derive(Default)]
pub struct FakeCache {
    ingresses: Mutex<Ingresses>,
    logged_out: Mutex<bool>,
    saves: Mutex<usize>,
    fail_saves: bool,
}

impl FakeCache {
    pub fn with_entries(keys: &[&str]) -> Self {
        let ingresses = keys
            .iter()
            .map(|k| (k.to_string(), serde_json::json!({ "l5_host": "traffic-manager.ambassador" })))
            .collect();
        Self {
            ingresses: Mutex::new(ingresses),
            ..Self::default()
        }
    }

    pub fn failing_saves(mut self) -> Self {
        self.fail_saves = true;
        self
    }

    pub fn keys(&self) -> Vec<String> {
        self.ingresses.lock().unwrap().keys().cloned().collect()
    }

    pub fn logged_out(&self) -> bool {
        *self.logged_out.lock().unwrap()
    }

    pub fn saves(&self) -> usize {
        *self.saves.lock().unwrap()
    }
}

impl UserCache for FakeCache {
    fn load_ingresses(&self) -> Result<Ingresses, CacheError> {
        Ok(self.ingresses.lock().unwrap().clone())
    }

    fn save_ingresses(&self, ingresses: &Ingresses) -> Result<(), CacheError> {
        if self.fail_saves {
            return Err(CacheError::Write {
                path: "ingresses.json".into(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            });
        }
        *self.saves.lock().unwrap() += 1;
        *self.ingresses.lock().unwrap() = ingresses.clone();
        Ok(())
    }

    fn ensure_logged_out(&self) -> Result<(), CacheError> {
        *self.logged_out.lock().unwrap() = true;
        Ok(())
    }
}
