//! Traffic manager lifecycle: install, upgrade, and uninstall through the user daemon.
//!
//! The daemon and the on-disk user cache are external collaborators reached through the
//! [`DaemonClient`] and [`UserCache`] traits; [`LifecycleOrchestrator`] sequences the calls.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

pub mod cache;
pub mod daemon;
pub mod orchestrator;

pub use cache::{FileUserCache, IngressConfig, Ingresses, UserCache};
pub use daemon::{DaemonClient, SocketDaemonClient};
pub use orchestrator::{LifecycleOrchestrator, LifecycleOutcome};

/// Lifecycle operation on the traffic manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operation {
    Install,
    Upgrade,
    Uninstall,
}

impl Operation {
    /// Past-tense verb used in the success message.
    pub fn past_tense(self) -> &'static str {
        match self {
            Operation::Install => "installed",
            Operation::Upgrade => "upgraded",
            Operation::Uninstall => "uninstalled",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Install => "install",
            Operation::Upgrade => "upgrade",
            Operation::Uninstall => "uninstall",
        };
        f.write_str(name)
    }
}

/// Connection parameters forwarded to the daemon.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectRequest {
    /// Kubernetes flags the user set explicitly, by flag name
    #[serde(default)]
    pub kube_flags: BTreeMap<String, String>,

    /// Environment the daemon should use when loading the kubeconfig
    #[serde(default)]
    pub environment: BTreeMap<String, String>,
}

impl ConnectRequest {
    /// Forward `KUBECONFIG` from the caller's environment, since the daemon's may differ.
    pub fn with_kubeconfig_env(mut self) -> Self {
        if let Ok(kubeconfig) = std::env::var("KUBECONFIG") {
            self.environment.insert("KUBECONFIG".to_string(), kubeconfig);
        }
        self
    }
}

/// What the user asked for on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleRequest {
    pub operation: Operation,
    /// Values files, possibly relative to the working directory
    pub value_paths: Vec<PathBuf>,
    /// Inline `a.b=v` overrides
    pub value_pairs: Vec<String>,
    pub connection: ConnectRequest,
}

/// Request as transmitted to the daemon. Value paths are always absolute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelmRequest {
    #[serde(rename = "type")]
    pub operation: Operation,
    pub value_paths: Vec<PathBuf>,
    pub value_pairs: Vec<String>,
    pub connect_request: ConnectRequest,
}

/// Cluster the daemon was connected to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterIdentity {
    pub cluster_server: String,
    pub cluster_context: String,
}

impl ClusterIdentity {
    pub fn new(server: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            cluster_server: server.into(),
            cluster_context: context.into(),
        }
    }

    /// Key of this cluster in the ingress cache: `server/context`.
    pub fn cache_key(&self) -> String {
        format!("{}/{}", self.cluster_server, self.cluster_context)
    }
}

/// Category of a structured failure reported by the daemon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    User,
    Config,
    NoDaemonLogs,
    Unknown,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorCategory::User => "user",
            ErrorCategory::Config => "config",
            ErrorCategory::NoDaemonLogs => "no_daemon_logs",
            ErrorCategory::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Structured failure carried in an otherwise well-formed response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFailure {
    pub category: ErrorCategory,
    pub message: String,
}

/// Daemon response to a lifecycle request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<RemoteFailure>,
}

impl OperationResult {
    pub fn success() -> Self {
        Self { failure: None }
    }

    pub fn failed(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            failure: Some(RemoteFailure {
                category,
                message: message.into(),
            }),
        }
    }

    /// Translate a structured failure into a typed error.
    pub fn into_result(self) -> Result<(), crate::error::CliError> {
        match self.failure {
            None => Ok(()),
            Some(RemoteFailure { category, message }) => {
                Err(crate::error::CliError::Remote { category, message })
            }
        }
    }
}
