//! User daemon boundary and its Unix socket client.
//!
//! Wire format: one JSON request line per connection, answered by one JSON reply line.

use super::{ClusterIdentity, HelmRequest, OperationResult};
use crate::error::CliError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;
use tracing::debug;

/// Calls the lifecycle orchestrator makes on the user daemon.
#[async_trait]
pub trait DaemonClient: Send + Sync {
    /// Cluster the daemon is connected to, or `None` when it is not connected.
    async fn status(&self) -> Result<Option<ClusterIdentity>, CliError>;

    /// Run a lifecycle operation. Transport failures are `Err`; structured failures are
    /// reported inside the returned [`OperationResult`].
    async fn helm(&self, request: HelmRequest) -> Result<OperationResult, CliError>;

    /// End the current session. `force` also stops the daemon's cluster-side state.
    async fn disconnect(&self, force: bool) -> Result<(), CliError>;
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
enum DaemonCall {
    Status,
    Helm { request: HelmRequest },
    Disconnect { force: bool },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum DaemonReply {
    Status(Option<ClusterIdentity>),
    Helm(OperationResult),
    Disconnected,
    Error { message: String },
}

/// [`DaemonClient`] over the daemon's Unix domain socket.
#[derive(Debug, Clone)]
pub struct SocketDaemonClient {
    socket_path: PathBuf,
}

impl SocketDaemonClient {
    /// Connect to a running daemon. Fails with `DaemonNotRunning` when nothing listens.
    pub async fn connect(socket_path: &Path) -> Result<Self, CliError> {
        UnixStream::connect(socket_path)
            .await
            .map_err(|e| {
                debug!(socket = %socket_path.display(), error = %e, "daemon socket probe failed");
                CliError::DaemonNotRunning(socket_path.to_path_buf())
            })?;
        Ok(Self {
            socket_path: socket_path.to_path_buf(),
        })
    }

    /// Cheap check used by help rendering; does not connect.
    ///
    /// Only tests that the socket file exists. A stale socket left behind by a crashed daemon
    /// still reports running here; [`SocketDaemonClient::connect`] is the authoritative check.
    pub fn is_running(socket_path: &Path) -> bool {
        socket_path.exists()
    }

    async fn call(&self, call: DaemonCall) -> Result<DaemonReply, CliError> {
        let stream = UnixStream::connect(&self.socket_path)
            .await
            .map_err(|e| transport("connect to user daemon", e))?;
        let mut stream = BufReader::new(stream);

        let mut line = serde_json::to_vec(&call)
            .map_err(|e| CliError::Transport(format!("failed to encode daemon request: {}", e)))?;
        line.push(b'\n');
        stream
            .get_mut()
            .write_all(&line)
            .await
            .map_err(|e| transport("send daemon request", e))?;

        let mut reply = String::new();
        let n = stream
            .read_line(&mut reply)
            .await
            .map_err(|e| transport("read daemon reply", e))?;
        if n == 0 {
            return Err(CliError::Transport(
                "user daemon closed the connection without replying".to_string(),
            ));
        }

        match serde_json::from_str(&reply) {
            Ok(DaemonReply::Error { message }) => Err(CliError::Transport(message)),
            Ok(reply) => Ok(reply),
            Err(e) => Err(CliError::Transport(format!(
                "malformed daemon reply: {}",
                e
            ))),
        }
    }
}

fn transport(action: &str, err: std::io::Error) -> CliError {
    CliError::Transport(format!("failed to {}: {}", action, err))
}

fn unexpected(reply: DaemonReply) -> CliError {
    CliError::Transport(format!("unexpected daemon reply: {:?}", reply))
}

#[async_trait]
impl DaemonClient for SocketDaemonClient {
    async fn status(&self) -> Result<Option<ClusterIdentity>, CliError> {
        match self.call(DaemonCall::Status).await? {
            DaemonReply::Status(identity) => Ok(identity),
            other => Err(unexpected(other)),
        }
    }

    async fn helm(&self, request: HelmRequest) -> Result<OperationResult, CliError> {
        match self.call(DaemonCall::Helm { request }).await? {
            DaemonReply::Helm(result) => Ok(result),
            other => Err(unexpected(other)),
        }
    }

    async fn disconnect(&self, force: bool) -> Result<(), CliError> {
        match self.call(DaemonCall::Disconnect { force }).await? {
            DaemonReply::Disconnected => Ok(()),
            other => Err(unexpected(other)),
        }
    }
}
