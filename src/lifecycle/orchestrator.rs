//! Lifecycle orchestrator: the fixed install/upgrade/uninstall sequence.
//!
//! Each step's failure handling is declared by [`Step::on_error`]; the sequence itself only
//! consumes step results through [`settle`], so which failures abort is visible in one place.

use super::cache::UserCache;
use super::daemon::DaemonClient;
use super::{ClusterIdentity, HelmRequest, LifecycleRequest, Operation};
use crate::error::CliError;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// Steps of a lifecycle run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    ResolveValuePaths,
    PreTeardown,
    QueryStatus,
    SendRequest,
    CleanCache,
    Report,
    FinalTeardown,
}

/// What a step failure does to the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnError {
    Abort,
    LogAndContinue,
}

impl Step {
    pub fn on_error(self) -> OnError {
        match self {
            Step::PreTeardown | Step::QueryStatus => OnError::LogAndContinue,
            Step::ResolveValuePaths
            | Step::SendRequest
            | Step::CleanCache
            | Step::Report
            | Step::FinalTeardown => OnError::Abort,
        }
    }
}

/// Apply a step's error policy: `Ok(None)` is a failure that was logged and dropped.
pub fn settle<T>(step: Step, result: Result<T, CliError>) -> Result<Option<T>, CliError> {
    match (result, step.on_error()) {
        (Ok(value), _) => Ok(Some(value)),
        (Err(e), OnError::LogAndContinue) => {
            debug!(step = ?step, error = %e, "best-effort step failed");
            Ok(None)
        }
        (Err(e), OnError::Abort) => Err(e),
    }
}

/// Result of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleOutcome {
    pub operation: Operation,
    /// Cluster the daemon reported before the request was sent
    pub prior_cluster: Option<ClusterIdentity>,
    /// Ingress cache entry removed by an uninstall
    pub removed_cache_key: Option<String>,
}

pub struct LifecycleOrchestrator<'a> {
    daemon: &'a dyn DaemonClient,
    cache: &'a dyn UserCache,
    working_dir: Option<PathBuf>,
}

impl<'a> LifecycleOrchestrator<'a> {
    pub fn new(daemon: &'a dyn DaemonClient, cache: &'a dyn UserCache) -> Self {
        Self {
            daemon,
            cache,
            working_dir: None,
        }
    }

    /// Resolve relative values files against `dir` instead of the process working directory.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Run the request, writing the user-facing success message to `out`.
    pub async fn run(
        &self,
        request: LifecycleRequest,
        out: &mut dyn Write,
    ) -> Result<LifecycleOutcome, CliError> {
        let operation = request.operation;
        let value_paths = settle(
            Step::ResolveValuePaths,
            absolutize_value_paths(&request.value_paths, self.working_dir.as_deref()),
        )?
        .unwrap_or_default();

        // No session may survive into the operation, whatever state it was in.
        settle(Step::PreTeardown, self.daemon.disconnect(false).await)?;
        let prior_cluster = settle(Step::QueryStatus, self.daemon.status().await)?.flatten();

        let helm_request = HelmRequest {
            operation,
            value_paths,
            value_pairs: request.value_pairs,
            connect_request: request.connection,
        };
        info!(
            operation = %operation,
            values_files = helm_request.value_paths.len(),
            "sending lifecycle request"
        );
        let response = settle(Step::SendRequest, self.daemon.helm(helm_request).await)?;
        if let Some(response) = response {
            response.into_result()?;
        }

        let mut removed_cache_key = None;
        if operation == Operation::Uninstall {
            if let Some(identity) = &prior_cluster {
                removed_cache_key =
                    settle(Step::CleanCache, self.remove_cluster_from_cache(identity))?.flatten();
            }
        }

        settle(
            Step::Report,
            write!(out, "\nTraffic Manager {} successfully\n", operation.past_tense())
                .map_err(CliError::from),
        )?;

        if operation == Operation::Uninstall {
            settle(Step::FinalTeardown, self.daemon.disconnect(true).await)?;
        }

        Ok(LifecycleOutcome {
            operation,
            prior_cluster,
            removed_cache_key,
        })
    }

    /// Drop credentials and the ingress entry tied to a traffic manager that no longer exists.
    fn remove_cluster_from_cache(
        &self,
        identity: &ClusterIdentity,
    ) -> Result<Option<String>, CliError> {
        self.cache.ensure_logged_out()?;

        let mut ingresses = self.cache.load_ingresses()?;
        let key = identity.cache_key();
        if ingresses.remove(&key).is_none() {
            return Ok(None);
        }
        self.cache.save_ingresses(&ingresses)?;
        info!(cache_key = %key, "removed cluster from ingress cache");
        Ok(Some(key))
    }
}

/// Make every values file path absolute, lexically cleaned, relative to `base` or the process
/// working directory.
pub fn absolutize_value_paths(
    paths: &[PathBuf],
    base: Option<&Path>,
) -> Result<Vec<PathBuf>, CliError> {
    let mut cwd: Option<PathBuf> = base.map(Path::to_path_buf);
    let mut resolved = Vec::with_capacity(paths.len());
    for path in paths {
        if path.as_os_str().is_empty() {
            return Err(CliError::InvalidValuesPath {
                path: path.clone(),
                reason: "path is empty".to_string(),
            });
        }
        if path.is_absolute() {
            resolved.push(clean(path));
            continue;
        }
        let dir = match &cwd {
            Some(dir) => dir.clone(),
            None => {
                let dir = std::env::current_dir().map_err(|e| CliError::InvalidValuesPath {
                    path: path.clone(),
                    reason: format!("cannot determine working directory: {}", e),
                })?;
                cwd = Some(dir.clone());
                dir
            }
        };
        resolved.push(clean(&dir.join(path)));
    }
    Ok(resolved)
}

/// Lexically remove `.` and `..` components.
fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other),
        }
    }
    out
}
