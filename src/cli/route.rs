//! CLI route: single route table and run context. Dispatches to help rendering and the lifecycle
//! orchestrator.

use crate::cli::annotations::{command_name, command_path, user_daemon_requirement, DaemonRequirement};
use crate::cli::command::{CommandGroups, CommandNode};
use crate::cli::flags::{FlagGroup, FlagGroupRegistry};
use crate::cli::help::{render_full, HelpContext};
use crate::cli::parse::{Cli, Commands, ConfigArgs, HelmCommands, KubeFlags, LoggingArgs};
use crate::cli::terminal::{resolve_width, StdoutProbe, TerminalWidth};
use crate::config::{CliConfig, ConfigLoader};
use crate::error::{CacheError, CliError};
use crate::lifecycle::{
    ConnectRequest, FileUserCache, LifecycleOrchestrator, LifecycleRequest, Operation,
    SocketDaemonClient,
};
use clap::CommandFactory;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

/// Flag groups of the trafficctl command line.
pub fn flag_group_registry() -> FlagGroupRegistry {
    FlagGroupRegistry::new()
        .register(FlagGroup::from_args::<LoggingArgs>("Logging"))
        .register(FlagGroup::from_args::<ConfigArgs>("Configuration"))
        .with_infrastructure(FlagGroup::from_args::<KubeFlags>("Kubernetes flags"))
}

/// Groups of the root "Available Commands" listing.
pub fn command_groups() -> CommandGroups {
    CommandGroups::new()
        .with_group("Cluster Management", ["helm"])
        .with_group("Other Commands", ["version", "help"])
}

/// Runtime context for CLI execution: loaded config plus the help model built once at startup.
pub struct RunContext {
    config: CliConfig,
    registry: FlagGroupRegistry,
    groups: CommandGroups,
    tree: CommandNode,
}

impl RunContext {
    /// Create run context, loading configuration with an optional explicit file.
    pub fn new(config_path: Option<&Path>) -> Result<Self, CliError> {
        Ok(Self::with_config(ConfigLoader::load(config_path)?))
    }

    pub fn with_config(config: CliConfig) -> Self {
        Self {
            config,
            registry: flag_group_registry(),
            groups: command_groups(),
            tree: CommandNode::from_clap(Cli::command()),
        }
    }

    pub fn config(&self) -> &CliConfig {
        &self.config
    }

    /// Execute a parsed command line via the single route table.
    pub fn execute(&self, cli: &Cli, out: &mut dyn Write) -> Result<(), CliError> {
        if cli.help {
            let path = cli.command.as_ref().map(command_path).unwrap_or_default();
            return self.print_help(&path, out);
        }

        let Some(command) = &cli.command else {
            return self.print_help(&[], out);
        };
        debug!(command = %command_name(command), "dispatching command");

        if user_daemon_requirement(command) == DaemonRequirement::Required
            && !SocketDaemonClient::is_running(&self.config.daemon.socket_path)
        {
            return Err(CliError::DaemonNotRunning(
                self.config.daemon.socket_path.clone(),
            ));
        }

        match command {
            Commands::Helm { command: None } => self.print_help(&["helm".to_string()], out),
            Commands::Helm {
                command: Some(helm),
            } => self.run_lifecycle(helm, out),
            Commands::Version => {
                writeln!(out, "trafficctl {}", env!("CARGO_PKG_VERSION"))?;
                Ok(())
            }
            Commands::Help { command } => self.print_help(command, out),
        }
    }

    /// Help text for the command at `path` below the root.
    pub fn help_text(
        &self,
        path: &[String],
        width: TerminalWidth,
        daemon_running: bool,
    ) -> Result<String, CliError> {
        let node = self
            .tree
            .find(path)
            .ok_or_else(|| CliError::UnknownCommand(path.join(" ")))?;
        let ctx = HelpContext {
            registry: &self.registry,
            command_groups: path.is_empty().then_some(&self.groups),
            width,
            daemon_running,
            docs_url: self.config.docs_url(),
        };
        Ok(render_full(node, &ctx))
    }

    fn print_help(&self, path: &[String], out: &mut dyn Write) -> Result<(), CliError> {
        let width = resolve_width(&StdoutProbe);
        let daemon_running = SocketDaemonClient::is_running(&self.config.daemon.socket_path);
        let text = self.help_text(path, width, daemon_running)?;
        out.write_all(text.as_bytes())?;
        Ok(())
    }

    fn run_lifecycle(&self, command: &HelmCommands, out: &mut dyn Write) -> Result<(), CliError> {
        let request = lifecycle_request(command);
        let cache_dir = self.config.cache.resolve_dir().ok_or(CacheError::NoCacheDir)?;
        let cache = FileUserCache::new(cache_dir);
        let socket_path = &self.config.daemon.socket_path;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let outcome = runtime.block_on(async {
            let daemon = SocketDaemonClient::connect(socket_path).await?;
            LifecycleOrchestrator::new(&daemon, &cache)
                .run(request, out)
                .await
        })?;
        info!(
            operation = %outcome.operation,
            removed_cache_key = ?outcome.removed_cache_key,
            "lifecycle request completed"
        );
        Ok(())
    }
}

/// Translate a parsed helm subcommand into a lifecycle request.
pub fn lifecycle_request(command: &HelmCommands) -> LifecycleRequest {
    match command {
        HelmCommands::Install {
            upgrade,
            values,
            set,
            kube,
        } => LifecycleRequest {
            operation: if *upgrade {
                Operation::Upgrade
            } else {
                Operation::Install
            },
            value_paths: values.clone(),
            value_pairs: set.clone(),
            connection: connect_request(kube),
        },
        HelmCommands::Uninstall { kube } => LifecycleRequest {
            operation: Operation::Uninstall,
            value_paths: Vec::new(),
            value_pairs: Vec::new(),
            connection: connect_request(kube),
        },
    }
}

fn connect_request(kube: &KubeFlags) -> ConnectRequest {
    ConnectRequest {
        kube_flags: kube_flag_map(kube),
        environment: BTreeMap::new(),
    }
    .with_kubeconfig_env()
}

/// Kubernetes flags that were set, by flag name.
fn kube_flag_map(kube: &KubeFlags) -> BTreeMap<String, String> {
    let optional = [
        ("kubeconfig", &kube.kubeconfig),
        ("context", &kube.context),
        ("cluster", &kube.cluster),
        ("user", &kube.user),
        ("server", &kube.server),
        ("as", &kube.as_user),
        ("token", &kube.token),
        ("certificate-authority", &kube.certificate_authority),
        ("request-timeout", &kube.request_timeout),
    ];
    let mut flags: BTreeMap<String, String> = optional
        .into_iter()
        .filter_map(|(name, value)| value.as_ref().map(|v| (name.to_string(), v.clone())))
        .collect();
    if !kube.as_group.is_empty() {
        flags.insert("as-group".to_string(), kube.as_group.join(","));
    }
    if kube.insecure_skip_tls_verify {
        flags.insert("insecure-skip-tls-verify".to_string(), "true".to_string());
    }
    flags
}
