//! Command names and per-command requirements the dispatcher checks before running.

use crate::cli::parse::{Commands, HelmCommands};

/// Whether a command needs a reachable user daemon before it runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaemonRequirement {
    Required,
    NotRequired,
}

/// Command name for logging (e.g. "helm.install").
pub fn command_name(command: &Commands) -> String {
    match command {
        Commands::Helm { command: Some(sub) } => format!("helm.{}", helm_command_name(sub)),
        Commands::Helm { command: None } => "helm".to_string(),
        Commands::Version => "version".to_string(),
        Commands::Help { .. } => "help".to_string(),
    }
}

pub fn helm_command_name(command: &HelmCommands) -> &'static str {
    match command {
        HelmCommands::Install { .. } => "install",
        HelmCommands::Uninstall { .. } => "uninstall",
    }
}

/// Path of the command below the root, as help lookup expects it.
pub fn command_path(command: &Commands) -> Vec<String> {
    command_name(command).split('.').map(str::to_string).collect()
}

/// `user-daemon: required` annotation.
pub fn user_daemon_requirement(command: &Commands) -> DaemonRequirement {
    match command {
        Commands::Helm { command: Some(_) } => DaemonRequirement::Required,
        Commands::Helm { command: None } | Commands::Version | Commands::Help { .. } => {
            DaemonRequirement::NotRequired
        }
    }
}
