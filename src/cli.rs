//! CLI domain: parse, route, help, and output.
//! Help rendering is a pure function of the command tree, flag groups, and terminal width.

mod annotations;
pub mod command;
pub mod flags;
pub mod help;
mod output;
mod parse;
mod route;
pub mod terminal;
pub mod usage;

pub use annotations::{command_name, command_path, user_daemon_requirement, DaemonRequirement};
pub use output::map_error;
pub use parse::{Cli, Commands, ConfigArgs, HelmCommands, KubeFlags, LoggingArgs};
pub use route::{command_groups, flag_group_registry, lifecycle_request, RunContext};
